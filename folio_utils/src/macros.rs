/// Assert that an expression matches a pattern, optionally with a guard.
///
/// ```
/// # use folio_utils::assert_matches;
/// let value: Result<u8, ()> = Ok(7);
/// assert_matches!(value, Ok(x) if x > 5);
/// ```
#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $pat:pat $(if $guard:expr)? $(,)?) => {
        match $expr {
            $pat $(if $guard)? => {}
            ref value => ::core::panic!(
                "assertion failed: `{:?}` does not match `{}`",
                value,
                ::core::stringify!($pat $(if $guard)?),
            ),
        }
    };
}
