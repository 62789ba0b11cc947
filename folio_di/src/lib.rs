//! Minimal compile-time dependency injection.
//!
//! A provider owns the leaf dependencies (configuration structs and connected
//! infrastructure like the smtp transport). Everything else implements
//! [`Build`], usually via `#[derive(Build)]`, and is assembled on demand by
//! calling [`Provide::provide`]. Built values are cached per provider, so each
//! service exists exactly once.

#[cfg(test)]
extern crate self as folio_di;

pub use folio_di_derive::Build;
pub use typemap::TypeMap;

mod macros;
mod typemap;

pub trait Provider: Sized {
    fn cache(&mut self) -> &mut TypeMap;
}

#[diagnostic::on_unimplemented(
    message = "The type `{Self}` cannot be built using the provider `{P}`",
    note = "Add `{Self}` to the provider `{P}` or implement `Build` for `{Self}` and make sure \
            all dependencies are satisfied"
)]
pub trait Build<P: Provider>: Clone + 'static {
    fn build(provider: &mut P) -> Self;
}

pub trait Provide: Provider {
    fn provide<T: Build<Self>>(&mut self) -> T {
        T::build(self)
    }
}

impl<P: Provider> Provide for P {}
