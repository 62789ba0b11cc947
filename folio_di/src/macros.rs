/// Declare a provider struct.
///
/// Every listed field is a leaf dependency that is handed out by cloning it.
/// An optional base provider (`..field: Type { A, B, }`) is asked for the
/// listed types `A` and `B`. A `new` constructor taking all fields in
/// declaration order is generated.
#[macro_export]
macro_rules! provider {
    (
        $(#[$meta:meta])*
        $vis:vis $ident:ident {
            $( $field:ident: $ty:ty, )*
            $( .. $base_field:ident: $base:ty { $( $base_ty:ty ),* $(,)? } )?
        }
    ) => {
        $(#[$meta])*
        $vis struct $ident {
            instances: $crate::TypeMap,
            $( $field: $ty, )*
            $( $base_field: $base, )?
        }

        impl $ident {
            #[allow(dead_code, reason = "not every provider is constructed directly")]
            $vis fn new($( $field: $ty, )* $( $base_field: $base, )?) -> Self {
                Self {
                    instances: ::core::default::Default::default(),
                    $( $field, )*
                    $( $base_field, )?
                }
            }
        }

        impl $crate::Provider for $ident {
            fn cache(&mut self) -> &mut $crate::TypeMap {
                &mut self.instances
            }
        }

        $(
            impl $crate::Build<$ident> for $ty {
                fn build(provider: &mut $ident) -> Self {
                    ::core::clone::Clone::clone(&provider.$field)
                }
            }
        )*

        $($(
            impl $crate::Build<$ident> for $base_ty {
                fn build(provider: &mut $ident) -> Self {
                    $crate::Provide::provide(&mut provider.$base_field)
                }
            }
        )*)?
    };
}
