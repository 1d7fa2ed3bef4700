//! `define_port_error!`: declares a driven-port error enum.
//!
//! Each variant carries its `thiserror` message and the domain error it turns
//! into. `internal` keeps the message as the (log-only) detail; any other
//! code must name the client-facing message:
//!
//! ```ignore
//! define_port_error! {
//!     pub enum TenantRepositoryError {
//!         Query { message: String } => "query failed: {message}"; internal,
//!         SlugTaken { slug: String } => "slug '{slug}' exists"; conflict("Tenant already exists"),
//!     }
//! }
//! ```
//!
//! The macro also emits one snake_case constructor per variant, taking
//! `impl Into<_>` for every field, and `From<Enum> for domain::Error` so
//! services can use `?` directly.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_fields $variant [] [] $( $field : $ty, )*);
    };

    (@ctor_fields $variant:ident [$($params:tt)*] [$($inits:tt)*]) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_fields $variant:ident [$($params:tt)*] [$($inits:tt)*] $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_fields $variant
            [$($params)* $field: impl Into<$ty>,]
            [$($inits)* $field: $field.into(),]
            $($rest)*
        );
    };

    (@domain $err:ident internal) => {
        $crate::domain::Error::internal($err.to_string())
    };

    (@domain $err:ident $code:ident ($public:expr)) => {
        $crate::domain::Error::$code($public)
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )?
                    => $message:expr ; $code:ident $( ($public:expr) )?
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }

        impl From<$name> for $crate::domain::Error {
            fn from(err: $name) -> Self {
                match &err {
                    $(
                        $name::$variant { .. } => {
                            define_port_error!(@domain err $code $( ($public) )?)
                        }
                    )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;
