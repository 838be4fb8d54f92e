//! Declarative macros for defining bindable types.

/// Declares a struct and derives its binding schema from the field types.
///
/// Every field becomes a schema field named after the Rust identifier, with
/// its [`FieldType`](crate::FieldType) taken from [`FieldKind`](crate::FieldKind).
/// A field may declare a default with `= expr`; it is used when the key is
/// missing and the field type is optional.
///
/// To bind a field from a different key, write `field as "key": Ty`. The
/// macro adds the matching `#[serde(rename = "key")]` itself. A hand-written
/// `#[serde(rename)]` or `#[serde(rename_all)]` is not seen by the binder and
/// makes binding fail with [`Error::Construct`](crate::Error::Construct).
///
/// The struct must derive `serde::Deserialize`.
///
/// # Examples
///
/// ```
/// use confbind::{config_struct, Binder, MergedTree};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// config_struct! {
///     #[derive(Debug, Deserialize)]
///     pub struct Server {
///         pub host: String,
///         pub port: Option<u16> = 8080,
///         pub max_conn as "max-connections": Option<u32>,
///     }
/// }
///
/// let tree = MergedTree::try_from(json!({"host": "localhost", "max-connections": "64"})).unwrap();
/// let server: Server = Binder::default().bind(&tree).unwrap();
/// assert_eq!(server.port, Some(8080));
/// assert_eq!(server.max_conn, Some(64));
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident $(as $key:literal)? : $ty:ty $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $(#[serde(rename = $key)])?
                $field_vis $field: $ty,
            )*
        }

        impl $crate::FieldKind for $name {
            fn field_type() -> $crate::FieldType {
                $crate::FieldType::Object($crate::SchemaRef::Deferred(
                    <$name as $crate::Configurable>::schema,
                ))
            }
        }

        impl $crate::Configurable for $name {
            fn schema() -> $crate::SchemaDef {
                let builder = $crate::SchemaDef::builder(stringify!($name));
                $(
                    let builder = $crate::__config_field!(
                        builder, $field, [$($key)?], $ty, [$($default)?]
                    );
                )*
                builder.build()
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __config_field {
    ($builder:ident, $field:ident, [], $ty:ty, [$($default:expr)?]) => {
        $builder
            .field(stringify!($field), <$ty as $crate::FieldKind>::field_type())
            $(.default_value(stringify!($field), $default))?
    };
    ($builder:ident, $field:ident, [$key:literal], $ty:ty, [$($default:expr)?]) => {
        $builder
            .field($key, <$ty as $crate::FieldKind>::field_type())
            $(.default_value($key, $default))?
    };
}

/// Declares an untagged enum that binds as a union of its variant types.
///
/// Variants are tried in declaration order. Each variant wraps exactly one
/// type implementing [`FieldKind`](crate::FieldKind). The enum must derive
/// `serde::Deserialize`; `#[serde(untagged)]` is added automatically.
///
/// # Examples
///
/// ```
/// use confbind::{config_union, FieldKind};
/// use serde::Deserialize;
///
/// config_union! {
///     #[derive(Debug, Deserialize)]
///     pub enum Timeout {
///         Seconds(u64),
///         Named(String),
///     }
/// }
///
/// assert_eq!(Timeout::field_type().to_string(), "one of (int, str)");
/// ```
#[macro_export]
macro_rules! config_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident ( $ty:ty )
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[serde(untagged)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant($ty),
            )+
        }

        impl $crate::FieldKind for $name {
            fn field_type() -> $crate::FieldType {
                $crate::FieldType::Union(::std::vec![
                    $(<$ty as $crate::FieldKind>::field_type()),+
                ])
            }
        }
    };
}
