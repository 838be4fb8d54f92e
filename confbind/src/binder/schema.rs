//! Schema definitions describing how a merged tree maps onto a type.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Inclusive range accepted by an integer field.
///
/// # Examples
///
/// ```
/// use confbind::IntBounds;
///
/// let port = IntBounds::of_u16();
/// assert!(port.contains(8080));
/// assert!(!port.contains(70_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntBounds {
    /// Smallest accepted value.
    pub min: i128,
    /// Largest accepted value.
    pub max: i128,
}

impl IntBounds {
    /// Bounds of `i64`, the default integer width.
    pub const I64: Self = Self::new(i64::MIN as i128, i64::MAX as i128);

    /// Creates bounds from an inclusive range.
    #[must_use]
    pub const fn new(min: i128, max: i128) -> Self {
        Self { min, max }
    }

    /// Bounds of `u16`, the usual port range.
    #[must_use]
    pub const fn of_u16() -> Self {
        Self::new(0, u16::MAX as i128)
    }

    /// Whether `value` lies within the bounds.
    #[must_use]
    pub const fn contains(&self, value: i128) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Default for IntBounds {
    fn default() -> Self {
        Self::I64
    }
}

/// A scalar type a value can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Text.
    Str,
    /// An integer within the given bounds.
    Int(IntBounds),
    /// A finite floating point number.
    Float,
    /// A boolean.
    Bool,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => write!(f, "str"),
            Self::Int(_) => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

/// A reference to a nested schema.
///
/// `Deferred` builds the schema on demand, which is what lets a type refer
/// to itself (directly or through other types) without looping forever.
#[derive(Debug, Clone)]
pub enum SchemaRef {
    /// Built each time it is resolved.
    Deferred(fn() -> SchemaDef),
    /// Already built and shared.
    Defined(Arc<SchemaDef>),
}

impl SchemaRef {
    /// Returns the referenced schema.
    #[must_use]
    pub fn resolve(&self) -> Cow<'_, SchemaDef> {
        match self {
            Self::Deferred(build) => Cow::Owned(build()),
            Self::Defined(schema) => Cow::Borrowed(schema.as_ref()),
        }
    }
}

/// The declared type of a field.
///
/// # Examples
///
/// ```
/// use confbind::FieldType;
///
/// let ty = FieldType::union(vec![FieldType::integer(), FieldType::string()]);
/// assert_eq!(ty.to_string(), "one of (int, str)");
/// assert!(!ty.is_optional());
/// assert!(FieldType::optional(ty).is_optional());
/// ```
#[derive(Debug, Clone)]
pub enum FieldType {
    /// Any value, passed through unchanged.
    Any,
    /// A coerced scalar.
    Primitive(Primitive),
    /// The inner type, or null.
    Optional(Box<FieldType>),
    /// The first member type that binds successfully.
    Union(Vec<FieldType>),
    /// A sequence whose items share one type.
    List(Box<FieldType>),
    /// A string-keyed mapping whose values share one type.
    Map(Box<FieldType>),
    /// A nested schema.
    Object(SchemaRef),
}

impl FieldType {
    /// A string field.
    #[must_use]
    pub const fn string() -> Self {
        Self::Primitive(Primitive::Str)
    }

    /// An `i64` field.
    #[must_use]
    pub const fn integer() -> Self {
        Self::Primitive(Primitive::Int(IntBounds::I64))
    }

    /// An integer field limited to `bounds`.
    #[must_use]
    pub const fn bounded(bounds: IntBounds) -> Self {
        Self::Primitive(Primitive::Int(bounds))
    }

    /// A float field.
    #[must_use]
    pub const fn float() -> Self {
        Self::Primitive(Primitive::Float)
    }

    /// A boolean field.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::Primitive(Primitive::Bool)
    }

    /// `inner` or null.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// The first of `members` that binds.
    #[must_use]
    pub fn union(members: Vec<Self>) -> Self {
        Self::Union(members)
    }

    /// A list of `item`.
    #[must_use]
    pub fn list(item: Self) -> Self {
        Self::List(Box::new(item))
    }

    /// A mapping from strings to `value`.
    #[must_use]
    pub fn map(value: Self) -> Self {
        Self::Map(Box::new(value))
    }

    /// A nested schema.
    #[must_use]
    pub fn object(schema: SchemaDef) -> Self {
        Self::Object(SchemaRef::Defined(Arc::new(schema)))
    }

    /// The field type of a Rust type.
    #[must_use]
    pub fn of<T: FieldKind + ?Sized>() -> Self {
        T::field_type()
    }

    /// Whether a missing key may fall back to its default or null.
    ///
    /// True for `Optional`, and for a `Union` with an optional member.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        match self {
            Self::Optional(_) => true,
            Self::Union(members) => members.iter().any(Self::is_optional),
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Optional(inner) => write!(f, "optional {inner}"),
            Self::Union(members) => {
                write!(f, "one of (")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{member}")?;
                }
                write!(f, ")")
            }
            Self::List(item) => write!(f, "list of {item}"),
            Self::Map(value) => write!(f, "mapping of {value}"),
            Self::Object(SchemaRef::Defined(schema)) => write!(f, "{}", schema.name),
            Self::Object(SchemaRef::Deferred(build)) => write!(f, "{}", build().name),
        }
    }
}

/// One field of a schema.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// The key looked up in the source mapping.
    pub name: String,
    /// The declared type.
    pub ty: FieldType,
    /// Used when the key is missing and the type is optional.
    pub default: Option<Value>,
}

/// A named, ordered set of fields.
///
/// # Examples
///
/// ```
/// use confbind::{FieldType, SchemaDef};
///
/// let schema = SchemaDef::builder("Server")
///     .field("host", FieldType::string())
///     .field("port", FieldType::optional(FieldType::integer()))
///     .default_value("port", 8080)
///     .build();
///
/// assert_eq!(schema.name(), "Server");
/// assert_eq!(schema.fields().len(), 2);
/// assert_eq!(schema.field("port").unwrap().default, Some(8080.into()));
/// ```
#[derive(Debug, Clone)]
pub struct SchemaDef {
    name: String,
    fields: Vec<FieldDef>,
}

impl SchemaDef {
    /// Starts building a schema called `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// The schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Builder for [`SchemaDef`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    /// Appends a field. A field with the same name is replaced in place.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(existing) => existing.ty = ty,
            None => self.fields.push(FieldDef {
                name,
                ty,
                default: None,
            }),
        }
        self
    }

    /// Sets the default of an already declared field.
    ///
    /// Has no effect if no field called `name` has been declared.
    #[must_use]
    pub fn default_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        if let Some(field) = self.fields.iter_mut().find(|field| field.name == name) {
            field.default = Some(value.into());
        }
        self
    }

    /// Finishes the schema.
    #[must_use]
    pub fn build(self) -> SchemaDef {
        SchemaDef {
            name: self.name,
            fields: self.fields,
        }
    }
}

/// Maps a Rust type onto the [`FieldType`] that binds it.
pub trait FieldKind {
    /// The field type for `Self`.
    fn field_type() -> FieldType;
}

/// A type that can be bound from a merged tree.
///
/// Usually implemented with [`config_struct!`](crate::config_struct).
pub trait Configurable: FieldKind + DeserializeOwned {
    /// The schema describing `Self`.
    fn schema() -> SchemaDef;
}

macro_rules! int_kind {
    ($($t:ty),* $(,)?) => {
        $(
            impl FieldKind for $t {
                fn field_type() -> FieldType {
                    FieldType::bounded(IntBounds::new(
                        i128::try_from(<$t>::MIN).unwrap_or(i128::MIN),
                        i128::try_from(<$t>::MAX).unwrap_or(i128::MAX),
                    ))
                }
            }
        )*
    };
}

int_kind!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl FieldKind for String {
    fn field_type() -> FieldType {
        FieldType::string()
    }
}

impl FieldKind for PathBuf {
    fn field_type() -> FieldType {
        FieldType::string()
    }
}

impl FieldKind for f32 {
    fn field_type() -> FieldType {
        FieldType::float()
    }
}

impl FieldKind for f64 {
    fn field_type() -> FieldType {
        FieldType::float()
    }
}

impl FieldKind for bool {
    fn field_type() -> FieldType {
        FieldType::boolean()
    }
}

impl FieldKind for Value {
    fn field_type() -> FieldType {
        FieldType::Any
    }
}

impl<T: FieldKind> FieldKind for Option<T> {
    fn field_type() -> FieldType {
        FieldType::optional(T::field_type())
    }
}

impl<T: FieldKind> FieldKind for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::list(T::field_type())
    }
}

impl<T: FieldKind> FieldKind for Box<T> {
    fn field_type() -> FieldType {
        T::field_type()
    }
}

impl<T: FieldKind, S> FieldKind for HashMap<String, T, S> {
    fn field_type() -> FieldType {
        FieldType::map(T::field_type())
    }
}

impl<T: FieldKind> FieldKind for BTreeMap<String, T> {
    fn field_type() -> FieldType {
        FieldType::map(T::field_type())
    }
}
