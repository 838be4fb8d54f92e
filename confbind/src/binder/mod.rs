//! Binding merged trees onto typed schemas.
//!
//! The binder walks a [`FieldType`] alongside the merged tree, resolving
//! environment tags at primitive positions and coercing scalars. The
//! resulting value is shaped exactly like the schema, so it can be handed
//! to `serde` to build the target type.

mod coerce;
mod macros;
mod schema;

pub use schema::{
    Configurable, FieldDef, FieldKind, FieldType, IntBounds, Primitive, SchemaBuilder, SchemaDef,
    SchemaRef,
};

use std::borrow::Cow;
use std::fmt;

use serde_json::{Map, Value};

use crate::environment::{EnvSource, EnvTag, ProcessEnv};
use crate::error::{Error, Result};
use crate::tree::{child_key, kind_name, MergedTree};

/// Populates schemas from a merged tree.
///
/// # Examples
///
/// ```
/// use confbind::{Binder, EnvTag, FieldType, MergedTree, SchemaDef};
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let tree = MergedTree::try_from(json!({"port": "!ENV PORT 8080"})).unwrap();
/// let schema = SchemaDef::builder("Server")
///     .field("port", FieldType::integer())
///     .build();
///
/// let binder = Binder::with_env(Some(EnvTag::default()), HashMap::new());
/// assert_eq!(binder.bind_schema(&tree, &schema).unwrap(), json!({"port": 8080}));
/// ```
pub struct Binder {
    env_tag: Option<EnvTag>,
    env: Box<dyn EnvSource>,
}

impl Binder {
    /// Creates a binder reading variables from the process environment.
    #[must_use]
    pub fn new(env_tag: Option<EnvTag>) -> Self {
        Self::with_env(env_tag, ProcessEnv)
    }

    /// Creates a binder reading variables from `env`.
    #[must_use]
    pub fn with_env(env_tag: Option<EnvTag>, env: impl EnvSource + 'static) -> Self {
        Self {
            env_tag,
            env: Box::new(env),
        }
    }

    /// The environment tag resolved at primitive positions.
    #[must_use]
    pub fn env_tag(&self) -> Option<&EnvTag> {
        self.env_tag.as_ref()
    }

    /// Binds the whole tree into `T`.
    ///
    /// # Errors
    ///
    /// Returns the first binding error, or [`Error::Construct`] if the bound
    /// value cannot be deserialized into `T`.
    pub fn bind<T: Configurable>(&self, tree: &MergedTree) -> Result<T> {
        let schema = T::schema();
        let value = self.bind_schema(tree, &schema)?;
        serde_json::from_value(value).map_err(|source| Error::Construct {
            schema: schema.name().to_string(),
            source,
        })
    }

    /// Binds the whole tree against `schema`.
    ///
    /// # Errors
    ///
    /// Returns the first binding error.
    pub fn bind_schema(&self, tree: &MergedTree, schema: &SchemaDef) -> Result<Value> {
        log::debug!("binding configuration to {}", schema.name());
        self.populate_fields(tree.as_map(), schema, "")
    }

    /// Populates `ty` from `source`, reporting errors against `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` does not fit `ty`.
    pub fn populate(&self, source: &Value, ty: &FieldType, key: &str) -> Result<Value> {
        match ty {
            FieldType::Any => Ok(source.clone()),
            FieldType::Primitive(primitive) => {
                let resolved = self.resolve_env(source, key)?;
                coerce::coerce(&resolved, *primitive, key)
            }
            FieldType::Optional(_) if source.is_null() => Ok(Value::Null),
            FieldType::Optional(inner) => self.populate(source, inner, key),
            FieldType::Union(members) => self.populate_union(source, members, key),
            FieldType::List(item) => self.populate_list(source, item, key),
            FieldType::Map(value) => self.populate_map(source, value, key),
            FieldType::Object(schema) => self.populate_object(source, &schema.resolve(), key),
        }
    }

    /// Populates a nested schema from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is not a mapping or any field fails.
    pub fn populate_object(&self, source: &Value, schema: &SchemaDef, key: &str) -> Result<Value> {
        match source {
            Value::Object(map) => self.populate_fields(map, schema, key),
            other => Err(Error::invalid(
                key,
                format!(
                    "found incompatible type {} instead of {}",
                    kind_name(other),
                    schema.name()
                ),
            )),
        }
    }

    fn populate_fields(
        &self,
        source: &Map<String, Value>,
        schema: &SchemaDef,
        key: &str,
    ) -> Result<Value> {
        let mut result = Map::with_capacity(schema.fields().len());

        for field in schema.fields() {
            let field_key = child_key(key, &field.name);
            let value = match source.get(&field.name) {
                Some(value) => self.populate(value, &field.ty, &field_key)?,
                None if field.ty.is_optional() => field.default.clone().unwrap_or(Value::Null),
                None => {
                    return Err(Error::invalid(
                        &field_key,
                        format!("could not find key {field_key} in config"),
                    ))
                }
            };
            result.insert(field.name.clone(), value);
        }

        Ok(Value::Object(result))
    }

    fn populate_union(&self, source: &Value, members: &[FieldType], key: &str) -> Result<Value> {
        let mut last_error = None;

        for member in members {
            match self.populate(source, member, key) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    log::debug!("'{key}' did not bind as {member}, trying the next type");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::invalid(key, "union has no member types")))
    }

    fn populate_list(&self, source: &Value, item: &FieldType, key: &str) -> Result<Value> {
        let Value::Array(items) = source else {
            return Err(Error::invalid(
                key,
                format!("found incompatible type {} instead of list", kind_name(source)),
            ));
        };

        items
            .iter()
            .enumerate()
            .map(|(index, value)| self.populate(value, item, &child_key(key, index)))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn populate_map(&self, source: &Value, value_type: &FieldType, key: &str) -> Result<Value> {
        let Value::Object(entries) = source else {
            return Err(Error::invalid(
                key,
                format!("found incompatible type {} instead of mapping", kind_name(source)),
            ));
        };

        let mut result = Map::with_capacity(entries.len());
        for (name, value) in entries {
            let bound = self.populate(value, value_type, &child_key(key, name))?;
            result.insert(name.clone(), bound);
        }
        Ok(Value::Object(result))
    }

    fn resolve_env<'a>(&self, source: &'a Value, key: &str) -> Result<Cow<'a, Value>> {
        if let (Some(tag), Value::String(raw)) = (&self.env_tag, source) {
            if let Some(resolved) = tag.resolve(raw, self.env.as_ref(), key)? {
                return Ok(Cow::Owned(Value::String(resolved)));
            }
        }
        Ok(Cow::Borrowed(source))
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new(Some(EnvTag::default()))
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("env_tag", &self.env_tag)
            .finish_non_exhaustive()
    }
}
