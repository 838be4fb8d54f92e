//! Built-in file format readers.
//!
//! JSON is always available. YAML is compiled in with the `yaml` feature;
//! YAML documents are converted into the same value tree as JSON, with
//! environment-tagged nodes turned back into their string form so that
//! resolution can happen at bind time.

use std::io::Read;

use serde_json::Value;

#[cfg(feature = "yaml")]
use crate::environment::EnvTag;
use crate::error::Result;

/// A function that reads one configuration file into a value tree.
pub type FileLoaderFn = Box<dyn Fn(&mut dyn Read) -> Result<Value>>;

/// Extensions handled by the YAML reader.
pub const YAML_EXTENSIONS: [&str; 2] = [".yml", ".yaml"];

/// Whether YAML support was compiled in.
pub const YAML_AVAILABLE: bool = cfg!(feature = "yaml");

/// Whether `extension` names a YAML file.
#[must_use]
pub fn is_yaml_extension(extension: &str) -> bool {
    YAML_EXTENSIONS.contains(&extension)
}

/// Reader for `.json` files.
pub(crate) fn json_loader() -> FileLoaderFn {
    Box::new(|reader: &mut dyn Read| Ok(serde_json::from_reader(reader)?))
}

/// Reader for `.yml` and `.yaml` files.
#[cfg(feature = "yaml")]
pub(crate) fn yaml_loader(env_tag: Option<EnvTag>) -> FileLoaderFn {
    Box::new(move |reader: &mut dyn Read| {
        let document: serde_yaml::Value = serde_yaml::from_reader(reader)?;
        yaml::to_value(document, env_tag.as_ref(), "")
    })
}

#[cfg(feature = "yaml")]
mod yaml {
    use serde_json::{Map, Number, Value};
    use serde_yaml::value::{Tag, TaggedValue};

    use crate::environment::EnvTag;
    use crate::error::{Error, Result};
    use crate::tree::child_key;

    /// Converts a YAML document into a JSON value tree.
    pub(super) fn to_value(
        value: serde_yaml::Value,
        env_tag: Option<&EnvTag>,
        key: &str,
    ) -> Result<Value> {
        Ok(match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => number(&n, key)?,
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(items) => Value::Array(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| to_value(item, env_tag, &child_key(key, index)))
                    .collect::<Result<_>>()?,
            ),
            serde_yaml::Value::Mapping(mapping) => {
                let mut map = Map::with_capacity(mapping.len());
                for (k, v) in mapping {
                    let name = mapping_key(k, key)?;
                    let converted = to_value(v, env_tag, &child_key(key, &name))?;
                    map.insert(name, converted);
                }
                Value::Object(map)
            }
            serde_yaml::Value::Tagged(tagged) => tagged_value(*tagged, env_tag, key)?,
        })
    }

    fn number(n: &serde_yaml::Number, key: &str) -> Result<Value> {
        if let Some(i) = n.as_i64() {
            return Ok(Value::from(i));
        }
        if let Some(u) = n.as_u64() {
            return Ok(Value::from(u));
        }
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| Error::invalid(key, format!("non-finite number {n} is not supported")))
    }

    fn mapping_key(key: serde_yaml::Value, parent: &str) -> Result<String> {
        match key {
            serde_yaml::Value::String(s) => Ok(s),
            serde_yaml::Value::Number(n) => Ok(n.to_string()),
            serde_yaml::Value::Bool(b) => Ok(b.to_string()),
            serde_yaml::Value::Null => Ok("null".to_string()),
            _ => Err(Error::invalid(parent, "mapping keys must be scalars")),
        }
    }

    /// Renders a scalar the way it appeared in the document.
    fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
        match value {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            serde_yaml::Value::Null => Some(String::new()),
            _ => None,
        }
    }

    fn tagged_value(tagged: TaggedValue, env_tag: Option<&EnvTag>, key: &str) -> Result<Value> {
        let Some(env_tag) = env_tag.filter(|t| tagged.tag == Tag::new(t.as_str())) else {
            return Err(Error::invalid(
                key,
                format!("unsupported YAML tag {}", tagged.tag),
            ));
        };

        if let Some(text) = scalar_text(&tagged.value) {
            return Ok(Value::String(env_tag.render_scalar(text.trim())));
        }

        if let serde_yaml::Value::Sequence(items) = &tagged.value {
            let words = items
                .iter()
                .map(|item| {
                    scalar_text(item).ok_or_else(|| {
                        Error::invalid(key, format!("{env_tag} sequences may only hold scalars"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(Value::String(env_tag.render_sequence(&words)));
        }

        Err(Error::invalid(
            key,
            format!("{env_tag} can only tag scalars or sequences"),
        ))
    }
}
