//! Environment tag handling.
//!
//! Configuration values may reference environment variables with a tag,
//! `!ENV NAME` or `!ENV NAME default words`. Tags survive loading as plain
//! strings and are only resolved when the binder reaches a primitive field.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::ffi::OsString;
use std::fmt;

use crate::error::{Error, Result};

/// The environment tag used when none is configured.
pub const DEFAULT_ENV_TAG: &str = "!ENV";

/// A read-only source of environment variables.
///
/// The process environment is the usual source; maps are accepted so that
/// binding can be exercised without touching global state.
///
/// # Examples
///
/// ```
/// use confbind::EnvSource;
/// use std::collections::HashMap;
///
/// let mut vars = HashMap::new();
/// vars.insert("PORT".to_string(), "9090".to_string());
/// assert_eq!(vars.var_os("PORT"), Some("9090".into()));
/// assert_eq!(vars.var_os("HOST"), None);
/// ```
pub trait EnvSource {
    /// Looks up a variable, returning `None` when it is not set.
    ///
    /// Values need not be valid Unicode; the caller decides how to treat
    /// ones that are not.
    fn var_os(&self, name: &str) -> Option<OsString>;
}

/// Reads variables from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var_os(&self, name: &str) -> Option<OsString> {
        env::var_os(name)
    }
}

impl EnvSource for HashMap<String, String> {
    fn var_os(&self, name: &str) -> Option<OsString> {
        self.get(name).map(OsString::from)
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var_os(&self, name: &str) -> Option<OsString> {
        self.get(name).map(OsString::from)
    }
}

/// A configured environment tag such as `!ENV`.
///
/// # Examples
///
/// ```
/// use confbind::EnvTag;
///
/// let tag = EnvTag::default();
/// assert!(tag.matches("!ENV HOME"));
/// assert!(!tag.matches("!ENVIRONMENT HOME"));
/// assert_eq!(tag.render_scalar("PORT 8080"), "!ENV PORT 8080");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvTag {
    tag: String,
}

impl EnvTag {
    /// Creates a tag, returning `None` for an empty or whitespace-only string.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Option<Self> {
        let tag = tag.into().trim().to_string();
        if tag.is_empty() {
            None
        } else {
            Some(Self { tag })
        }
    }

    /// The tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// Whether `raw` is a reference using this tag.
    ///
    /// The first whitespace-separated token must equal the tag exactly.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        raw.split_whitespace().next() == Some(self.tag.as_str())
    }

    /// Renders a tagged YAML scalar back into its string form.
    #[must_use]
    pub fn render_scalar(&self, scalar: &str) -> String {
        format!("{} {scalar}", self.tag)
    }

    /// Renders a tagged YAML sequence back into its string form.
    #[must_use]
    pub fn render_sequence<S: AsRef<str>>(&self, items: &[S]) -> String {
        let joined: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
        self.render_scalar(&joined.join(" "))
    }

    /// Resolves a tag reference found at `key`.
    ///
    /// Returns `Ok(None)` when `raw` does not use this tag. Otherwise the
    /// variable's value is returned if set, then the space-joined default
    /// words if any were given.
    ///
    /// A variable that is set to the empty string counts as set: the empty
    /// value is returned and the default words are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEnvironmentVariable`] when the variable is unset
    /// and there is no default, and [`Error::InvalidConfig`] when the tag is
    /// not followed by a variable name or the variable is not valid Unicode.
    pub fn resolve(&self, raw: &str, env: &dyn EnvSource, key: &str) -> Result<Option<String>> {
        let mut words = raw.split_whitespace();
        if words.next() != Some(self.tag.as_str()) {
            return Ok(None);
        }

        let Some(name) = words.next() else {
            return Err(Error::invalid(
                key,
                format!("{} tag is missing a variable name", self.tag),
            ));
        };

        if let Some(raw_value) = env.var_os(name) {
            let value = raw_value.into_string().map_err(|_| {
                Error::invalid(
                    key,
                    format!("environment variable {name} is not valid unicode"),
                )
            })?;
            log::debug!("resolved {name} for key '{key}' from the environment");
            return Ok(Some(value));
        }

        let default: Vec<&str> = words.collect();
        if default.is_empty() {
            return Err(Error::MissingEnvironmentVariable {
                name: name.to_string(),
                key: key.to_string(),
            });
        }

        log::debug!("{name} is unset; using the default for key '{key}'");
        Ok(Some(default.join(" ")))
    }
}

impl Default for EnvTag {
    fn default() -> Self {
        Self {
            tag: DEFAULT_ENV_TAG.to_string(),
        }
    }
}

impl fmt::Display for EnvTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(EnvTag::new("").is_none());
        assert!(EnvTag::new("   ").is_none());
        assert_eq!(EnvTag::new("!SECRET").unwrap().as_str(), "!SECRET");
    }

    #[test]
    fn test_non_tagged_strings_are_untouched() {
        let tag = EnvTag::default();
        let env = vars(&[]);
        assert_eq!(tag.resolve("plain value", &env, "key").unwrap(), None);
        assert_eq!(tag.resolve("", &env, "key").unwrap(), None);
        assert_eq!(tag.resolve("!ENVX PORT", &env, "key").unwrap(), None);
    }

    #[test]
    fn test_resolve_from_environment() {
        let tag = EnvTag::default();
        let env = vars(&[("PORT", "9090")]);
        let resolved = tag.resolve("!ENV PORT 8080", &env, "port").unwrap();
        assert_eq!(resolved, Some("9090".to_string()));
    }

    #[test]
    fn test_resolve_default_words_are_joined() {
        let tag = EnvTag::default();
        let env = vars(&[]);
        let resolved = tag
            .resolve("!ENV GREETING hello   big world", &env, "greeting")
            .unwrap();
        assert_eq!(resolved, Some("hello big world".to_string()));
    }

    #[test]
    fn test_missing_variable_without_default() {
        let tag = EnvTag::default();
        let env = vars(&[]);
        let err = tag.resolve("!ENV TOKEN", &env, "auth.token").unwrap_err();
        match err {
            Error::MissingEnvironmentVariable { name, key } => {
                assert_eq!(name, "TOKEN");
                assert_eq!(key, "auth.token");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_variable_wins_over_default() {
        let tag = EnvTag::default();
        let env = vars(&[("NAME", "")]);
        let resolved = tag.resolve("!ENV NAME fallback", &env, "name").unwrap();
        assert_eq!(resolved, Some(String::new()));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_variable_is_rejected() {
        use std::os::unix::ffi::OsStringExt;

        struct Raw;

        impl EnvSource for Raw {
            fn var_os(&self, _name: &str) -> Option<OsString> {
                Some(OsString::from_vec(vec![b'a', 0xff, b'b']))
            }
        }

        let tag = EnvTag::default();
        let err = tag.resolve("!ENV NAME fallback", &Raw, "service.name").unwrap_err();
        match err {
            Error::InvalidConfig { key, reason } => {
                assert_eq!(key, "service.name");
                assert!(reason.contains("NAME"));
                assert!(reason.contains("unicode"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    #[serial_test::serial]
    fn test_process_env_passes_non_unicode_through() {
        use std::os::unix::ffi::OsStringExt;

        let name = "CONFBIND_TEST_NON_UNICODE";
        env::set_var(name, OsString::from_vec(vec![0xff]));
        let found = ProcessEnv.var_os(name);
        let err = EnvTag::default()
            .resolve(&format!("!ENV {name} fallback"), &ProcessEnv, "key")
            .unwrap_err();
        env::remove_var(name);

        assert_eq!(found, Some(OsString::from_vec(vec![0xff])));
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_tag_without_variable_name() {
        let tag = EnvTag::default();
        let env = vars(&[]);
        let err = tag.resolve("!ENV", &env, "port").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_custom_tag() {
        let tag = EnvTag::new("$env").unwrap();
        let env = vars(&[("USER", "alice")]);
        assert_eq!(
            tag.resolve("$env USER nobody", &env, "user").unwrap(),
            Some("alice".to_string())
        );
        assert_eq!(tag.resolve("!ENV USER", &env, "user").unwrap(), None);
    }

    #[test]
    fn test_render_sequence() {
        let tag = EnvTag::default();
        assert_eq!(
            tag.render_sequence(&["NAME", "default", "words"]),
            "!ENV NAME default words"
        );
    }
}
