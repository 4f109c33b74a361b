//! Namespaced symbols.
//!
//! Every attribute ident, schema key and enumerated schema value in the
//! target store is a keyword such as `:db.type/string` or `:mouse/name`.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A (possibly namespaced) keyword, rendered as `:ns/name`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Keyword {
    namespace: Option<String>,
    name: String,
}

impl Keyword {
    /// Create a keyword without a namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// Create a namespaced keyword.
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    /// The namespace part, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The name part.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Join a namespace and an attribute name into a keyword.
///
/// `namespace("mouse", "tags")` is `:mouse/tags`.
pub fn namespace(ns: &str, attr: &str) -> Keyword {
    Keyword::namespaced(ns, attr)
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, ":{}/{}", ns, self.name),
            None => write!(f, ":{}", self.name),
        }
    }
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyword({})", self)
    }
}

impl FromStr for Keyword {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix(':').unwrap_or(s);
        if body.is_empty() || body.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidKeyword(s.to_string()));
        }

        match body.split_once('/') {
            Some((ns, name)) if !ns.is_empty() && !name.is_empty() => {
                Ok(Self::namespaced(ns, name))
            }
            Some(_) => Err(CoreError::InvalidKeyword(s.to_string())),
            None => Ok(Self::new(body)),
        }
    }
}

impl Serialize for Keyword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Keyword {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_display() {
        assert_eq!(Keyword::namespaced("db.type", "string").to_string(), ":db.type/string");
        assert_eq!(Keyword::new("fast").to_string(), ":fast");
    }

    #[test]
    fn test_keyword_parse() {
        let kw: Keyword = ":db.fn/retractEntity".parse().unwrap();
        assert_eq!(kw.namespace(), Some("db.fn"));
        assert_eq!(kw.name(), "retractEntity");

        let bare: Keyword = "sneaky".parse().unwrap();
        assert_eq!(bare, Keyword::new("sneaky"));
    }

    #[test]
    fn test_keyword_parse_rejects_malformed() {
        for bad in ["", ":", ":/name", ":ns/", "two words"] {
            assert!(matches!(
                bad.parse::<Keyword>(),
                Err(CoreError::InvalidKeyword(_))
            ));
        }
    }

    #[test]
    fn test_namespace_join() {
        let kw = namespace("person.user", "email");
        assert_eq!(kw.to_string(), ":person.user/email");
    }

    #[test]
    fn test_keyword_serde_as_string() {
        let kw = Keyword::namespaced("mouse", "tags");
        let json = serde_json::to_string(&kw).unwrap();
        assert_eq!(json, "\":mouse/tags\"");

        let back: Keyword = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kw);
    }
}
