//! Failure configurations.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A set of unit names assumed failed.
///
/// Each operating trace is recorded under some configuration of failed
/// units; at simulation time the same type names the current failure
/// frontier. Names are kept sorted so configurations hash and compare
/// canonically. Two values are distinguished: the *empty* configuration
/// (no frontier computed yet, or a freshly rejuvenated spare) and the
/// *fresh* configuration — the sentinel `{""}` under which no unit has
/// failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Configuration(BTreeSet<String>);

impl Configuration {
    /// The empty configuration.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The fresh-system sentinel.
    pub fn fresh() -> Self {
        let mut names = BTreeSet::new();
        names.insert(String::new());
        Self(names)
    }

    /// Build a configuration from a list of failed unit names. An empty
    /// list denotes the fresh system.
    pub fn from_failed<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            Self::fresh()
        } else {
            Self(names)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_fresh(&self) -> bool {
        *self == Self::fresh()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{name}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_fresh_are_distinct() {
        assert_ne!(Configuration::empty(), Configuration::fresh());
        assert!(Configuration::empty().is_empty());
        assert!(!Configuration::fresh().is_empty());
        assert!(Configuration::fresh().is_fresh());
    }

    #[test]
    fn from_failed_maps_no_names_to_fresh() {
        assert!(Configuration::from_failed(Vec::<String>::new()).is_fresh());
        let c = Configuration::from_failed(["core1"]);
        assert!(!c.is_fresh());
        assert!(c.contains("core1"));
    }

    #[test]
    fn name_order_does_not_matter() {
        let a = Configuration::from_failed(["x", "y"]);
        let b = Configuration::from_failed(["y", "x"]);
        assert_eq!(a, b);
    }

    #[test]
    fn displays_sorted_names() {
        let c = Configuration::from_failed(["b", "a"]);
        assert_eq!(c.to_string(), "[a,b]");
        assert_eq!(Configuration::empty().to_string(), "[]");
    }
}
