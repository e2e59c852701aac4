// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error-kind hierarchy.
//!
//! Every kind has exactly one parent, up to the root [`BASE_KIND`]. The full
//! chain is stored at registration time so ancestry lookups never walk.

use indexmap::IndexMap;
use thiserror::Error;

/// Root of every error-kind chain.
pub const BASE_KIND: &str = "BaseException";

const BUILTIN_KINDS: &[(&str, &str)] = &[
    ("Exception", BASE_KIND),
    ("ArithmeticError", "Exception"),
    ("ZeroDivisionError", "ArithmeticError"),
    ("OverflowError", "ArithmeticError"),
    ("LookupError", "Exception"),
    ("IndexError", "LookupError"),
    ("KeyError", "LookupError"),
    ("NameError", "Exception"),
    ("TypeError", "Exception"),
    ("ValueError", "Exception"),
    ("AttributeError", "Exception"),
    ("AssertionError", "Exception"),
    ("ImportError", "Exception"),
    ("ModuleNotFoundError", "ImportError"),
    ("RuntimeError", "Exception"),
    ("RecursionError", "RuntimeError"),
    ("NotImplementedError", "RuntimeError"),
    ("SyntaxError", "Exception"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KindError {
    #[error("error kind `{0}` is already registered")]
    AlreadyRegistered(String),

    #[error("cannot register `{name}`: unknown parent kind `{parent}`")]
    UnknownParent { name: String, parent: String },
}

/// Registry mapping kind names to their ancestry, most specific first.
#[derive(Debug, Clone)]
pub struct ErrorKindRegistry {
    chains: IndexMap<String, Vec<String>>,
}

impl Default for ErrorKindRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ErrorKindRegistry {
    /// A registry holding only the root kind.
    pub fn empty() -> Self {
        let mut chains = IndexMap::new();
        chains.insert(BASE_KIND.to_string(), vec![BASE_KIND.to_string()]);
        Self { chains }
    }

    /// A registry with the standard hierarchy.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for (name, parent) in BUILTIN_KINDS {
            // The table is ordered parents-first.
            let registered = registry.register(name, parent);
            debug_assert!(registered.is_ok(), "builtin kind table: {registered:?}");
        }
        registry
    }

    pub fn register(&mut self, name: &str, parent: &str) -> Result<(), KindError> {
        if self.chains.contains_key(name) {
            return Err(KindError::AlreadyRegistered(name.to_string()));
        }
        let Some(parent_chain) = self.chains.get(parent) else {
            return Err(KindError::UnknownParent {
                name: name.to_string(),
                parent: parent.to_string(),
            });
        };
        let mut chain = Vec::with_capacity(parent_chain.len() + 1);
        chain.push(name.to_string());
        chain.extend(parent_chain.iter().cloned());
        self.chains.insert(name.to_string(), chain);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.chains.contains_key(name)
    }

    /// The kind followed by each of its ancestors up to the root.
    pub fn ancestry(&self, name: &str) -> Option<&[String]> {
        self.chains.get(name).map(Vec::as_slice)
    }

    /// Whether `name` is `ancestor` or descends from it.
    pub fn is_subkind(&self, name: &str, ancestor: &str) -> bool {
        self.ancestry(name)
            .is_some_and(|chain| chain.iter().any(|k| k == ancestor))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_chain() {
        let kinds = ErrorKindRegistry::with_builtins();
        assert_eq!(
            kinds.ancestry("ZeroDivisionError").unwrap(),
            ["ZeroDivisionError", "ArithmeticError", "Exception", "BaseException"]
        );
        assert!(kinds.is_subkind("KeyError", "LookupError"));
        assert!(!kinds.is_subkind("KeyError", "IndexError"));
        assert!(kinds.is_subkind("ValueError", "ValueError"));
    }

    #[test]
    fn every_builtin_kind_reaches_the_root() {
        let kinds = ErrorKindRegistry::with_builtins();
        assert_eq!(kinds.names().count(), BUILTIN_KINDS.len() + 1);
        for (name, parent) in BUILTIN_KINDS {
            let chain = kinds.ancestry(name).unwrap();
            assert_eq!(chain[1], *parent);
            assert_eq!(chain.last().map(String::as_str), Some(BASE_KIND));
        }
    }

    #[test]
    fn host_registered_kind() {
        let mut kinds = ErrorKindRegistry::with_builtins();
        kinds.register("CustomError", "ValueError").unwrap();
        assert_eq!(
            kinds.ancestry("CustomError").unwrap(),
            ["CustomError", "ValueError", "Exception", "BaseException"]
        );
    }

    #[test]
    fn registration_errors() {
        let mut kinds = ErrorKindRegistry::with_builtins();
        assert_eq!(
            kinds.register("ValueError", "Exception"),
            Err(KindError::AlreadyRegistered("ValueError".to_string()))
        );
        assert!(matches!(
            kinds.register("Orphan", "NoSuchKind"),
            Err(KindError::UnknownParent { .. })
        ));
        assert!(kinds.ancestry("NoSuchKind").is_none());
    }
}
