use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sandbox runtime identifier and version for one language.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSpec {
    /// Runtime name as the sandbox knows it (e.g. "g++", "python").
    pub runtime: String,
    /// Exact runtime version to request.
    pub version: String,
}

/// Language identifier -> runtime mapping.
///
/// Injected into the client at construction so deployments can change the
/// table without touching judging logic, and tests can supply a fake one.
#[derive(Clone, Debug)]
pub struct RuntimeMap {
    entries: HashMap<String, RuntimeSpec>,
}

impl RuntimeMap {
    pub fn new(entries: HashMap<String, RuntimeSpec>) -> Self {
        Self { entries }
    }

    /// Look up the runtime for a language identifier.
    pub fn resolve(&self, language: &str) -> Option<&RuntimeSpec> {
        self.entries.get(language)
    }

    pub fn supports(&self, language: &str) -> bool {
        self.entries.contains_key(language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with(lang: &str) -> RuntimeMap {
        RuntimeMap::new(HashMap::from([(
            lang.to_string(),
            RuntimeSpec {
                runtime: "python".into(),
                version: "3.10.0".into(),
            },
        )]))
    }

    #[test]
    fn test_resolve_known_language() {
        let map = map_with("python");
        assert_eq!(map.resolve("python").unwrap().runtime, "python");
        assert!(map.supports("python"));
    }

    #[test]
    fn test_unknown_language_is_unmapped() {
        let map = map_with("python");
        assert!(map.resolve("cobol").is_none());
        assert!(!map.supports("cobol"));
    }
}
