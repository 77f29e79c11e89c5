//! Wire-format type codes
//!
//! Serializable types are identified on the wire by the hash of their type
//! name, so peers agree on discriminators without a centrally assigned
//! numbering. The hash gives no injectivity guarantee; consumers that map
//! codes back to types register them through [`CodeTable`], which rejects
//! collisions at registration time.

use super::hash_string;
use std::collections::HashMap;

/// Assign the wire code for a serializable type.
///
/// This is just [`hash_string`] of the type name. Two distinct names
/// colliding is astronomically unlikely but not impossible; do not rely on
/// this where adversarial collisions matter.
pub fn type_code(type_name: &str) -> u64 {
    hash_string(type_name)
}

/// A registered type whose code collides with a different, already
/// registered type. This is a configuration error: one of the two names
/// has to change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("wire code {code} for type `{incoming}` collides with registered type `{existing}`")]
pub struct CodeCollisionError {
    pub code: u64,
    pub incoming: String,
    pub existing: String,
}

/// Registration-time code→type table.
///
/// Guarantees that the code→type mapping is injective over the set of types
/// actually registered, which the raw hash cannot.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    codes: HashMap<u64, String>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type name and return its wire code.
    ///
    /// Re-registering the same name is idempotent. A different name hashing
    /// to an occupied code is rejected.
    pub fn register(&mut self, type_name: &str) -> Result<u64, CodeCollisionError> {
        let code = type_code(type_name);
        match self.codes.get(&code) {
            Some(existing) if existing == type_name => Ok(code),
            Some(existing) => Err(CodeCollisionError {
                code,
                incoming: type_name.to_string(),
                existing: existing.clone(),
            }),
            None => {
                self.codes.insert(code, type_name.to_string());
                Ok(code)
            }
        }
    }

    /// Look up the type name registered under a wire code.
    pub fn type_name(&self, code: u64) -> Option<&str> {
        self.codes.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_name_hash() {
        assert_eq!(type_code("PipelineState"), hash_string("PipelineState"));
        assert_eq!(type_code("VocabState"), 1933005582622406798);
        assert_eq!(type_code("StatePointer"), 1099652502310973410);
    }

    #[test]
    fn test_register_and_lookup() {
        let mut table = CodeTable::new();
        let code = table.register("TokenizerState").unwrap();
        assert_eq!(code, 920898987725570619);
        assert_eq!(table.type_name(code), Some("TokenizerState"));
        assert_eq!(table.type_name(code + 1), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_reregistration_is_idempotent() {
        let mut table = CodeTable::new();
        let first = table.register("TagList").unwrap();
        let second = table.register("TagList").unwrap();
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_collision_is_rejected() {
        let mut table = CodeTable::new();
        table.register("VocabState").unwrap();
        // Same code, different name: forge the situation by pre-seeding the
        // slot, since finding a real xxh64 collision is not practical here.
        let code = type_code("VocabState");
        table.codes.insert(code, "SomethingElse".to_string());
        let err = table.register("VocabState").unwrap_err();
        assert_eq!(err.code, code);
        assert_eq!(err.existing, "SomethingElse");
        assert_eq!(err.incoming, "VocabState");
    }
}
