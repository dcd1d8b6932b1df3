//! Fieldmap Core - bidirectional field mapping and patch payload building
//!
//! This crate translates between two differently-shaped representations of the same record,
//! a retrieval (read) schema and a submission (write) schema, and computes minimal change
//! payloads for partial updates.
//!
//! # Main Components
//!
//! - **Values**: the [`Value`] tree with an explicit absent/null distinction and path utilities
//! - **Mapping**: authored [`MappingTree`]s and their derived [`InverseMapping`]
//! - **Normalizer / Denormalizer**: source to target shape and back, with coercion, defaults,
//!   per-field transforms and omission rules
//! - **Differ**: structural change trees and changed-path lists
//! - **Payload Builder**: patch, post, put and partial payloads
//! - **Mapper**: the [`FieldMapper`] facade binding one configuration
//! - **Error Handling**: error types using `thiserror` and `anyhow`
//!
//! # Example
//!
//! ```
//! use fieldmap_core::{FieldMapper, MappingTree, Result, Value};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let mapping = MappingTree::from_json(&json!({
//!         "user_name": "username",
//!         "contact": { "email_address": "email" }
//!     }))?;
//!     let mapper = FieldMapper::builder(mapping).build()?;
//!
//!     let initial = Value::from(json!({"username": "j", "email": "e"}));
//!     let current = Value::from(json!({"username": "j", "email": "e2"}));
//!
//!     let patch = mapper.build_patch(&initial, &current)?;
//!     assert_eq!(
//!         patch.map(|p| p.to_json()),
//!         Some(json!({"contact": {"email_address": "e2"}}))
//!     );
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod denormalizer;
pub mod differ;
pub mod error;
pub mod mapper;
pub mod mapping;
pub mod normalizer;
pub mod payload;
pub mod transform;
pub mod validator;
pub mod value;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use value::{deep_merge, flatten, get_path, is_record, set_path, unflatten, Record, Value, ValueKind};

pub use mapping::{invert_mapping, InverseMapping, InverseTarget, MappingNode, MappingRef, MappingTree};

pub use denormalizer::{denormalize, DenormalizeOptions};
pub use normalizer::{normalize, NormalizeOptions};
pub use transform::{BuiltInTransform, Transform, TransformContext, TransformDirection, TransformRegistry};
pub use validator::{ValidationOutcome, Validator};

pub use differ::{changed_paths, diff, has_changes, is_equal, DiffOptions, DiffSummary, Differ};
pub use payload::{build_partial, build_patch, build_post, build_put, PayloadOptions};

pub use mapper::{ConfigOverrides, FieldMapper, FieldMapperBuilder, MapperConfig, MapperOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_creation() {
        let err = Error::configuration("Test error");
        assert!(err.to_string().contains("Test error"));
    }
}
