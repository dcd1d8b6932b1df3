//! Mapping trees, their inverse, and the inverter
//!
//! - [`types`] - [`MappingTree`], [`MappingNode`], [`InverseMapping`]
//! - [`inverter`] - [`invert_mapping`] and [`MappingRef`]
//!
//! # Example
//!
//! ```
//! use fieldmap_core::mapping::{invert_mapping, InverseTarget, MappingTree};
//! use serde_json::json;
//!
//! let tree = MappingTree::from_json(&json!({
//!     "user_name": "username",
//!     "contact": { "email_address": "email" }
//! })).unwrap();
//!
//! let inverse = invert_mapping(&tree);
//! assert_eq!(
//!     inverse.get("email"),
//!     Some(&InverseTarget::Path("contact.email_address".to_string()))
//! );
//! ```

pub mod inverter;
pub mod types;


pub use inverter::{invert_mapping, MappingRef};
pub use types::{InverseMapping, InverseTarget, MappingNode, MappingTree};
