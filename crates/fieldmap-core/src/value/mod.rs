//! Value trees and the generic operations every other component builds on
//!
//! - [`types`] - the [`Value`] tree and its kinds
//! - [`json`] - interop with `serde_json::Value`
//! - [`ops`] - dotted-path get/set, deep merge, flatten/unflatten
//!
//! `Value` owns its whole tree, so `Clone` is a deep clone that shares nothing with the
//! original.

pub mod json;
pub mod ops;
pub mod types;


pub use ops::{deep_merge, flatten, get_path, is_record, join_path, set_path, unflatten};
pub use types::{Record, Value, ValueKind};
