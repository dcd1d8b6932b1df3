//! Per-field transforms applied while normalizing and denormalizing
//!
//! - [`types`] - the [`Transform`] hook, its context, and the [`TransformRegistry`]
//! - [`built_in`] - pre-configured transforms for common conversions
//!
//! # Examples
//!
//! ```
//! use fieldmap_core::transform::{built_in, TransformContext, TransformRegistry};
//! use fieldmap_core::Value;
//!
//! let mut transforms = TransformRegistry::new();
//! transforms.insert("status", built_in::enum_mapping([("A", "active")], None));
//! transforms.insert_fn("email", |value: Value, _ctx: &TransformContext<'_>| match value {
//!     Value::String(s) => Value::String(s.to_lowercase()),
//!     other => other,
//! });
//!
//! assert!(transforms.contains("status"));
//! assert_eq!(transforms.len(), 2);
//! ```
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

pub mod built_in;
pub mod types;

pub use built_in::BuiltInTransform;
pub(crate) use types::apply_optional;
pub use types::{Transform, TransformContext, TransformDirection, TransformRegistry};
