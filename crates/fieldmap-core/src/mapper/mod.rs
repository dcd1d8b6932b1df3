//! The [`FieldMapper`] facade
//!
//! - [`config`] - [`MapperConfig`], its JSON document form and [`ConfigOverrides`]
//! - [`builder`] - [`FieldMapperBuilder`]
//! - [`core`] - the [`FieldMapper`] handle itself
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

pub mod builder;
pub mod config;
pub mod core;


pub use self::builder::FieldMapperBuilder;
pub use self::config::{ConfigOverrides, MapperConfig, MapperConfigDocument, MapperOptions, OptionsOverride};
pub use self::core::FieldMapper;
