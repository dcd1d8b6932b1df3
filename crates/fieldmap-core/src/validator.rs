//! Caller-supplied validation hook for payload builders
//!
//! The engine does no schema validation of its own. A [`Validator`] is consulted by
//! `build_patch` (against the change tree) and `build_post`/`build_put` (against the merged
//! form data); a rejection surfaces as [`Error::Validation`].
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use crate::value::Value;
use crate::{Error, Result};

/// Outcome in `{ valid, errors }` form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            valid: false,
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ValidationOutcome> for std::result::Result<(), Vec<String>> {
    fn from(outcome: ValidationOutcome) -> Self {
        if outcome.valid {
            Ok(())
        } else {
            Err(outcome.errors)
        }
    }
}

/// Validation capability injected by the caller
pub trait Validator: Send + Sync {
    /// `Err` carries the messages describing why `value` was rejected
    fn validate(&self, value: &Value) -> std::result::Result<(), Vec<String>>;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> std::result::Result<(), Vec<String>> + Send + Sync,
{
    fn validate(&self, value: &Value) -> std::result::Result<(), Vec<String>> {
        self(value)
    }
}

/// Run an optional validator, converting a rejection into [`Error::Validation`]
pub(crate) fn ensure_valid(validator: Option<&dyn Validator>, value: &Value) -> Result<()> {
    let Some(validator) = validator else {
        return Ok(());
    };
    validator.validate(value).map_err(|messages| {
        tracing::debug!(errors = messages.len(), "validator rejected payload input");
        Error::Validation { messages }
    })
}
