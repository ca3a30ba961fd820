// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    /// The entity is not in a state that permits the requested action.
    /// Always names the offending entity by instance name.
    #[error("configuration error in '{instance}': {reason}")]
    Configuration { instance: String, reason: String },

    /// A persisted media type name could not be resolved against the
    /// owning module's type registry.
    #[error("media type '{0}' is not registered")]
    MediaTypeNotFound(String),

    /// A caller passed a disallowed value to a setter or operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Registration conflict in a module-level registry.
    #[error("registry error: {0}")]
    Registry(String),

    /// Lookup of a component kind or component instance failed.
    #[error("not found: {0}")]
    NotFound(String),

    /// Config store read or parse failure.
    #[error("config store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HarvestError {
    /// Shorthand for a configuration error naming the offending entity.
    pub fn configuration(instance: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            instance: instance.into(),
            reason: reason.into(),
        }
    }

    /// True for configuration-class errors, including unresolved media
    /// types (which specialize the configuration failure mode).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HarvestError::Configuration { .. } | HarvestError::MediaTypeNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
