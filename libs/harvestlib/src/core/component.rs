// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Component configuration base contract.
//!
//! Every configuration entity embeds a [`ComponentCore`] for its shared
//! state and implements the object-safe [`ComponentConfig`] trait, which
//! is the only surface the module loader and the interactive console see.

use std::any::Any;

use crate::core::error::Result;
use crate::core::operation::OperationDescriptor;
use crate::core::store::ConfigSection;

/// Shared state of every configuration entity: the externally assigned
/// instance identity plus the base load/save hooks.
///
/// Entity load and save implementations must run the base hooks before
/// touching their own keys, so shared behavior always precedes
/// entity-specific fields.
#[derive(Debug, Clone)]
pub struct ComponentCore {
    instance_name: String,
}

impl ComponentCore {
    pub fn new(instance_name: impl Into<String>) -> Self {
        Self {
            instance_name: instance_name.into(),
        }
    }

    /// Identity assigned at creation; immutable and unique within the
    /// owning module.
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    /// Base display name. Entities typically append an annotation of
    /// their own (see `MediaPathConfig::ui_name`).
    pub fn ui_name(&self) -> String {
        self.instance_name.clone()
    }

    /// Base load hook. No shared fields are persisted today; any future
    /// shared field is read here, before entity-specific keys.
    pub fn load_from(&mut self, _section: &ConfigSection) -> Result<()> {
        tracing::debug!(instance = %self.instance_name, "loading component configuration");
        Ok(())
    }

    /// Base save hook; mirrors [`ComponentCore::load_from`].
    pub fn save_to(&self, _section: &mut ConfigSection) -> Result<()> {
        tracing::debug!(instance = %self.instance_name, "saving component configuration");
        Ok(())
    }
}

/// Object-safe contract implemented by every configuration entity.
///
/// Covers identity and display, the reset/load/save lifecycle, and the
/// erased console surface: operation discovery and dispatch without
/// knowledge of the concrete entity type.
pub trait ComponentConfig: Send + std::fmt::Debug {
    fn instance_name(&self) -> &str;

    /// Human-readable identification; never empty.
    fn ui_name(&self) -> String;

    fn ui_description(&self) -> String;

    /// Kind name this entity registers under in its module's kind
    /// registry. Persisted by module save passes so load passes can
    /// recreate the entity through the right factory.
    fn kind_name(&self) -> &'static str;

    /// Restore every field to its default. Idempotent; repeated calls
    /// leave no residual state.
    fn reset(&mut self);

    /// Merge this entity's keys from `section` into current state. Call
    /// after [`ComponentConfig::reset`] for a clean load. A failed load
    /// leaves the entity invalid; callers must not keep using it.
    fn load_from(&mut self, section: &ConfigSection) -> Result<()>;

    /// Write this entity's keys into `section`, field-for-field the
    /// mirror of [`ComponentConfig::load_from`].
    fn save_to(&self, section: &mut ConfigSection) -> Result<()>;

    /// Console discovery listing for this entity's setup operations.
    fn operation_descriptors(&self) -> Vec<OperationDescriptor>;

    /// Name of the operation a console should run first for a brand-new
    /// entity, when one is designated.
    fn creation_operation(&self) -> Option<String>;

    /// Dispatch a setup operation by name.
    fn execute_operation(&mut self, name: &str, args: &[String]) -> Result<String>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
