// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Configuration modules.
//!
//! A [`ConfigModule`] is the unit a loader plugs into the framework. It
//! supplies the closed set of media types paths can bind to, the set of
//! component-configuration kinds it can materialize (each with a unique
//! kind name and human description for discovery listings), and owns the
//! live component instances, keyed by their unique instance names.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::component::ComponentConfig;
use crate::core::error::{HarvestError, Result};
use crate::core::media::media_type::MediaTypeRegistry;
use crate::core::store::ConfigSection;

/// Store key recording which kind a persisted component section belongs
/// to, so load passes can recreate the entity through the right factory.
pub const CKEY_KIND: &str = "kind";

/// Construction context handed to component factories.
pub struct ComponentInit {
    pub instance_name: String,
    pub media_types: Arc<MediaTypeRegistry>,
}

/// Factory producing a fresh, default-state configuration entity.
pub type ComponentFactory = Arc<dyn Fn(ComponentInit) -> Box<dyn ComponentConfig> + Send + Sync>;

/// A registrable component-configuration kind.
#[derive(Clone)]
pub struct ComponentKind {
    name: String,
    description: String,
    factory: ComponentFactory,
}

impl ComponentKind {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        factory: ComponentFactory,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn create(&self, init: ComponentInit) -> Box<dyn ComponentConfig> {
        (self.factory)(init)
    }
}

/// Name/description pair for kind discovery listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindDescriptor {
    pub name: String,
    pub description: String,
}

/// Inventory entry for compile-time component kind registration.
///
/// Submitted by [`register_component_kind!`](crate::register_component_kind);
/// collected by [`ConfigModule::register_submitted`].
pub struct ComponentKindRegistration {
    pub constructor: fn() -> ComponentKind,
}

inventory::collect!(ComponentKindRegistration);

/// Register a component kind at compile time. The type must provide an
/// inherent `kind() -> ComponentKind` constructor.
#[macro_export]
macro_rules! register_component_kind {
    ($config_type:ty) => {
        $crate::inventory::submit! {
            $crate::core::module::ComponentKindRegistration {
                constructor: <$config_type>::kind,
            }
        }
    };
}

pub struct ConfigModule {
    name: String,
    description: String,
    media_types: Arc<MediaTypeRegistry>,
    kinds: HashMap<String, ComponentKind>,
    components: HashMap<String, Box<dyn ComponentConfig>>,
}

impl ConfigModule {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            media_types: Arc::new(MediaTypeRegistry::new()),
            kinds: HashMap::new(),
            components: HashMap::new(),
        }
    }

    pub fn ui_name(&self) -> &str {
        &self.name
    }

    pub fn ui_description(&self) -> &str {
        &self.description
    }

    /// The closed set of media types this module's paths can bind.
    pub fn media_types(&self) -> Arc<MediaTypeRegistry> {
        Arc::clone(&self.media_types)
    }

    /// Register a media type with this module.
    pub fn register_media_type<M: crate::core::media::MediaType>(&self) -> Result<()> {
        self.media_types.register::<M>()
    }

    /// Register a component kind. Kind names are unique per module.
    pub fn register_component_kind(&mut self, kind: ComponentKind) -> Result<()> {
        if self.kinds.contains_key(kind.name()) {
            return Err(HarvestError::Registry(format!(
                "component kind '{}' is already registered in module '{}'",
                kind.name(),
                self.name
            )));
        }
        tracing::debug!(module = %self.name, kind = kind.name(), "registered component kind");
        self.kinds.insert(kind.name().to_string(), kind);
        Ok(())
    }

    /// Pull in every media type and component kind submitted at compile
    /// time. Duplicates are skipped with a warning, so modules can layer
    /// explicit registrations on top.
    pub fn register_submitted(&mut self) {
        for registration in
            inventory::iter::<crate::core::media::media_type::MediaTypeRegistration>
        {
            let media_type = (registration.constructor)();
            let name = media_type.name();
            if let Err(e) = self.media_types.register_ref(media_type) {
                tracing::warn!("skipping submitted media type '{}': {}", name, e);
            }
        }
        for registration in inventory::iter::<ComponentKindRegistration> {
            let kind = (registration.constructor)();
            let name = kind.name().to_string();
            if let Err(e) = self.register_component_kind(kind) {
                tracing::warn!("skipping submitted component kind '{}': {}", name, e);
            }
        }
        tracing::info!(
            module = %self.name,
            media_types = self.media_types.len(),
            kinds = self.kinds.len(),
            "collected compile-time registrations"
        );
    }

    /// Kind discovery listing, sorted by name.
    pub fn component_kinds(&self) -> Vec<KindDescriptor> {
        let mut kinds: Vec<KindDescriptor> = self
            .kinds
            .values()
            .map(|kind| KindDescriptor {
                name: kind.name().to_string(),
                description: kind.description().to_string(),
            })
            .collect();
        kinds.sort_by(|a, b| a.name.cmp(&b.name));
        kinds
    }

    /// Materialize a new component of `kind_name` under a unique
    /// instance name. The returned entity is in default state; consoles
    /// should run its creation operation first.
    pub fn create_component(
        &mut self,
        kind_name: &str,
        instance_name: impl Into<String>,
    ) -> Result<&mut dyn ComponentConfig> {
        let instance_name = instance_name.into();
        if self.components.contains_key(&instance_name) {
            return Err(HarvestError::Registry(format!(
                "component '{}' already exists in module '{}'",
                instance_name, self.name
            )));
        }
        let kind = self.kinds.get(kind_name).ok_or_else(|| {
            HarvestError::NotFound(format!(
                "component kind '{}' is not registered in module '{}'",
                kind_name, self.name
            ))
        })?;

        let component = kind.create(ComponentInit {
            instance_name: instance_name.clone(),
            media_types: Arc::clone(&self.media_types),
        });
        tracing::debug!(module = %self.name, kind = kind_name, instance = %instance_name, "created component");

        self.components.insert(instance_name.clone(), component);
        Ok(self
            .components
            .get_mut(&instance_name)
            .map(Box::as_mut)
            .expect("component was just inserted"))
    }

    pub fn remove_component(&mut self, instance_name: &str) -> bool {
        self.components.remove(instance_name).is_some()
    }

    pub fn component(&self, instance_name: &str) -> Option<&dyn ComponentConfig> {
        self.components.get(instance_name).map(Box::as_ref)
    }

    pub fn component_mut(&mut self, instance_name: &str) -> Option<&mut (dyn ComponentConfig + 'static)> {
        self.components.get_mut(instance_name).map(Box::as_mut)
    }

    /// Instance names, sorted for stable listings.
    pub fn component_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.components.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Write every component into its own child section of `section`,
    /// keyed by instance name, with the kind recorded for reload.
    pub fn save_components_to(&self, section: &mut ConfigSection) -> Result<()> {
        for name in self.component_names() {
            let component = self
                .components
                .get(&name)
                .expect("component_names lists existing components");
            let child = section.child_mut(&name);
            child.set_property(CKEY_KIND, component.kind_name());
            component.save_to(child)?;
        }
        Ok(())
    }

    /// Load (or recreate) components from the child sections of
    /// `section`. Existing entities are reset before loading; missing
    /// ones are created through their recorded kind's factory.
    ///
    /// A failing entity aborts the pass with its error. The entity is
    /// left reset-plus-partially-loaded and must be treated as invalid by
    /// the caller; nothing is auto-corrected.
    pub fn load_components_from(&mut self, section: &ConfigSection) -> Result<()> {
        for (name, child) in section.children() {
            let kind_name = child.get_string(CKEY_KIND).ok_or_else(|| {
                HarvestError::Store(format!("component section '{}' has no '{}' key", name, CKEY_KIND))
            })?;
            let kind_name = kind_name.to_string();

            match self.components.get(name) {
                Some(component) if component.kind_name() != kind_name => {
                    return Err(HarvestError::configuration(
                        name,
                        format!(
                            "persisted kind '{}' does not match existing kind '{}'",
                            kind_name,
                            component.kind_name()
                        ),
                    ));
                }
                Some(_) => {}
                None => {
                    self.create_component(&kind_name, name)?;
                }
            }

            let component = self
                .components
                .get_mut(name)
                .expect("component exists after creation");
            component.reset();
            component.load_from(child)?;
        }
        Ok(())
    }
}
