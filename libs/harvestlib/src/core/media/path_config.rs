// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! The media-path configuration entity.
//!
//! A media path maps a set of source names and an ordered list of
//! processor names onto one bound media type. The entity is created empty
//! by its module, mutated interactively through setup operations (or
//! directly through the typed API), persisted to a [`ConfigSection`], and
//! finally converted into a strongly typed runtime [`MediaPath`] once a
//! media type is bound.
//!
//! [`MediaPath`]: crate::core::media::path::MediaPath

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::core::component::{ComponentConfig, ComponentCore};
use crate::core::error::{HarvestError, Result};
use crate::core::media::media_type::{MediaTypeRef, MediaTypeRegistry};
use crate::core::media::path::DynMediaPath;
use crate::core::media::path_ops::{
    AddProcessorOperation, AddSourceOperation, ListProcessorsOperation, ListSourcesOperation,
    RemoveProcessorOperation, RemoveSourceOperation, SetDescriptionOperation, SetMediaOperation,
    SetRejectableOperation,
};
use crate::core::module::{ComponentInit, ComponentKind};
use crate::core::operation::{OperationDescriptor, OperationRegistry};
use crate::core::store::ConfigSection;

pub const CKEY_SOURCE: &str = "source";
pub const CKEY_PROCESSOR: &str = "processor";
pub const CKEY_MEDIA_CLASS: &str = "mediaClass";
pub const CKEY_REJECTABLE: &str = "rejectable";
pub const CKEY_DESCRIPTION: &str = "description";

pub struct MediaPathConfig {
    core: ComponentCore,
    media_types: Arc<MediaTypeRegistry>,
    media_type: Option<MediaTypeRef>,
    sources: HashSet<String>,
    processors: Vec<String>,
    /// Derived alias map, maintained solely by [`MediaPathConfig::set_media_type`]:
    /// the identity alias `""` maps to the bound type's canonical name
    /// while a type is bound. Never persisted; re-derived from
    /// `mediaClass` on load.
    processor_aliases: HashMap<String, String>,
    rejectable: bool,
    description: String,
    operations: OperationRegistry<MediaPathConfig>,
}

impl std::fmt::Debug for MediaPathConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaPathConfig")
            .field("instance_name", &self.core.instance_name())
            .field("rejectable", &self.rejectable)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl MediaPathConfig {
    pub const TNAME: &'static str = "MediaPath";
    pub const TDESC: &'static str =
        "Define a mapping of media source inputs to media processors";

    pub fn new(instance_name: impl Into<String>, media_types: Arc<MediaTypeRegistry>) -> Self {
        let core = ComponentCore::new(instance_name);
        let mut operations = OperationRegistry::new(core.instance_name());
        Self::register_default_operations(&mut operations)
            .expect("default operation names are unique");

        Self {
            core,
            media_types,
            media_type: None,
            sources: HashSet::new(),
            processors: Vec::new(),
            processor_aliases: HashMap::new(),
            rejectable: false,
            description: String::new(),
            operations,
        }
    }

    fn register_default_operations(ops: &mut OperationRegistry<MediaPathConfig>) -> Result<()> {
        // manipulate processors
        ops.register(Arc::new(AddProcessorOperation))?;
        ops.register(Arc::new(RemoveProcessorOperation))?;
        ops.register(Arc::new(ListProcessorsOperation))?;

        // manipulate sources
        ops.register(Arc::new(AddSourceOperation))?;
        ops.register(Arc::new(RemoveSourceOperation))?;
        ops.register(Arc::new(ListSourcesOperation))?;

        // media types
        ops.set_creation_operation(Arc::new(SetMediaOperation))?;

        // misc
        ops.register(Arc::new(SetRejectableOperation))?;
        ops.register(Arc::new(SetDescriptionOperation))?;
        Ok(())
    }

    /// Component kind registration for module factories.
    pub fn kind() -> ComponentKind {
        ComponentKind::new(
            Self::TNAME,
            Self::TDESC,
            Arc::new(|init: ComponentInit| {
                Box::new(MediaPathConfig::new(init.instance_name, init.media_types))
                    as Box<dyn ComponentConfig>
            }),
        )
    }

    /// Convert the current snapshot into a strongly typed runtime path.
    ///
    /// Fails closed while no media type is bound. Pure read; the entity
    /// is not mutated.
    pub fn instantiate(&self) -> Result<Box<dyn DynMediaPath>> {
        match &self.media_type {
            Some(media_type) => {
                tracing::debug!(
                    instance = %self.core.instance_name(),
                    media_type = media_type.name(),
                    "instantiating media path"
                );
                media_type.instantiate(self)
            }
            None => Err(HarvestError::configuration(
                self.core.instance_name(),
                "no media type assigned, cannot instantiate",
            )),
        }
    }

    /*
     * --------------------------------
     * General getters & setters
     * --------------------------------
     */

    pub fn media_type(&self) -> Option<&MediaTypeRef> {
        self.media_type.as_ref()
    }

    /// Bind (or clear) the media type this path operates on.
    ///
    /// The identity alias `""` in the processor-alias map tracks the bound
    /// type's canonical name: registered on bind, removed on clear. The
    /// entity becomes instantiable exactly while a type is bound.
    pub fn set_media_type(&mut self, media_type: Option<MediaTypeRef>) {
        match &media_type {
            Some(media_type) => {
                self.processor_aliases
                    .insert(String::new(), media_type.name().to_string());
            }
            None => {
                self.processor_aliases.remove("");
            }
        }
        self.media_type = media_type;
    }

    /// Registry this path resolves persisted type names against.
    pub fn media_types(&self) -> &Arc<MediaTypeRegistry> {
        &self.media_types
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn is_rejectable(&self) -> bool {
        self.rejectable
    }

    pub fn set_rejectable(&mut self, rejectable: bool) {
        self.rejectable = rejectable;
    }

    /*
     * --------------------------------
     * Processors & sources
     * --------------------------------
     */

    /// Append a processor. Duplicates are allowed, so the sequence always
    /// changes.
    pub fn add_processor(&mut self, name: impl Into<String>) -> bool {
        self.processors.push(name.into());
        true
    }

    /// Insert a processor at `index`.
    pub fn add_processor_at(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        if index > self.processors.len() {
            return Err(HarvestError::InvalidArgument(format!(
                "processor index {} out of range (0..={})",
                index,
                self.processors.len()
            )));
        }
        self.processors.insert(index, name.into());
        Ok(())
    }

    /// Remove the first occurrence of `name`. Returns whether the
    /// sequence changed.
    pub fn remove_processor(&mut self, name: &str) -> bool {
        match self.processors.iter().position(|p| p == name) {
            Some(index) => {
                self.processors.remove(index);
                true
            }
            None => false,
        }
    }

    /// Processor names in precedence order. Returns a copy; mutating it
    /// does not affect the path.
    pub fn processors(&self) -> Vec<String> {
        self.processors.clone()
    }

    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    /// Resolved alias, e.g. `""` to the bound type's canonical name.
    pub fn processor_alias(&self, alias: &str) -> Option<&str> {
        self.processor_aliases.get(alias).map(String::as_str)
    }

    pub fn processor_aliases(&self) -> &HashMap<String, String> {
        &self.processor_aliases
    }

    /// Add a source. Returns whether membership changed.
    pub fn add_source(&mut self, name: impl Into<String>) -> bool {
        self.sources.insert(name.into())
    }

    /// Remove a source. Returns whether membership changed.
    pub fn remove_source(&mut self, name: &str) -> bool {
        self.sources.remove(name)
    }

    /// Source names, enumeration order unspecified. Returns a copy;
    /// mutating it does not affect the path.
    pub fn sources(&self) -> Vec<String> {
        self.sources.iter().cloned().collect()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /*
     * --------------------------------
     * Persistence
     * --------------------------------
     */

    fn load_internal(&mut self, section: &ConfigSection) -> Result<()> {
        self.core.load_from(section)?;

        self.description = section.get_string_or(CKEY_DESCRIPTION, &self.description);
        self.rejectable = section
            .get_bool_or(CKEY_REJECTABLE, self.rejectable)
            .map_err(|e| {
                HarvestError::configuration(self.core.instance_name(), e.to_string())
            })?;

        for source in section.get_string_array(CKEY_SOURCE) {
            self.sources.insert(source);
        }
        for processor in section.get_string_array(CKEY_PROCESSOR) {
            self.processors.push(processor);
        }

        self.load_media_type(section)
    }

    fn load_media_type(&mut self, section: &ConfigSection) -> Result<()> {
        if let Some(name) = section.get_string(CKEY_MEDIA_CLASS) {
            let media_type = self.media_types.resolve(name)?;
            self.set_media_type(Some(media_type));
        }
        Ok(())
    }

    fn save_internal(&self, section: &mut ConfigSection) -> Result<()> {
        self.core.save_to(section)?;

        section.set_property(CKEY_REJECTABLE, self.rejectable);
        section.set_property(CKEY_DESCRIPTION, self.description.as_str());

        for source in &self.sources {
            section.add_property(CKEY_SOURCE, source.as_str());
        }
        for processor in &self.processors {
            section.add_property(CKEY_PROCESSOR, processor.as_str());
        }

        if let Some(media_type) = &self.media_type {
            section.add_property(CKEY_MEDIA_CLASS, media_type.name());
        }
        Ok(())
    }
}

impl ComponentConfig for MediaPathConfig {
    fn instance_name(&self) -> &str {
        self.core.instance_name()
    }

    fn ui_name(&self) -> String {
        match &self.media_type {
            Some(media_type) => {
                format!("{} (operates on {})", self.core.ui_name(), media_type.name())
            }
            None => format!("{} (no media type set)", self.core.ui_name()),
        }
    }

    fn ui_description(&self) -> String {
        self.description.clone()
    }

    fn kind_name(&self) -> &'static str {
        Self::TNAME
    }

    fn reset(&mut self) {
        self.set_media_type(None);
        self.sources.clear();
        self.processors.clear();
        self.rejectable = false;
        self.description.clear();
    }

    fn load_from(&mut self, section: &ConfigSection) -> Result<()> {
        self.load_internal(section)
    }

    fn save_to(&self, section: &mut ConfigSection) -> Result<()> {
        self.save_internal(section)
    }

    fn operation_descriptors(&self) -> Vec<OperationDescriptor> {
        self.operations.descriptors()
    }

    fn creation_operation(&self) -> Option<String> {
        self.operations.creation_operation().map(str::to_string)
    }

    fn execute_operation(&mut self, name: &str, args: &[String]) -> Result<String> {
        let Some(operation) = self.operations.lookup(name) else {
            return Err(HarvestError::configuration(
                self.core.instance_name(),
                format!("unknown operation '{}'", name),
            ));
        };
        operation.execute(self, args)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
