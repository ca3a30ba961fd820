// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Interactive setup operations for media-path configurations.
//!
//! One struct per console command, all registered by
//! `MediaPathConfig::new`. `set-media` is the creation operation: a
//! console prompts for it first when a brand-new path is being defined,
//! since most other operations are meaningless until a type is bound.

use crate::core::error::{HarvestError, Result};
use crate::core::media::path_config::MediaPathConfig;
use crate::core::operation::SetupOperation;

fn require_arg<'a>(usage: &str, args: &'a [String]) -> Result<&'a str> {
    args.first()
        .map(String::as_str)
        .ok_or_else(|| HarvestError::InvalidArgument(format!("usage: {}", usage)))
}

/// Bind the media type; the literal `none` clears the binding.
pub struct SetMediaOperation;

impl SetupOperation<MediaPathConfig> for SetMediaOperation {
    fn name(&self) -> &str {
        "set-media"
    }

    fn description(&self) -> &str {
        "Bind the media type this path operates on ('none' clears the binding)"
    }

    fn execute(&self, target: &mut MediaPathConfig, args: &[String]) -> Result<String> {
        let name = require_arg("set-media <type-name|none>", args)?;
        if name == "none" {
            target.set_media_type(None);
            return Ok("media type cleared".to_string());
        }
        let media_type = target.media_types().resolve(name)?;
        target.set_media_type(Some(media_type));
        Ok(format!("media type set to {}", name))
    }
}

pub struct AddProcessorOperation;

impl SetupOperation<MediaPathConfig> for AddProcessorOperation {
    fn name(&self) -> &str {
        "add-processor"
    }

    fn description(&self) -> &str {
        "Append a processor, or insert one at a position"
    }

    fn execute(&self, target: &mut MediaPathConfig, args: &[String]) -> Result<String> {
        match args {
            [name] => {
                target.add_processor(name.as_str());
                Ok(format!("added processor '{}'", name))
            }
            [index, name] => {
                let index: usize = index.parse().map_err(|_| {
                    HarvestError::InvalidArgument(format!("'{}' is not a valid index", index))
                })?;
                target.add_processor_at(index, name.as_str())?;
                Ok(format!("inserted processor '{}' at {}", name, index))
            }
            _ => Err(HarvestError::InvalidArgument(
                "usage: add-processor [index] <name>".to_string(),
            )),
        }
    }
}

pub struct RemoveProcessorOperation;

impl SetupOperation<MediaPathConfig> for RemoveProcessorOperation {
    fn name(&self) -> &str {
        "remove-processor"
    }

    fn description(&self) -> &str {
        "Remove the first occurrence of a processor"
    }

    fn execute(&self, target: &mut MediaPathConfig, args: &[String]) -> Result<String> {
        let name = require_arg("remove-processor <name>", args)?;
        if target.remove_processor(name) {
            Ok(format!("removed processor '{}'", name))
        } else {
            Ok(format!("processor '{}' not found", name))
        }
    }
}

pub struct ListProcessorsOperation;

impl SetupOperation<MediaPathConfig> for ListProcessorsOperation {
    fn name(&self) -> &str {
        "list-processors"
    }

    fn description(&self) -> &str {
        "List the processor sequence in precedence order"
    }

    fn execute(&self, target: &mut MediaPathConfig, _args: &[String]) -> Result<String> {
        let processors = target.processors();
        if processors.is_empty() {
            return Ok("(no processors)".to_string());
        }
        Ok(processors
            .iter()
            .enumerate()
            .map(|(index, name)| format!("{}: {}", index, name))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

pub struct AddSourceOperation;

impl SetupOperation<MediaPathConfig> for AddSourceOperation {
    fn name(&self) -> &str {
        "add-source"
    }

    fn description(&self) -> &str {
        "Add a source to this path"
    }

    fn execute(&self, target: &mut MediaPathConfig, args: &[String]) -> Result<String> {
        let name = require_arg("add-source <name>", args)?;
        if target.add_source(name) {
            Ok(format!("added source '{}'", name))
        } else {
            Ok(format!("source '{}' is already present", name))
        }
    }
}

pub struct RemoveSourceOperation;

impl SetupOperation<MediaPathConfig> for RemoveSourceOperation {
    fn name(&self) -> &str {
        "remove-source"
    }

    fn description(&self) -> &str {
        "Remove a source from this path"
    }

    fn execute(&self, target: &mut MediaPathConfig, args: &[String]) -> Result<String> {
        let name = require_arg("remove-source <name>", args)?;
        if target.remove_source(name) {
            Ok(format!("removed source '{}'", name))
        } else {
            Ok(format!("source '{}' not found", name))
        }
    }
}

pub struct ListSourcesOperation;

impl SetupOperation<MediaPathConfig> for ListSourcesOperation {
    fn name(&self) -> &str {
        "list-sources"
    }

    fn description(&self) -> &str {
        "List the sources of this path"
    }

    fn execute(&self, target: &mut MediaPathConfig, _args: &[String]) -> Result<String> {
        let mut sources = target.sources();
        if sources.is_empty() {
            return Ok("(no sources)".to_string());
        }
        sources.sort();
        Ok(sources.join("\n"))
    }
}

pub struct SetRejectableOperation;

impl SetupOperation<MediaPathConfig> for SetRejectableOperation {
    fn name(&self) -> &str {
        "set-rejectable"
    }

    fn description(&self) -> &str {
        "Mark whether downstream processing may reject media on this path"
    }

    fn execute(&self, target: &mut MediaPathConfig, args: &[String]) -> Result<String> {
        let value = require_arg("set-rejectable <true|false>", args)?;
        let rejectable: bool = value.parse().map_err(|_| {
            HarvestError::InvalidArgument(format!("'{}' is not a boolean", value))
        })?;
        target.set_rejectable(rejectable);
        Ok(format!("rejectable set to {}", rejectable))
    }
}

/// Set the path description. An absent argument is a contract violation;
/// an empty description must be given explicitly as `""`.
pub struct SetDescriptionOperation;

impl SetupOperation<MediaPathConfig> for SetDescriptionOperation {
    fn name(&self) -> &str {
        "set-description"
    }

    fn description(&self) -> &str {
        "Set the human-readable description of this path"
    }

    fn execute(&self, target: &mut MediaPathConfig, args: &[String]) -> Result<String> {
        if args.is_empty() {
            return Err(HarvestError::InvalidArgument(
                "usage: set-description <text>".to_string(),
            ));
        }
        let description = args.join(" ");
        target.set_description(description.as_str());
        Ok(format!("description set to '{}'", description))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::component::ComponentConfig;
    use crate::core::media::media_type::{MediaType, MediaTypeRegistry};

    struct StatusRecord;

    impl MediaType for StatusRecord {
        const NAME: &'static str = "StatusRecord";
    }

    fn test_path() -> MediaPathConfig {
        let registry = MediaTypeRegistry::new();
        registry.register::<StatusRecord>().unwrap();
        MediaPathConfig::new("p1", Arc::new(registry))
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_set_media_binds_and_clears() {
        let mut path = test_path();

        let output = path
            .execute_operation("set-media", &args(&["StatusRecord"]))
            .unwrap();
        assert_eq!(output, "media type set to StatusRecord");
        assert_eq!(path.processor_alias(""), Some("StatusRecord"));

        let output = path.execute_operation("set-media", &args(&["none"])).unwrap();
        assert_eq!(output, "media type cleared");
        assert!(path.media_type().is_none());
    }

    #[test]
    fn test_set_media_unknown_type() {
        let mut path = test_path();
        let err = path
            .execute_operation("set-media", &args(&["Unknown"]))
            .unwrap_err();
        assert!(matches!(err, HarvestError::MediaTypeNotFound(_)));
    }

    #[test]
    fn test_add_processor_with_and_without_index() {
        let mut path = test_path();
        path.execute_operation("add-processor", &args(&["filterY"]))
            .unwrap();
        path.execute_operation("add-processor", &args(&["0", "filterX"]))
            .unwrap();

        assert_eq!(path.processors(), vec!["filterX", "filterY"]);

        let err = path
            .execute_operation("add-processor", &args(&["nine", "filterZ"]))
            .unwrap_err();
        assert!(matches!(err, HarvestError::InvalidArgument(_)));

        let err = path.execute_operation("add-processor", &[]).unwrap_err();
        assert!(matches!(err, HarvestError::InvalidArgument(_)));
    }

    #[test]
    fn test_remove_operations_report_membership() {
        let mut path = test_path();
        path.add_processor("filterX");
        path.add_source("feedA");

        assert_eq!(
            path.execute_operation("remove-processor", &args(&["filterX"]))
                .unwrap(),
            "removed processor 'filterX'"
        );
        assert_eq!(
            path.execute_operation("remove-processor", &args(&["filterX"]))
                .unwrap(),
            "processor 'filterX' not found"
        );
        assert_eq!(
            path.execute_operation("remove-source", &args(&["feedA"]))
                .unwrap(),
            "removed source 'feedA'"
        );
        assert_eq!(
            path.execute_operation("remove-source", &args(&["feedA"]))
                .unwrap(),
            "source 'feedA' not found"
        );
    }

    #[test]
    fn test_list_operations() {
        let mut path = test_path();
        assert_eq!(
            path.execute_operation("list-processors", &[]).unwrap(),
            "(no processors)"
        );
        assert_eq!(
            path.execute_operation("list-sources", &[]).unwrap(),
            "(no sources)"
        );

        path.add_processor("filterX");
        path.add_processor("filterY");
        path.add_source("feedB");
        path.add_source("feedA");

        assert_eq!(
            path.execute_operation("list-processors", &[]).unwrap(),
            "0: filterX\n1: filterY"
        );
        assert_eq!(
            path.execute_operation("list-sources", &[]).unwrap(),
            "feedA\nfeedB"
        );
    }

    #[test]
    fn test_set_rejectable_parses_bool() {
        let mut path = test_path();
        path.execute_operation("set-rejectable", &args(&["true"]))
            .unwrap();
        assert!(path.is_rejectable());

        let err = path
            .execute_operation("set-rejectable", &args(&["maybe"]))
            .unwrap_err();
        assert!(matches!(err, HarvestError::InvalidArgument(_)));
        assert!(path.is_rejectable());
    }

    #[test]
    fn test_set_description_requires_argument() {
        let mut path = test_path();
        let err = path.execute_operation("set-description", &[]).unwrap_err();
        assert!(matches!(err, HarvestError::InvalidArgument(_)));

        path.execute_operation("set-description", &args(&["demo", "path"]))
            .unwrap();
        assert_eq!(path.description(), "demo path");
    }
}
