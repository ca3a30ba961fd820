// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Setup operations: named, console-invocable mutations on one
//! configuration entity.
//!
//! The console never sees the concrete entity type. It lists
//! [`OperationDescriptor`]s and dispatches by name through the erased
//! `ComponentConfig` surface; the registry only routes, side effects live
//! entirely inside the operations.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::error::{HarvestError, Result};

/// A named mutation dispatched against a configuration entity of type `C`.
///
/// Operations are stateless command objects; the entity they act on is
/// passed at dispatch time. Returned text is console output.
pub trait SetupOperation<C>: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn execute(&self, target: &mut C, args: &[String]) -> Result<String>;
}

/// Name/description pair for console discovery listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub name: String,
    pub description: String,
}

/// Registry of setup operations owned by one configuration entity.
///
/// One registered operation may be designated the *creation operation*:
/// the operation a console runs first when the entity is newly defined,
/// typically the one binding the media type.
pub struct OperationRegistry<C> {
    /// Instance name of the owning entity, used in error messages.
    owner: String,
    operations: HashMap<String, Arc<dyn SetupOperation<C>>>,
    creation: Option<String>,
}

impl<C> OperationRegistry<C> {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            operations: HashMap::new(),
            creation: None,
        }
    }

    /// Register an operation keyed by its own name.
    pub fn register(&mut self, operation: Arc<dyn SetupOperation<C>>) -> Result<()> {
        let name = operation.name().to_string();
        if self.operations.contains_key(&name) {
            return Err(HarvestError::configuration(
                &self.owner,
                format!("operation '{}' is already registered", name),
            ));
        }
        self.operations.insert(name, operation);
        Ok(())
    }

    /// Register `operation` and designate it as the creation operation.
    pub fn set_creation_operation(&mut self, operation: Arc<dyn SetupOperation<C>>) -> Result<()> {
        let name = operation.name().to_string();
        self.register(operation)?;
        self.creation = Some(name);
        Ok(())
    }

    pub fn creation_operation(&self) -> Option<&str> {
        self.creation.as_deref()
    }

    /// Look up an operation by name. Returns a cloned handle so the
    /// caller can dispatch it against a `&mut` entity.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn SetupOperation<C>>> {
        self.operations.get(name).cloned()
    }

    /// Discovery listing, sorted by name for stable console output.
    pub fn descriptors(&self) -> Vec<OperationDescriptor> {
        let mut descriptors: Vec<OperationDescriptor> = self
            .operations
            .values()
            .map(|op| OperationDescriptor {
                name: op.name().to_string(),
                description: op.description().to_string(),
            })
            .collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        value: i64,
    }

    struct IncrementOperation;

    impl SetupOperation<Counter> for IncrementOperation {
        fn name(&self) -> &str {
            "increment"
        }

        fn description(&self) -> &str {
            "Add one to the counter"
        }

        fn execute(&self, target: &mut Counter, _args: &[String]) -> Result<String> {
            target.value += 1;
            Ok(format!("value is now {}", target.value))
        }
    }

    struct ResetOperation;

    impl SetupOperation<Counter> for ResetOperation {
        fn name(&self) -> &str {
            "reset"
        }

        fn description(&self) -> &str {
            "Reset the counter to zero"
        }

        fn execute(&self, target: &mut Counter, _args: &[String]) -> Result<String> {
            target.value = 0;
            Ok("value is now 0".to_string())
        }
    }

    #[test]
    fn test_register_and_dispatch() {
        let mut registry = OperationRegistry::new("c1");
        registry.register(Arc::new(IncrementOperation)).unwrap();

        let mut counter = Counter { value: 0 };
        let op = registry.lookup("increment").unwrap();
        let output = op.execute(&mut counter, &[]).unwrap();

        assert_eq!(counter.value, 1);
        assert_eq!(output, "value is now 1");
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = OperationRegistry::new("c1");
        registry.register(Arc::new(IncrementOperation)).unwrap();

        let result = registry.register(Arc::new(IncrementOperation));
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("already registered"));
        assert!(message.contains("c1"));
    }

    #[test]
    fn test_creation_operation_is_also_registered() {
        let mut registry = OperationRegistry::new("c1");
        registry
            .set_creation_operation(Arc::new(ResetOperation))
            .unwrap();

        assert_eq!(registry.creation_operation(), Some("reset"));
        assert!(registry.contains("reset"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_unknown_returns_none() {
        let registry: OperationRegistry<Counter> = OperationRegistry::new("c1");
        assert!(registry.lookup("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_descriptors_sorted_by_name() {
        let mut registry = OperationRegistry::new("c1");
        registry.register(Arc::new(ResetOperation)).unwrap();
        registry.register(Arc::new(IncrementOperation)).unwrap();

        let descriptors = registry.descriptors();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].name, "increment");
        assert_eq!(descriptors[1].name, "reset");
        assert_eq!(descriptors[1].description, "Reset the counter to zero");
    }
}
