// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! harvestlib: configuration core for media collection pipelines.
//!
//! This crate defines the configuration entities a collection framework
//! wires its modules from: persistent, interactively mutable component
//! configurations with a discoverable registry of setup operations, and
//! the type-safe machinery that turns an erased media-type choice into a
//! statically typed runtime media path.
//!
//! The console UI, the type-specific payload definitions, and the
//! pipeline that consumes instantiated paths live in their own crates;
//! this one ends at validated names plus the type token.

// Re-export for macro-generated code (register_media_type! /
// register_component_kind!)
pub use inventory;

pub mod core;

pub use core::{
    ComponentConfig, ComponentCore, ComponentFactory, ComponentInit, ComponentKind,
    ComponentKindRegistration, ConfigModule, ConfigSection, ConfigValue, DynMediaPath,
    HarvestError, KindDescriptor, MediaPath, MediaPathBinding, MediaPathConfig, MediaType,
    MediaTypeRef, MediaTypeRegistry, OperationDescriptor, OperationRegistry, Result,
    SetupOperation,
};
