// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod component;
pub mod error;
pub mod media;
pub mod module;
pub mod operation;
pub mod store;

pub use component::{ComponentConfig, ComponentCore};
pub use error::{HarvestError, Result};
pub use media::{
    DynMediaPath, MediaPath, MediaPathBinding, MediaPathConfig, MediaType, MediaTypeRef,
    MediaTypeRegistry,
};
pub use module::{
    ComponentFactory, ComponentInit, ComponentKind, ComponentKindRegistration, ConfigModule,
    KindDescriptor,
};
pub use operation::{OperationDescriptor, OperationRegistry, SetupOperation};
pub use store::{ConfigSection, ConfigValue};
