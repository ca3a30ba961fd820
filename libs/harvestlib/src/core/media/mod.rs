// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod media_type;
pub mod path;
pub mod path_config;
pub mod path_ops;

pub use media_type::{
    ErasedMediaType, MediaType, MediaTypeRef, MediaTypeRegistration, MediaTypeRegistry,
};
pub use path::{DynMediaPath, MediaPath, MediaPathBinding};
pub use path_config::MediaPathConfig;
