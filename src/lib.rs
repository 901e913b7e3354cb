//! Pain - a project scaffolder and dependency linker for C++ projects
//!
//! This crate provides the library side of Pain: the library registry, the
//! project manifest, toolchain detection, CMakeLists.txt generation and the
//! vcpkg and CMake drivers the commands are built from.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities for Pain unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides fake vcpkg and cmake executables and descriptor helpers.
#[cfg(test)]
pub mod test_support;

pub use core::{
    error::PainError, manifest::ProjectManifest, project::Project, registry::LibraryRegistry,
};

pub use builder::toolchain::{ToolchainDescriptor, ToolchainProbe};
pub use util::context::GlobalContext;
