//! Core data structures for Pain.
//!
//! This module contains the foundational types used throughout Pain:
//! - Host identity (OS, compiler family)
//! - The library registry and its recipes
//! - The project manifest and the project it describes

pub mod abi;
pub mod error;
pub mod manifest;
pub mod project;
pub mod registry;

pub use abi::{CompilerFamily, Os};
pub use error::PainError;
pub use manifest::{BuildType, ProjectManifest, MANIFEST_NAME};
pub use project::Project;
pub use registry::{LibraryRecipe, LibraryRegistry};
