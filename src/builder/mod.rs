//! Build side of a project.
//!
//! Host toolchain detection, CMakeLists.txt generation and the external
//! CMake invocation.

pub mod cmake;
pub mod generator;
pub mod toolchain;

pub use cmake::CMakeBuilder;
pub use generator::{BuildConfigGenerator, BuildPlan};
pub use toolchain::{ToolchainDescriptor, ToolchainProbe};
