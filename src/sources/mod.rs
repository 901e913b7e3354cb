//! Package sources.
//!
//! Libraries come from a shared vcpkg checkout and are installed into each
//! project separately.

pub mod vcpkg;

pub use vcpkg::{InstallTarget, InstalledPaths, VcpkgBootstrap};
