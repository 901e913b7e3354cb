//! CMakeLists.txt generation.
//!
//! The generated file is a pure function of the manifest, the registry and
//! the host toolchain. It is always rewritten whole, never patched.
//!
//! Merge rules across dependencies (iterated in sorted canonical order):
//! - link targets: union, first-seen order, duplicates collapse
//! - `find_package` calls: union, first-seen order
//! - flags: keyed by option; the last recipe's value wins, the key keeps
//!   its first-seen position
//! - defines: union, first-seen order

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::toolchain::ToolchainDescriptor;
use crate::core::abi::{CompilerFamily, Os};
use crate::core::manifest::ProjectManifest;
use crate::core::project::CMAKE_LISTS;
use crate::core::registry::{FlagKind, LibraryRegistry, ToolchainFlag};
use crate::util::fs;

/// First line of every generated file.
pub const GENERATED_HEADER: &str =
    "# Generated by pain from Pain.toml. Manual edits are overwritten.";

/// Minimum CMake version written into the generated file.
const CMAKE_MINIMUM_VERSION: &str = "3.21";

/// Everything the generated file embeds, after merging all recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub project_name: String,
    pub build_type: String,
    pub install_ids: Vec<String>,
    pub find_packages: Vec<String>,
    pub link_targets: Vec<String>,
    pub defines: Vec<String>,
    pub compile_options: Vec<String>,
    pub link_options: Vec<String>,
}

/// Renders the build configuration for one toolchain.
#[derive(Debug, Clone, Copy)]
pub struct BuildConfigGenerator<'a> {
    registry: &'a LibraryRegistry,
    os: Os,
    compiler: CompilerFamily,
}

impl<'a> BuildConfigGenerator<'a> {
    pub fn new(registry: &'a LibraryRegistry, toolchain: &ToolchainDescriptor) -> Self {
        Self::for_toolchain(registry, toolchain.os, toolchain.compiler_family)
    }

    pub fn for_toolchain(registry: &'a LibraryRegistry, os: Os, compiler: CompilerFamily) -> Self {
        BuildConfigGenerator {
            registry,
            os,
            compiler,
        }
    }

    /// Resolve every dependency and merge the recipes.
    pub fn plan(&self, manifest: &ProjectManifest) -> BuildPlan {
        let mut install_ids = Vec::new();
        let mut find_packages = Vec::new();
        let mut link_targets = Vec::new();
        let mut defines = Vec::new();
        let mut flags: Vec<ToolchainFlag> = Vec::new();

        for name in manifest.dependencies() {
            let recipe = self.registry.resolve(name);
            let extras = recipe.extras_for(self.os, self.compiler);

            push_unique(&mut install_ids, &recipe.install_id);
            push_unique(&mut find_packages, &recipe.find_package.to_cmake());

            for target in extras.link_targets.iter().copied() {
                push_unique(&mut link_targets, target);
            }
            for target in &recipe.link_targets {
                push_unique(&mut link_targets, target);
            }
            for define in extras.defines.iter().copied() {
                push_unique(&mut defines, define);
            }
            for flag in extras.flags {
                merge_flag(&mut flags, flag, &recipe.name);
            }
        }

        let options = |kind: FlagKind| {
            flags
                .iter()
                .filter(|f| f.kind == kind)
                .map(|f| f.value.to_string())
                .collect::<Vec<_>>()
        };

        BuildPlan {
            project_name: manifest.name.clone(),
            build_type: manifest.build_type.to_string(),
            install_ids,
            find_packages,
            link_targets,
            defines,
            compile_options: options(FlagKind::Compile),
            link_options: options(FlagKind::Link),
        }
    }

    /// Render the complete CMakeLists.txt text.
    pub fn render(&self, manifest: &ProjectManifest) -> String {
        render_plan(&self.plan(manifest))
    }

    /// Rewrite `<root>/CMakeLists.txt` atomically.
    pub fn regenerate(&self, manifest: &ProjectManifest, root: &Path) -> Result<PathBuf> {
        let path = root.join(CMAKE_LISTS);
        fs::write_atomic(&path, &self.render(manifest))?;
        tracing::debug!("regenerated {}", path.display());
        Ok(path)
    }
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

fn merge_flag(flags: &mut Vec<ToolchainFlag>, flag: ToolchainFlag, recipe: &str) {
    match flags
        .iter_mut()
        .find(|f| f.key == flag.key && f.kind == flag.kind)
    {
        Some(existing) => {
            if existing.value != flag.value {
                tracing::debug!(
                    "`{}` overrides option `{}`: {} -> {}",
                    recipe,
                    flag.key,
                    existing.value,
                    flag.value
                );
            }
            existing.value = flag.value;
        }
        None => flags.push(flag),
    }
}

/// `command(first arg1 arg2 ...)` on one line.
fn cmake_call(command: &str, first: &str, args: &[String]) -> String {
    let mut parts = vec![first.to_string()];
    parts.extend(args.iter().cloned());
    format!("{}({})", command, parts.join(" "))
}

fn render_plan(plan: &BuildPlan) -> String {
    let name = &plan.project_name;
    let mut lines: Vec<String> = vec![
        GENERATED_HEADER.to_string(),
        format!("cmake_minimum_required(VERSION {})", CMAKE_MINIMUM_VERSION),
        format!("project({} LANGUAGES CXX)", name),
        String::new(),
        "set(CMAKE_CXX_STANDARD 20)".to_string(),
        "set(CMAKE_CXX_STANDARD_REQUIRED ON)".to_string(),
        "set(CMAKE_EXPORT_COMPILE_COMMANDS ON)".to_string(),
        String::new(),
        "if(NOT CMAKE_BUILD_TYPE AND NOT CMAKE_CONFIGURATION_TYPES)".to_string(),
        format!(
            "  set(CMAKE_BUILD_TYPE {} CACHE STRING \"Build type\" FORCE)",
            plan.build_type
        ),
        "endif()".to_string(),
        String::new(),
        cmake_call("set", "PAIN_VCPKG_PORTS", &plan.install_ids),
        String::new(),
        "file(GLOB_RECURSE PAIN_SOURCES CONFIGURE_DEPENDS \"${CMAKE_SOURCE_DIR}/src/*.cpp\")"
            .to_string(),
        format!("add_executable({} ${{PAIN_SOURCES}})", name),
    ];

    if !plan.find_packages.is_empty() {
        lines.push(String::new());
        lines.extend(plan.find_packages.iter().cloned());
    }

    let sections = [
        ("target_link_libraries", &plan.link_targets),
        ("target_compile_definitions", &plan.defines),
        ("target_compile_options", &plan.compile_options),
        ("target_link_options", &plan.link_options),
    ];
    for (command, items) in sections {
        if items.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("{}({} PRIVATE", command, name));
        lines.extend(items.iter().map(|item| format!("  {}", item)));
        lines.push(")".to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
