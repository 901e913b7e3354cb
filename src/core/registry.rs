//! Library registry.
//!
//! Maps a human-supplied library name to a [`LibraryRecipe`]: the vcpkg port
//! to install, the CMake package and targets to link, and per-toolchain
//! quirks. The curated table is compiled in; names missing from it resolve to
//! a best-effort fallback so any port vcpkg knows can still be added.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::abi::{CompilerFamily, Os};
use crate::core::error::PainError;

static LIBRARY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._+-]*$").unwrap());

static FEATURE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap());

static LIBRARY_SPEC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\[\]]*)(?:\[([^\[\]]*)\])?$").unwrap());

fn invalid_library(name: &str) -> PainError {
    PainError::InvalidName {
        kind: "library",
        name: name.to_string(),
    }
}

/// Check a library name as recorded in the manifest.
pub fn validate_library_name(name: &str) -> Result<(), PainError> {
    if LIBRARY_NAME.is_match(name) {
        Ok(())
    } else {
        Err(invalid_library(name))
    }
}

/// Check a vcpkg feature name (lowercase, digits and `-`).
pub fn validate_feature_name(feature: &str) -> Result<(), PainError> {
    if FEATURE_NAME.is_match(feature) {
        Ok(())
    } else {
        Err(PainError::InvalidName {
            kind: "feature",
            name: feature.to_string(),
        })
    }
}

/// A library as written on the command line: `sfml` or `sfml[audio,network]`.
///
/// Recipes are resolved by `name`; `features` only affect the vcpkg install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySpec {
    pub name: String,
    /// Requested vcpkg features, lowercase, sorted and deduplicated.
    pub features: Vec<String>,
}

impl LibrarySpec {
    /// Parse a user-supplied library spec after trimming.
    pub fn parse(input: &str) -> Result<Self, PainError> {
        let input = input.trim();
        let caps = LIBRARY_SPEC
            .captures(input)
            .ok_or_else(|| invalid_library(input))?;

        let name = caps[1].trim();
        validate_library_name(name).map_err(|_| invalid_library(input))?;

        let mut features = BTreeSet::new();
        if let Some(list) = caps.get(2) {
            for feature in list.as_str().split(',') {
                let feature = feature.trim().to_lowercase();
                validate_feature_name(&feature).map_err(|_| invalid_library(input))?;
                features.insert(feature);
            }
        }

        Ok(LibrarySpec {
            name: name.to_string(),
            features: features.into_iter().collect(),
        })
    }
}

/// Where a toolchain flag is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// `target_compile_options`
    Compile,
    /// `target_link_options`
    Link,
}

/// A single compiler or linker flag contributed by a recipe.
///
/// `key` names the option the flag sets. Two flags with the same key
/// conflict; see [`crate::builder::generator`] for the merge rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolchainFlag {
    pub key: &'static str,
    pub kind: FlagKind,
    pub value: &'static str,
}

impl ToolchainFlag {
    pub const fn compile(key: &'static str, value: &'static str) -> Self {
        ToolchainFlag {
            key,
            kind: FlagKind::Compile,
            value,
        }
    }

    pub const fn link(key: &'static str, value: &'static str) -> Self {
        ToolchainFlag {
            key,
            kind: FlagKind::Link,
            value,
        }
    }
}

/// Extra build settings a recipe needs on matching toolchains.
///
/// `None` for `os` or `compiler` matches any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolchainRule {
    pub os: Option<Os>,
    pub compiler: Option<CompilerFamily>,
    pub flags: &'static [ToolchainFlag],
    pub defines: &'static [&'static str],
    /// Linked before the recipe's own targets.
    pub link_targets: &'static [&'static str],
}

impl ToolchainRule {
    /// Rule applying to every compiler on `os`.
    pub const fn on(os: Os) -> Self {
        ToolchainRule {
            os: Some(os),
            compiler: None,
            flags: &[],
            defines: &[],
            link_targets: &[],
        }
    }

    /// Rule applying to one compiler family on `os`.
    pub const fn on_toolchain(os: Os, compiler: CompilerFamily) -> Self {
        ToolchainRule {
            os: Some(os),
            compiler: Some(compiler),
            flags: &[],
            defines: &[],
            link_targets: &[],
        }
    }

    pub const fn flags(self, flags: &'static [ToolchainFlag]) -> Self {
        ToolchainRule { flags, ..self }
    }

    pub const fn defines(self, defines: &'static [&'static str]) -> Self {
        ToolchainRule { defines, ..self }
    }

    pub const fn link_targets(self, link_targets: &'static [&'static str]) -> Self {
        ToolchainRule {
            link_targets,
            ..self
        }
    }

    pub fn matches(&self, os: Os, compiler: CompilerFamily) -> bool {
        self.os.map_or(true, |o| o == os) && self.compiler.map_or(true, |c| c == compiler)
    }
}

/// A row of the compiled-in registry table.
#[derive(Debug)]
pub struct RecipeEntry {
    /// Canonical name, lowercase.
    pub name: &'static str,
    /// Alternative spellings accepted on the command line.
    pub aliases: &'static [&'static str],
    /// vcpkg port name.
    pub install_id: &'static str,
    /// Name passed to `find_package`.
    pub package: &'static str,
    pub components: &'static [&'static str],
    /// Whether `find_package` uses CONFIG mode (false for system libraries).
    pub config_mode: bool,
    pub link_targets: &'static [&'static str],
    pub rules: &'static [ToolchainRule],
}

impl RecipeEntry {
    fn answers_to(&self, normalized: &str) -> bool {
        self.name == normalized || self.aliases.contains(&normalized)
    }
}

/// How CMake locates a library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindPackage {
    pub name: String,
    pub components: Vec<String>,
    pub config_mode: bool,
    /// `REQUIRED` when true, `QUIET` otherwise.
    pub required: bool,
}

impl FindPackage {
    /// Render the `find_package(...)` call.
    pub fn to_cmake(&self) -> String {
        let mut parts = vec![self.name.clone()];
        if self.config_mode {
            parts.push("CONFIG".to_string());
        }
        parts.push(if self.required { "REQUIRED" } else { "QUIET" }.to_string());
        if !self.components.is_empty() {
            parts.push("COMPONENTS".to_string());
            parts.extend(self.components.iter().cloned());
        }
        format!("find_package({})", parts.join(" "))
    }
}

/// Resolved install/link/flags triple for one library name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRecipe {
    /// Canonical library name; this is what the manifest records.
    pub name: String,
    pub install_id: String,
    pub find_package: FindPackage,
    pub link_targets: Vec<String>,
    pub rules: Vec<ToolchainRule>,
    /// False for the generic fallback.
    pub curated: bool,
}

/// Settings a recipe contributes on one particular toolchain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainExtras {
    pub flags: Vec<ToolchainFlag>,
    pub defines: Vec<&'static str>,
    pub link_targets: Vec<&'static str>,
}

impl LibraryRecipe {
    fn from_entry(entry: &RecipeEntry) -> Self {
        LibraryRecipe {
            name: entry.name.to_string(),
            install_id: entry.install_id.to_string(),
            find_package: FindPackage {
                name: entry.package.to_string(),
                components: entry.components.iter().map(|c| c.to_string()).collect(),
                config_mode: entry.config_mode,
                required: true,
            },
            link_targets: entry.link_targets.iter().map(|t| t.to_string()).collect(),
            rules: entry.rules.to_vec(),
            curated: true,
        }
    }

    /// Best-effort recipe for a library without a curated entry: install by
    /// name, link by name, no extra flags.
    pub fn fallback(name: &str) -> Self {
        let name = LibraryRegistry::normalize(name);
        LibraryRecipe {
            install_id: name.clone(),
            find_package: FindPackage {
                name: name.clone(),
                components: Vec::new(),
                config_mode: true,
                required: false,
            },
            link_targets: vec![name.clone()],
            rules: Vec::new(),
            curated: false,
            name,
        }
    }

    /// Collect the rules matching a toolchain, in table order.
    pub fn extras_for(&self, os: Os, compiler: CompilerFamily) -> ToolchainExtras {
        let mut extras = ToolchainExtras::default();
        for rule in self.rules.iter().filter(|r| r.matches(os, compiler)) {
            extras.flags.extend_from_slice(rule.flags);
            extras.defines.extend_from_slice(rule.defines);
            extras.link_targets.extend_from_slice(rule.link_targets);
        }
        extras
    }
}

static SDL2_RULES: &[ToolchainRule] = &[
    ToolchainRule::on_toolchain(Os::Windows, CompilerFamily::Msvc)
        .link_targets(&["SDL2::SDL2main"])
        .flags(&[ToolchainFlag::link("subsystem", "/SUBSYSTEM:CONSOLE")]),
    ToolchainRule::on_toolchain(Os::Windows, CompilerFamily::MinGw)
        .link_targets(&["mingw32", "SDL2::SDL2main"])
        .flags(&[ToolchainFlag::link("subsystem", "-mconsole")]),
    ToolchainRule::on_toolchain(Os::Windows, CompilerFamily::Clang).link_targets(&["SDL2::SDL2main"]),
];

static UTF8_SOURCE_RULES: &[ToolchainRule] = &[ToolchainRule::on_toolchain(
    Os::Windows,
    CompilerFamily::Msvc,
)
.flags(&[ToolchainFlag::compile("source-charset", "/utf-8")])];

static RAYLIB_RULES: &[ToolchainRule] = &[ToolchainRule::on(Os::Windows).link_targets(&["winmm"])];

static OPENGL_RULES: &[ToolchainRule] =
    &[ToolchainRule::on(Os::MacOs).defines(&["GL_SILENCE_DEPRECATION"])];

/// The curated registry table.
pub static BUILTIN_RECIPES: &[RecipeEntry] = &[
    RecipeEntry {
        name: "sfml",
        aliases: &[],
        install_id: "sfml",
        package: "SFML",
        components: &["Graphics", "Window", "System", "Audio", "Network"],
        config_mode: true,
        link_targets: &[
            "SFML::Graphics",
            "SFML::Window",
            "SFML::System",
            "SFML::Audio",
            "SFML::Network",
        ],
        rules: &[],
    },
    RecipeEntry {
        name: "sdl2",
        aliases: &["sdl"],
        install_id: "sdl2",
        package: "SDL2",
        components: &[],
        config_mode: true,
        link_targets: &["SDL2::SDL2"],
        rules: SDL2_RULES,
    },
    RecipeEntry {
        name: "fmt",
        aliases: &["fmtlib"],
        install_id: "fmt",
        package: "fmt",
        components: &[],
        config_mode: true,
        link_targets: &["fmt::fmt"],
        rules: UTF8_SOURCE_RULES,
    },
    RecipeEntry {
        name: "spdlog",
        aliases: &[],
        install_id: "spdlog",
        package: "spdlog",
        components: &[],
        config_mode: true,
        link_targets: &["spdlog::spdlog"],
        rules: UTF8_SOURCE_RULES,
    },
    RecipeEntry {
        name: "raylib",
        aliases: &[],
        install_id: "raylib",
        package: "raylib",
        components: &[],
        config_mode: true,
        link_targets: &["raylib"],
        rules: RAYLIB_RULES,
    },
    RecipeEntry {
        name: "nlohmann-json",
        aliases: &["nlohmann_json", "nlohmann", "json"],
        install_id: "nlohmann-json",
        package: "nlohmann_json",
        components: &[],
        config_mode: true,
        link_targets: &["nlohmann_json::nlohmann_json"],
        rules: &[],
    },
    RecipeEntry {
        name: "opengl",
        aliases: &["gl"],
        install_id: "opengl",
        package: "OpenGL",
        components: &[],
        config_mode: false,
        link_targets: &["OpenGL::GL"],
        rules: OPENGL_RULES,
    },
    RecipeEntry {
        name: "glew",
        aliases: &[],
        install_id: "glew",
        package: "GLEW",
        components: &[],
        config_mode: true,
        link_targets: &["GLEW::GLEW"],
        rules: &[],
    },
    RecipeEntry {
        name: "glfw3",
        aliases: &["glfw"],
        install_id: "glfw3",
        package: "glfw3",
        components: &[],
        config_mode: true,
        link_targets: &["glfw"],
        rules: &[],
    },
    RecipeEntry {
        name: "imgui",
        aliases: &["dear-imgui"],
        install_id: "imgui",
        package: "imgui",
        components: &[],
        config_mode: true,
        link_targets: &["imgui::imgui"],
        rules: &[],
    },
    RecipeEntry {
        name: "box2d",
        aliases: &[],
        install_id: "box2d",
        package: "box2d",
        components: &[],
        config_mode: true,
        link_targets: &["box2d"],
        rules: &[],
    },
    RecipeEntry {
        name: "glm",
        aliases: &[],
        install_id: "glm",
        package: "glm",
        components: &[],
        config_mode: true,
        link_targets: &["glm::glm"],
        rules: &[],
    },
];

/// Lookup table from library names to recipes.
#[derive(Debug, Clone, Copy)]
pub struct LibraryRegistry {
    entries: &'static [RecipeEntry],
}

impl LibraryRegistry {
    /// Registry backed by the curated table.
    pub fn builtin() -> Self {
        LibraryRegistry {
            entries: BUILTIN_RECIPES,
        }
    }

    /// Registry backed by a custom table.
    pub fn with_entries(entries: &'static [RecipeEntry]) -> Self {
        LibraryRegistry { entries }
    }

    /// Normalize a user-supplied name for lookup: trimmed, lowercase.
    pub fn normalize(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Find the curated entry for a name or alias.
    pub fn lookup(&self, name: &str) -> Option<&'static RecipeEntry> {
        let normalized = Self::normalize(name);
        self.entries.iter().find(|e| e.answers_to(&normalized))
    }

    /// Resolve a name to its recipe. Never fails: unknown names get
    /// [`LibraryRecipe::fallback`].
    pub fn resolve(&self, name: &str) -> LibraryRecipe {
        match self.lookup(name) {
            Some(entry) => LibraryRecipe::from_entry(entry),
            None => {
                tracing::debug!("no curated recipe for `{}`, using fallback", name.trim());
                LibraryRecipe::fallback(name)
            }
        }
    }

    /// Canonical manifest name for a user-supplied library name.
    pub fn canonical_name(&self, name: &str) -> String {
        match self.lookup(name) {
            Some(entry) => entry.name.to_string(),
            None => Self::normalize(name),
        }
    }

    pub fn is_curated(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Canonical names of all curated libraries.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|e| e.name)
    }
}

impl Default for LibraryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
