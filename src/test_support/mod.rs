//! Test utilities for Pain unit tests.
//!
//! External tools (vcpkg, cmake) are replaced by small shell scripts that
//! mimic the parts of their behavior the operations depend on.

use std::path::{Path, PathBuf};

use crate::builder::toolchain::ToolchainDescriptor;
use crate::core::abi::{CompilerFamily, Os};

/// Triplet used by tests that drive the fake tools.
pub const FAKE_TRIPLET: &str = "x64-linux";

/// A descriptor with git and cmake present and nothing else.
pub fn descriptor(os: Os, family: CompilerFamily) -> ToolchainDescriptor {
    ToolchainDescriptor {
        os,
        arch: "x86_64".to_string(),
        compiler_family: family,
        compiler_path: None,
        has_git: true,
        has_cmake: true,
        has_ninja: false,
        has_make: false,
        has_mingw_make: false,
        has_prefixed_mingw: false,
    }
}

/// Write an executable script.
pub fn write_script(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, body).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
}

/// Fake `vcpkg`:
/// - `install broken` fails with exit code 2
/// - `remove pinned` fails as if another port depended on it
/// - every call is appended to `calls.log` next to the script
/// - features in `port[feature,...]` are logged but otherwise ignored
const FAKE_VCPKG: &str = r##"#!/bin/sh
case "$1" in
  --version|version) echo "vcpkg package management program version 2099-01-01-fake"; exit 0 ;;
esac
cmd="$1"; spec="$2"; port="${2%%\[*}"; shift 2
triplet=""; root=""
while [ $# -gt 0 ]; do
  case "$1" in
    --triplet) triplet="$2"; shift ;;
    --x-install-root=*) root="${1#--x-install-root=}" ;;
  esac
  shift
done
echo "$cmd $spec" >> "$(dirname "$0")/calls.log"
case "$cmd" in
  install)
    if [ "$port" = "broken" ]; then
      echo "Computing installation plan..."
      echo "error: building broken failed" >&2
      exit 2
    fi
    mkdir -p "$root/$triplet/share/$port"
    printf '{"name": "%s", "version": "1.0.0"}\n' "$port" > "$root/$triplet/share/$port/vcpkg.json"
    ;;
  remove)
    if [ "$port" = "pinned" ]; then
      echo "error: cannot remove pinned: other installed ports depend on it"
      exit 1
    fi
    rm -rf "$root/$triplet/share/$port"
    ;;
esac
"##;

/// Create a ready vcpkg checkout under `dir` driven by [`FAKE_VCPKG`].
pub fn fake_vcpkg_root(dir: &Path) -> PathBuf {
    let root = dir.join("fake-vcpkg");
    write_script(&root.join("vcpkg"), FAKE_VCPKG);
    write_script(&root.join("bootstrap-vcpkg.sh"), "#!/bin/sh\nexit 0\n");

    let buildsystems = root.join("scripts").join("buildsystems");
    std::fs::create_dir_all(&buildsystems).unwrap();
    std::fs::write(buildsystems.join("vcpkg.cmake"), "").unwrap();
    root
}

/// vcpkg subcommands recorded by the fake, e.g. `["install fmt"]`.
pub fn vcpkg_calls(root: &Path) -> Vec<String> {
    std::fs::read_to_string(root.join("calls.log"))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Fake `cmake`. Configure records the triplet in `CMakeCache.txt`; build
/// produces an executable that prints its arguments and exits with the
/// argument count. A `src/fail.cpp` makes configure fail.
const FAKE_CMAKE: &str = r##"#!/bin/sh
if [ "$1" = "--build" ]; then
  build="$2"
  name=$(cat "$build/pain-project-name")
  cat > "$build/$name" <<'EOS'
#!/bin/sh
echo "args: $*"
exit $#
EOS
  chmod +x "$build/$name"
  echo "built $name"
  exit 0
fi
src=""; build=""; triplet=""
while [ $# -gt 0 ]; do
  case "$1" in
    -S) src="$2"; shift ;;
    -B) build="$2"; shift ;;
    -DVCPKG_TARGET_TRIPLET=*) triplet="${1#-DVCPKG_TARGET_TRIPLET=}" ;;
  esac
  shift
done
if [ -f "$src/src/fail.cpp" ]; then
  echo "CMake Error at CMakeLists.txt:1: boom" >&2
  exit 1
fi
mkdir -p "$build"
echo "VCPKG_TARGET_TRIPLET:STRING=$triplet" > "$build/CMakeCache.txt"
sed -n 's/^project(\([A-Za-z0-9_-]*\) .*/\1/p' "$src/CMakeLists.txt" > "$build/pain-project-name"
"##;

/// Write [`FAKE_CMAKE`] under `dir`.
pub fn fake_cmake(dir: &Path) -> PathBuf {
    let path = dir.join("fake-bin").join("cmake");
    write_script(&path, FAKE_CMAKE);
    path
}
