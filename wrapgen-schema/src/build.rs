//! Build context: which files of a package directory take part in a build.
//!
//! Mirrors the file selection of the Go toolchain closely enough that
//! platform-specific variants of a declaration (`h_linux.go` next to
//! `h_windows.go`, or files guarded by `//go:build`) are not loaded together.

use crate::error::ParseError;
use crate::parser::eval_build_constraint;

/// Operating systems recognized in file name suffixes.
const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

/// Architectures recognized in file name suffixes.
const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

/// Operating systems satisfying the `unix` build tag.
const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// Target platform a package is loaded for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Target operating system, in Go naming (`darwin`, not `macos`).
    pub goos: String,
    /// Target architecture, in Go naming (`amd64`, not `x86_64`).
    pub goarch: String,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::host()
    }
}

impl BuildContext {
    /// Creates a context for the given platform.
    #[must_use]
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
        }
    }

    /// Context of the machine running the generator.
    #[must_use]
    pub fn host() -> Self {
        let goos = match std::env::consts::OS {
            "macos" => "darwin",
            other => other,
        };
        let goarch = match std::env::consts::ARCH {
            "x86" => "386",
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "loongarch64" => "loong64",
            "powerpc" => "ppc",
            "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
            "powerpc64" => "ppc64",
            "wasm32" => "wasm",
            other => other,
        };
        Self::new(goos, goarch)
    }

    /// Returns true if the build tag `tag` is satisfied.
    ///
    /// Besides the platform, `unix`, `gc`, `cgo` and every `go1.N` release
    /// tag hold. `ignore` and unknown tags do not.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.matches_os(tag)
            || tag == self.goarch
            || (tag == "unix" && UNIX_OS.contains(&self.goos.as_str()))
            || matches!(tag, "gc" | "cgo")
            || tag.strip_prefix("go1.").is_some_and(|minor| {
                !minor.is_empty() && minor.chars().all(|c| c.is_ascii_digit())
            })
    }

    fn matches_os(&self, os: &str) -> bool {
        os == self.goos
            || matches!(
                (self.goos.as_str(), os),
                ("android", "linux") | ("illumos", "solaris") | ("ios", "darwin")
            )
    }

    /// Returns true if the `_GOOS`, `_GOARCH` or `_GOOS_GOARCH` suffix of
    /// `file_name` matches this context. Names without such a suffix match.
    #[must_use]
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let stem = file_name.split('.').next().unwrap_or(file_name);
        // The part before the first underscore never constrains the file.
        let Some((_, rest)) = stem.split_once('_') else {
            return true;
        };
        let mut parts: Vec<&str> = rest.split('_').collect();
        if parts.last() == Some(&"test") {
            parts.pop();
        }

        match parts.as_slice() {
            [.., os, arch] if KNOWN_OS.contains(os) && KNOWN_ARCH.contains(arch) => {
                self.matches_os(os) && *arch == self.goarch
            }
            [.., os] if KNOWN_OS.contains(os) => self.matches_os(os),
            [.., arch] if KNOWN_ARCH.contains(arch) => *arch == self.goarch,
            _ => true,
        }
    }

    /// Returns true if the `//go:build` line in the header of `src`, if
    /// any, is satisfied.
    ///
    /// # Errors
    /// Returns `ParseError::Syntax` for a malformed build expression.
    pub fn matches_source(&self, src: &str) -> Result<bool, ParseError> {
        for (idx, line) in src.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some(comment) = line.strip_prefix("//") else {
                // The header ends at the first line that is not a line comment.
                break;
            };
            let Some(expr) = comment.strip_prefix("go:build") else {
                continue;
            };
            if !expr.is_empty() && !expr.starts_with([' ', '\t']) {
                continue;
            }
            let has_tag = |tag: &str| self.has_tag(tag);
            return eval_build_constraint(expr, &has_tag).map_err(|err| match err {
                ParseError::Syntax { message, .. } => ParseError::syntax(idx + 1, message),
                other => other,
            });
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux() -> BuildContext {
        BuildContext::new("linux", "amd64")
    }

    #[test]
    fn test_file_name_suffixes() {
        let ctx = linux();
        assert!(ctx.matches_file_name("tester.go"));
        assert!(ctx.matches_file_name("linux.go"));
        assert!(ctx.matches_file_name("handle_linux.go"));
        assert!(!ctx.matches_file_name("handle_windows.go"));
        assert!(ctx.matches_file_name("handle_amd64.go"));
        assert!(!ctx.matches_file_name("handle_arm64.go"));
        assert!(ctx.matches_file_name("handle_linux_amd64.go"));
        assert!(!ctx.matches_file_name("handle_linux_arm64.go"));
        assert!(!ctx.matches_file_name("handle_windows_test.go"));
        assert!(ctx.matches_file_name("my_handle.go"));
    }

    #[test]
    fn test_os_aliases() {
        let android = BuildContext::new("android", "arm64");
        assert!(android.matches_file_name("h_linux.go"));
        assert!(android.has_tag("linux"));
        assert!(!linux().matches_file_name("h_android.go"));
    }

    #[test]
    fn test_tags() {
        let ctx = linux();
        assert!(ctx.has_tag("linux"));
        assert!(ctx.has_tag("amd64"));
        assert!(ctx.has_tag("unix"));
        assert!(ctx.has_tag("go1.21"));
        assert!(!ctx.has_tag("ignore"));
        assert!(!ctx.has_tag("windows"));
        assert!(!BuildContext::new("windows", "amd64").has_tag("unix"));
    }

    #[test]
    fn test_build_line() {
        let ctx = linux();
        assert!(ctx.matches_source("package p\n").expect("ok"));
        assert!(!ctx.matches_source("//go:build ignore\n\npackage p\n").expect("ok"));
        assert!(ctx.matches_source("// Copyright\n\n//go:build linux || darwin\n\npackage p\n").expect("ok"));
        assert!(!ctx.matches_source("//go:build !unix\npackage p\n").expect("ok"));
        // Only the header counts.
        assert!(ctx.matches_source("package p\n\n//go:build ignore\n").expect("ok"));
        assert!(ctx.matches_source("//go:buildx ignore\npackage p\n").expect("ok"));
    }

    #[test]
    fn test_malformed_build_line() {
        let err = linux().matches_source("\n//go:build linux &&\npackage p\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_host_uses_go_names() {
        let host = BuildContext::host();
        assert_ne!(host.goos, "macos");
        assert_ne!(host.goarch, "x86_64");
        assert_ne!(host.goarch, "aarch64");
    }
}
