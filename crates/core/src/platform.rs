//! Platform detection.
//!
//! Plugin metadata identifies builds with Go-style `os`/`arch` labels
//! (`linux`, `darwin`, `amd64`, `arm64`), so the running platform is
//! reported with the same vocabulary instead of Rust's target names.

use std::fmt;

/// An operating system and architecture pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Operating system (darwin, linux, windows).
    pub os: String,
    /// Architecture (amd64, arm64).
    pub arch: String,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this process runs on.
    #[must_use]
    pub fn current() -> Self {
        Self::new(normalize_os(std::env::consts::OS), current_arch())
    }

    /// Render as `os/arch`, the form used in version output.
    #[must_use]
    pub fn to_slash_form(&self) -> String {
        format!("{}/{}", self.os, self.arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Map a Rust OS name onto the vocabulary used by plugin metadata.
#[must_use]
pub fn normalize_os(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

/// Map a Rust architecture name onto the vocabulary used by plugin metadata.
#[must_use]
pub fn normalize_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}

fn current_arch() -> &'static str {
    normalize_arch(std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_platform() {
        let p = Platform::current();
        assert!(!p.os.is_empty());
        assert!(!p.arch.is_empty());
        assert_ne!(p.os, "macos");
        assert_ne!(p.arch, "x86_64");
        assert_ne!(p.arch, "aarch64");
    }

    #[test]
    fn test_platform_display() {
        let p = Platform::new("linux", "amd64");
        assert_eq!(format!("{p}"), "linux-amd64");
        assert_eq!(p.to_slash_form(), "linux/amd64");
    }

    #[test]
    fn test_normalize_os() {
        assert_eq!(normalize_os("macos"), "darwin");
        assert_eq!(normalize_os("linux"), "linux");
        assert_eq!(normalize_os("windows"), "windows");
    }

    #[test]
    fn test_normalize_arch() {
        assert_eq!(normalize_arch("x86_64"), "amd64");
        assert_eq!(normalize_arch("aarch64"), "arm64");
        assert_eq!(normalize_arch("x86"), "386");
        assert_eq!(normalize_arch("riscv64"), "riscv64");
    }
}
