//! Host platform identification.

use serde::{Deserialize, Serialize};

/// Platform identifier combining OS and architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Get the current platform.
    #[must_use]
    pub fn current() -> Self {
        Self {
            os: Os::current(),
            arch: Arch::current(),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Microsoft Windows
    Windows,
    /// macOS
    Darwin,
    /// Linux
    Linux,
    /// Anything else; installs the Linux build
    Other,
}

impl Os {
    /// Get the current OS.
    #[must_use]
    pub fn current() -> Self {
        Self::from_consts(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value.
    #[must_use]
    pub fn from_consts(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::Darwin,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::Darwin => write!(f, "darwin"),
            Self::Linux => write!(f, "linux"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// 32-bit ARM
    Arm,
    /// 64-bit ARM (aarch64)
    Arm64,
    /// 32-bit x86
    X86,
    /// x86-64
    X86_64,
    /// Anything else
    Other,
}

impl Arch {
    /// Get the current architecture.
    #[must_use]
    pub fn current() -> Self {
        Self::from_consts(std::env::consts::ARCH)
    }

    /// Map a `std::env::consts::ARCH` value.
    #[must_use]
    pub fn from_consts(arch: &str) -> Self {
        match arch {
            "arm" => Self::Arm,
            "aarch64" => Self::Arm64,
            "x86" => Self::X86,
            "x86_64" => Self::X86_64,
            _ => Self::Other,
        }
    }

    /// Whether this is any ARM-family architecture, 32- or 64-bit.
    #[must_use]
    pub fn is_arm(self) -> bool {
        matches!(self, Self::Arm | Self::Arm64)
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arm => write!(f, "arm"),
            Self::Arm64 => write!(f, "arm64"),
            Self::X86 => write!(f, "x86"),
            Self::X86_64 => write!(f, "x86_64"),
            Self::Other => write!(f, "other"),
        }
    }
}
