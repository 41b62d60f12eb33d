//! Configuration for the sync coordinator.

use std::fmt;

/// Operating system family, used only to namespace remote config names.
///
/// Key bindings differ between platforms, so each keeps its own document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Microsoft Windows.
    Windows,
    /// Apple macOS.
    Mac,
    /// Linux.
    Linux,
    /// Any other OS, by name.
    Other(String),
}

impl Platform {
    /// Returns the platform this process is running on.
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Maps an OS name such as `std::env::consts::OS` to a platform.
    pub fn from_os_name(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" | "mac" => Platform::Mac,
            "linux" => Platform::Linux,
            other => Platform::Other(other.to_string()),
        }
    }

    /// Returns the identifier used in config names.
    pub fn name(&self) -> &str {
        match self {
            Platform::Windows => "windows",
            Platform::Mac => "mac",
            Platform::Linux => "linux",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for key-binding synchronization.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Platform whose keymap is synchronized.
    pub platform: Platform,
    /// Prefix of the remote document name.
    pub config_prefix: String,
}

impl SyncConfig {
    /// Creates a configuration for the current platform.
    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
            config_prefix: "keymap-".to_string(),
        }
    }

    /// Sets the platform.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Sets the remote document name prefix.
    #[must_use]
    pub fn with_config_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config_prefix = prefix.into();
        self
    }

    /// Name of the remote document holding this platform's keymap.
    pub fn config_name(&self) -> String {
        format!("{}{}", self.config_prefix, self.platform)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}
