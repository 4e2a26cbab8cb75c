//! Platform entity
//!
//! One platform exists per runtime. It is constructed once from its
//! descriptor and immutable thereafter, except for the lazily-derived
//! extension-name list, which is memoized exactly once.

use once_cell::sync::OnceCell;

use prism_core::{Error, NamedVersion, Result, Version};

use crate::config::PlatformConfig;

/// The platform exposed through the query API
pub struct Platform {
    name: String,
    vendor: String,
    profile: String,
    version_string: String,
    numeric_version: Version,
    extensions: Vec<NamedVersion>,
    host_timer_resolution: Option<u64>,
    extension_names: OnceCell<Vec<String>>,
}

impl Platform {
    /// Build the platform from its descriptor
    pub fn from_config(config: &PlatformConfig) -> Platform {
        Platform {
            name: config.name.clone(),
            vendor: config.vendor.clone(),
            profile: config.profile.clone(),
            version_string: config.version_string.clone(),
            numeric_version: config.version,
            extensions: config.extensions.clone(),
            host_timer_resolution: config.host_timer_resolution,
            extension_names: OnceCell::new(),
        }
    }

    /// Platform name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Platform vendor
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Supported profile
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Human-readable version line
    pub fn version_string(&self) -> &str {
        &self.version_string
    }

    /// Numeric platform version
    pub fn numeric_version(&self) -> Version {
        self.numeric_version
    }

    /// Extensions with the specification version each implements
    pub fn extensions_with_version(&self) -> &[NamedVersion] {
        &self.extensions
    }

    /// Extension names, memoized on first use
    pub fn extension_names(&self) -> &[String] {
        self.extension_names
            .get_or_init(|| self.extensions.iter().map(|e| e.name.clone()).collect())
    }

    /// Host timer resolution in nanoseconds
    ///
    /// `Unimplemented` when the host configuration cannot report one.
    pub fn host_timer_resolution(&self) -> Result<u64> {
        self.host_timer_resolution
            .ok_or(Error::Unimplemented("host timer resolution"))
    }
}
