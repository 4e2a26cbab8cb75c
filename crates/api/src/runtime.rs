//! Runtime lifecycle and process-scoped state
//!
//! ## Design
//!
//! The runtime owns the platform singleton, the discovered device set, and
//! the handle tables that carry entity reference counts. Discovery happens
//! exactly once, in `Runtime::new`; the entity set is immutable afterwards
//! and every query is a pure read.
//!
//! Process-scoped state is explicit: callers run `initialize` before any
//! query and `teardown` when done. There is no implicit lazily-initialized
//! global. `Runtime::new` is the non-global constructor used directly by
//! embedders and tests.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

use prism_core::{Error, Result};

use crate::config::RuntimeConfig;
use crate::device::Device;
use crate::handle::{Handle, HandleTable};
use crate::platform::Platform;

/// Process-scoped introspection state
pub struct Runtime {
    platform: Arc<Platform>,
    platform_handle: Handle,
    platforms: HandleTable<Platform>,
    devices: HandleTable<Device>,
    device_handles: Vec<Handle>,
    default_device: Handle,
}

impl Runtime {
    /// Build a runtime from a descriptor set
    ///
    /// Registers the platform and every device in the handle tables, in
    /// descriptor order. The default device is the one flagged in the
    /// descriptor, or else the best candidate: the last discrete device,
    /// falling back to the first integrated one.
    pub fn new(config: RuntimeConfig) -> Result<Runtime> {
        config.validate()?;

        let platform = Arc::new(Platform::from_config(&config.platform));
        let platforms = HandleTable::new();
        let platform_handle = platforms.insert(Arc::clone(&platform));

        let devices = HandleTable::new();
        let mut device_handles = Vec::with_capacity(config.devices.len());
        let mut flagged_default = None;
        let mut best_candidate = None;

        for (index, descriptor) in config.devices.iter().enumerate() {
            let device = Device::from_config(descriptor, &config.platform);
            let handle = devices.insert(Arc::new(device));
            debug!(
                device = %descriptor.name,
                kind = ?descriptor.kind,
                token = handle.raw(),
                "registered device"
            );
            device_handles.push(handle);

            if descriptor.is_default {
                flagged_default = Some(index);
            }
            if descriptor.integrated {
                if best_candidate.is_none() {
                    best_candidate = Some(index);
                }
            } else {
                best_candidate = Some(index);
            }
        }

        // validate() guarantees at least one device, so a candidate exists.
        let default_index = flagged_default
            .or(best_candidate)
            .ok_or_else(|| Error::Config("no default device candidate".to_string()))?;
        let default_device = device_handles[default_index];

        info!(
            platform = %platform.name(),
            devices = device_handles.len(),
            "runtime initialized"
        );

        Ok(Runtime {
            platform,
            platform_handle,
            platforms,
            devices,
            device_handles,
            default_device,
        })
    }

    /// The platform entity
    pub fn platform(&self) -> &Arc<Platform> {
        &self.platform
    }

    /// Handle of the platform singleton
    pub fn platform_handle(&self) -> Handle {
        self.platform_handle
    }

    /// Handle of the default device
    pub fn default_device(&self) -> Handle {
        self.default_device
    }

    /// Device handles in discovery order
    pub fn device_handles(&self) -> &[Handle] {
        &self.device_handles
    }

    /// Number of devices still live in the handle table
    pub fn live_device_count(&self) -> usize {
        self.devices.len()
    }

    /// Resolve a device handle
    pub fn resolve_device(&self, handle: Handle) -> Result<Arc<Device>> {
        self.devices.resolve(handle)
    }

    /// Resolve a platform handle
    pub fn resolve_platform(&self, handle: Handle) -> Result<Arc<Platform>> {
        self.platforms.resolve(handle)
    }

    /// Increment a device's reference count
    pub fn retain_device(&self, handle: Handle) -> Result<usize> {
        self.devices.retain(handle)
    }

    /// Decrement a device's reference count
    ///
    /// On zero the device slot is freed and its handle stops resolving.
    pub fn release_device(&self, handle: Handle) -> Result<usize> {
        self.devices.release(handle)
    }

    /// Increment the platform's reference count
    pub fn retain_platform(&self, handle: Handle) -> Result<usize> {
        self.platforms.retain(handle)
    }

    /// Decrement the platform's reference count
    ///
    /// The platform is a process singleton: the count floors at 1 and the
    /// slot is never freed, so enumeration keeps working after callers drop
    /// every share they took.
    pub fn release_platform(&self, handle: Handle) -> Result<usize> {
        self.platforms.release_pinned(handle)
    }
}

// ============================================================================
// Process-global lifecycle
// ============================================================================

static RUNTIME: Lazy<RwLock<Option<Arc<Runtime>>>> = Lazy::new(|| RwLock::new(None));

/// One-time global initialization
///
/// Fails with `InvalidValue` if the runtime is already initialized.
pub fn initialize(config: RuntimeConfig) -> Result<()> {
    let mut slot = RUNTIME.write();
    if slot.is_some() {
        return Err(Error::InvalidValue(
            "runtime is already initialized".to_string(),
        ));
    }
    *slot = Some(Arc::new(Runtime::new(config)?));
    Ok(())
}

/// Tear down the global runtime
///
/// Idempotent; outstanding handles stop resolving.
pub fn teardown() {
    let mut slot = RUNTIME.write();
    if slot.take().is_some() {
        debug!("runtime torn down");
    }
}

/// The current global runtime
///
/// Fails with `InvalidValue` when `initialize` has not run.
pub fn current() -> Result<Arc<Runtime>> {
    RUNTIME
        .read()
        .clone()
        .ok_or_else(|| Error::InvalidValue("runtime is not initialized".to_string()))
}
