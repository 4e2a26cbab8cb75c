//! Query entry points
//!
//! The two boundary operation families: enumerate entities and fetch a
//! property. Both follow the same two-phase output convention as the wire
//! layer: a call with neither output channel is `InvalidValue`, and a call
//! with only the count or size output is a probe that succeeds without
//! writing entity data.
//!
//! Failures translate into the closed status-code vocabulary; serialization
//! failures propagate verbatim from the wire layer.

use prism_core::{wire, Error, Result};

use crate::device::DeviceType;
use crate::handle::Handle;
use crate::registry;
use crate::runtime::Runtime;

impl Runtime {
    /// Enumerate platform handles
    ///
    /// `max_count` bounds how many handles are written into `out`; the true
    /// total lands in `total` when present, regardless of `max_count`.
    pub fn enumerate_platforms(
        &self,
        max_count: u32,
        out: Option<&mut [Handle]>,
        total: Option<&mut u32>,
    ) -> Result<()> {
        if out.is_none() && total.is_none() {
            return Err(Error::InvalidValue(
                "both handle buffer and count output are absent".to_string(),
            ));
        }
        if let Some(out) = out {
            if max_count == 0 {
                return Err(Error::InvalidValue(
                    "handle buffer present with max_count of 0".to_string(),
                ));
            }
            if !out.is_empty() {
                out[0] = self.platform_handle();
            }
        }
        if let Some(total) = total {
            *total = 1;
        }
        Ok(())
    }

    /// Enumerate device handles matching a category filter
    ///
    /// Filtering happens before truncation to `max_count`; order is
    /// discovery order and stable for the runtime's lifetime. Zero matches
    /// is `NotFound`.
    pub fn enumerate_devices(
        &self,
        platform: Handle,
        filter: DeviceType,
        max_count: u32,
        out: Option<&mut [Handle]>,
        total: Option<&mut u32>,
    ) -> Result<()> {
        self.resolve_platform(platform)?;

        let matches = self.devices_matching(filter)?;
        if matches.is_empty() {
            return Err(Error::NotFound);
        }

        if out.is_none() && total.is_none() {
            return Err(Error::InvalidValue(
                "both handle buffer and count output are absent".to_string(),
            ));
        }
        if let Some(out) = out {
            if max_count == 0 {
                return Err(Error::InvalidValue(
                    "handle buffer present with max_count of 0".to_string(),
                ));
            }
            let n = (max_count as usize).min(out.len()).min(matches.len());
            out[..n].copy_from_slice(&matches[..n]);
        }
        if let Some(total) = total {
            *total = matches.len() as u32;
        }
        Ok(())
    }

    /// Fetch a platform property through the two-phase wire contract
    pub fn platform_info(
        &self,
        platform: Handle,
        property: u32,
        dst: Option<&mut [u8]>,
        out_size: Option<&mut usize>,
    ) -> Result<()> {
        let entity = self.resolve_platform(platform)?;
        let accessor = registry::platform_property(property).ok_or_else(|| {
            Error::InvalidValue(format!("unknown platform property {:#06x}", property))
        })?;
        let value = accessor(&entity)?;
        wire::write_value(&value, dst, out_size)
    }

    /// Fetch a device property through the two-phase wire contract
    pub fn device_info(
        &self,
        device: Handle,
        property: u32,
        dst: Option<&mut [u8]>,
        out_size: Option<&mut usize>,
    ) -> Result<()> {
        let entity = self.resolve_device(device)?;
        let accessor = registry::device_property(property).ok_or_else(|| {
            Error::InvalidValue(format!("unknown device property {:#06x}", property))
        })?;
        let value = accessor(&entity)?;
        wire::write_value(&value, dst, out_size)
    }

    /// Devices matching a category filter, in discovery order
    ///
    /// A device matches when the filter carries its category bit, or when
    /// the default bit is set and it is the default device. Custom devices
    /// cannot be requested through the filter; combining the custom bit
    /// with anything but `ALL` is `InvalidValue`.
    fn devices_matching(&self, filter: DeviceType) -> Result<Vec<Handle>> {
        if filter != DeviceType::ALL && filter.intersects(DeviceType::CUSTOM) {
            return Err(Error::InvalidValue(
                "custom device type cannot be requested".to_string(),
            ));
        }
        if filter == DeviceType::ALL {
            return Ok(self.device_handles().to_vec());
        }

        let mut matches = Vec::new();
        for &handle in self.device_handles() {
            // Fully released devices drop out of enumeration.
            let Ok(device) = self.resolve_device(handle) else {
                continue;
            };
            if filter.intersects(device.device_type())
                || (filter.contains(DeviceType::DEFAULT)
                    && handle == self.default_device())
            {
                matches.push(handle);
            }
        }
        Ok(matches)
    }
}
