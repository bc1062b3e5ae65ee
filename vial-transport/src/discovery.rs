//! Device discovery for VIA/Vial keyboards

use std::sync::Arc;

use async_trait::async_trait;
use hidapi::HidApi;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::hid_raw::HidRawTransport;
use crate::protocol::device;
use crate::types::{DiscoveredDevice, TransportDeviceInfo, TransportType};
use crate::Transport;

/// Device discovery abstraction
#[async_trait]
pub trait DeviceDiscovery: Send + Sync {
    /// List currently available devices
    async fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError>;

    /// Open a specific device
    async fn open_device(
        &self,
        device: &DiscoveredDevice,
    ) -> Result<Arc<dyn Transport>, TransportError>;
}

/// HID device discovery over the raw HID interface
///
/// Without filters every raw HID interface (usage page 0xFF60, usage 0x61) is
/// listed, since plain VIA boards do not advertise themselves any other way.
#[derive(Debug, Clone, Default)]
pub struct HidDiscovery {
    vid: Option<u16>,
    pid: Option<u16>,
    path: Option<String>,
    vial_only: bool,
}

impl HidDiscovery {
    /// Create a new HID discovery instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Only match the given vendor ID
    pub fn with_vid(mut self, vid: u16) -> Self {
        self.vid = Some(vid);
        self
    }

    /// Only match the given product ID
    pub fn with_pid(mut self, pid: u16) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Only match the device at this hidraw path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Skip devices whose serial lacks the Vial marker
    pub fn vial_only(mut self, vial_only: bool) -> Self {
        self.vial_only = vial_only;
        self
    }

    /// Check if this is the raw HID interface
    fn is_raw_hid_interface(device_info: &hidapi::DeviceInfo) -> bool {
        device_info.usage_page() == device::USAGE_PAGE && device_info.usage() == device::USAGE
    }

    fn matches(&self, info: &TransportDeviceInfo) -> bool {
        self.vid.is_none_or(|v| v == info.vid)
            && self.pid.is_none_or(|p| p == info.pid)
            && self.path.as_deref().is_none_or(|p| p == info.device_path)
            && (!self.vial_only || info.is_vial())
    }

    /// Open the best available device
    ///
    /// Vial devices are preferred over plain VIA devices; among equals the
    /// first enumerated wins.
    pub async fn open_preferred(&self) -> Result<Arc<dyn Transport>, TransportError> {
        let devices = self.list_devices().await?;
        let chosen = devices
            .iter()
            .find(|d| d.info.is_vial())
            .or_else(|| devices.first())
            .ok_or_else(|| {
                TransportError::DeviceNotFound("No VIA/Vial keyboard found".into())
            })?;
        self.open_device(chosen).await
    }
}

#[async_trait]
impl DeviceDiscovery for HidDiscovery {
    async fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let api = HidApi::new()?;
        let mut devices = Vec::new();

        for device_info in api.device_list() {
            if !Self::is_raw_hid_interface(device_info) {
                continue;
            }

            let info = TransportDeviceInfo {
                vid: device_info.vendor_id(),
                pid: device_info.product_id(),
                transport_type: TransportType::RawHid,
                device_path: device_info.path().to_string_lossy().to_string(),
                serial: device_info.serial_number().map(|s| s.to_string()),
                manufacturer: device_info.manufacturer_string().map(|s| s.to_string()),
                product_name: device_info.product_string().map(|s| s.to_string()),
            };

            if !self.matches(&info) {
                continue;
            }

            debug!(
                "Found device: VID={:04X} PID={:04X} vial={} path={}",
                info.vid,
                info.pid,
                info.is_vial(),
                info.device_path
            );
            devices.push(DiscoveredDevice { info });
        }

        info!("Found {} devices", devices.len());
        Ok(devices)
    }

    async fn open_device(
        &self,
        device: &DiscoveredDevice,
    ) -> Result<Arc<dyn Transport>, TransportError> {
        let api = HidApi::new()?;

        let hid_info = api
            .device_list()
            .find(|d| {
                Self::is_raw_hid_interface(d)
                    && d.path().to_string_lossy() == device.info.device_path
            })
            .ok_or_else(|| {
                TransportError::DeviceNotFound(format!(
                    "Raw HID interface for {:04X}:{:04X} at {}",
                    device.info.vid, device.info.pid, device.info.device_path
                ))
            })?;

        let hid_device = hid_info.open_device(&api)?;

        info!(
            "Opened raw HID transport for {:04X}:{:04X}",
            device.info.vid, device.info.pid
        );

        Ok(Arc::new(HidRawTransport::new(hid_device, device.info.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(vid: u16, pid: u16, serial: Option<&str>) -> TransportDeviceInfo {
        TransportDeviceInfo {
            vid,
            pid,
            transport_type: TransportType::RawHid,
            device_path: format!("/dev/hidraw-{vid:04x}-{pid:04x}"),
            serial: serial.map(String::from),
            manufacturer: None,
            product_name: None,
        }
    }

    #[test]
    fn test_filters() {
        let any = HidDiscovery::new();
        assert!(any.matches(&info(0x4653, 1, None)));

        let by_vid = HidDiscovery::new().with_vid(0x4653);
        assert!(by_vid.matches(&info(0x4653, 1, None)));
        assert!(!by_vid.matches(&info(0xFEED, 1, None)));

        let by_pid = HidDiscovery::new().with_vid(0x4653).with_pid(2);
        assert!(!by_pid.matches(&info(0x4653, 1, None)));

        let by_path = HidDiscovery::new().with_path("/dev/hidraw-4653-0001");
        assert!(by_path.matches(&info(0x4653, 1, None)));
        assert!(!by_path.matches(&info(0x4653, 2, None)));
    }

    #[test]
    fn test_vial_only_filter() {
        let d = HidDiscovery::new().vial_only(true);
        assert!(d.matches(&info(1, 1, Some("vial:f64c2b3c"))));
        assert!(!d.matches(&info(1, 1, Some("1234"))));
        assert!(!d.matches(&info(1, 1, None)));
    }
}
