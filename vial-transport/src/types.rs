//! Common types for transport layer

use serde::Serialize;

/// Transport type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransportType {
    /// Raw HID interface over USB
    RawHid,
    /// In-memory device (tests, dry runs)
    Mock,
}

/// Device identification information
#[derive(Debug, Clone, Serialize)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// Transport type
    pub transport_type: TransportType,
    /// Device path or identifier (transport-specific)
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Manufacturer string if available
    pub manufacturer: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}

impl TransportDeviceInfo {
    /// Whether the serial number carries the Vial marker
    pub fn is_vial(&self) -> bool {
        self.serial
            .as_deref()
            .is_some_and(|s| s.contains(crate::protocol::device::VIAL_SERIAL_MAGIC))
    }

    /// Short display name, e.g. `"Keebio Iris (4653:0001)"`
    pub fn display_name(&self) -> String {
        let name = match (&self.manufacturer, &self.product_name) {
            (Some(m), Some(p)) => format!("{m} {p}"),
            (None, Some(p)) => p.clone(),
            (Some(m), None) => m.clone(),
            (None, None) => "Unknown device".to_string(),
        };
        format!("{name} ({:04x}:{:04x})", self.vid, self.pid)
    }
}

/// Discovered device that can be opened
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredDevice {
    /// Device information
    pub info: TransportDeviceInfo,
}

/// Flow-control configuration
#[derive(Debug, Clone, Copy)]
pub struct TransportConfig {
    /// Bound on waiting for a reply
    pub timeout: std::time::Duration,
    /// Capacity of the pending request mailbox
    pub queue_depth: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: std::time::Duration::from_millis(crate::protocol::timing::DEFAULT_TIMEOUT_MS),
            queue_depth: crate::protocol::timing::REQUEST_QUEUE_SIZE,
        }
    }
}
