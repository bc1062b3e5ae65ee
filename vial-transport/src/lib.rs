//! Transport abstraction layer for VIA/Vial keyboard communication
//!
//! This crate provides the request/response plumbing for talking to a
//! VIA/Vial keyboard over its raw HID interface:
//!
//! - HID raw transport (direct USB connection via hidapi)
//! - Serialized command queue with echo validation and timeouts
//! - Chunked buffer transfer and dynamic-entry enumeration
//! - Reply decode specs
//! - In-memory mock device (feature `mock`)

pub mod decode;
pub mod error;
pub mod protocol;
pub mod types;

mod discovery;
mod flow_control;
mod hid_raw;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use decode::{DecodeError, DecodeSpec, Decoded, Width};
pub use discovery::{DeviceDiscovery, HidDiscovery};
pub use error::TransportError;
pub use flow_control::FlowControlTransport;
pub use hid_raw::HidRawTransport;
pub use protocol::{detect_echo_offset, REPORT_SIZE};
pub use types::{DiscoveredDevice, TransportConfig, TransportDeviceInfo, TransportType};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Reply predicate: returns `false` for replies that belong to some other request
pub type Validator = Box<dyn Fn(&[u8]) -> bool + Send + Sync>;

/// The core transport trait - all backends implement this
///
/// Backends only move single reports. Query semantics (ordering, echo
/// matching, timeouts) live in [`FlowControlTransport`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write one report
    ///
    /// # Arguments
    /// * `report` - Full report, byte 0 is the command id
    async fn send_report(&self, report: &[u8; REPORT_SIZE]) -> Result<(), TransportError>;

    /// Read one inbound report
    ///
    /// # Returns
    /// `None` if nothing arrived within `timeout`
    async fn read_report(&self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Check if transport is still connected
    async fn is_connected(&self) -> bool;

    /// Close the transport gracefully
    async fn close(&self) -> Result<(), TransportError>;
}

/// Type alias for a boxed transport
pub type BoxedTransport = Arc<dyn Transport>;
