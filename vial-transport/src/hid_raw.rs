//! HID raw transport implementation for direct USB connection

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::TransportError;
use crate::protocol::{cmd, REPORT_SIZE};
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// HID transport over the raw HID interface (usage page 0xFF60)
///
/// Reports are written as output reports prefixed with report ID 0 and
/// read back as 32-byte input reports.
pub struct HidRawTransport {
    device: Mutex<HidDevice>,
    info: TransportDeviceInfo,
    closed: AtomicBool,
}

impl HidRawTransport {
    /// Create a new raw transport from an opened HID device
    pub fn new(device: HidDevice, info: TransportDeviceInfo) -> Self {
        Self {
            device: Mutex::new(device),
            info,
            closed: AtomicBool::new(false),
        }
    }

    fn check_open(&self) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected);
        }
        Ok(())
    }
}

/// The report id byte counts toward `expected`
fn check_write(written: usize, expected: usize) -> Result<(), TransportError> {
    if written < expected {
        return Err(TransportError::HidError(format!(
            "short write: {written} of {expected} bytes"
        )));
    }
    Ok(())
}

#[async_trait]
impl Transport for HidRawTransport {
    async fn send_report(&self, report: &[u8; REPORT_SIZE]) -> Result<(), TransportError> {
        self.check_open()?;

        let mut buf = [0u8; REPORT_SIZE + 1];
        buf[1..].copy_from_slice(report);
        debug!(
            "Sending {} (0x{:02X}): {:02X?}",
            cmd::name(report[0]),
            report[0],
            &report[..8]
        );

        let written = self.device.lock().write(&buf)?;
        check_write(written, buf.len())
    }

    async fn read_report(&self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        self.check_open()?;

        let mut buf = vec![0u8; REPORT_SIZE];
        let ms = timeout.as_millis().min(i32::MAX as u128) as i32;
        let n = self.device.lock().read_timeout(&mut buf, ms)?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        debug!("Received: {:02X?}", &buf[..n.min(8)]);
        Ok(Some(buf))
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    async fn is_connected(&self) -> bool {
        if self.closed.load(Ordering::SeqCst) {
            return false;
        }
        self.device.lock().get_product_string().is_ok()
    }

    async fn close(&self) -> Result<(), TransportError> {
        // HidDevice itself is released on drop
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for HidRawTransport {
    fn drop(&mut self) {
        debug!("HidRawTransport dropped ({})", self.info.device_path);
    }
}
