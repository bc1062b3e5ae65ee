//! In-memory device for tests
//!
//! `MockDevice` implements [`Transport`] without hardware. Every written report
//! is handed to a responder closure that returns the replies the "device"
//! queues up (none, one, or several). Writes and delivered replies are
//! recorded in order with timestamps so tests can check request ordering.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::{Condvar, Mutex};

use crate::error::TransportError;
use crate::protocol::REPORT_SIZE;
use crate::types::{TransportDeviceInfo, TransportType};
use crate::Transport;

type Responder = Box<dyn Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync>;

/// One recorded I/O event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    Write { data: Vec<u8>, at: Instant },
    Reply { data: Vec<u8>, at: Instant },
}

#[derive(Default)]
struct MockState {
    pending: VecDeque<Vec<u8>>,
    events: Vec<MockEvent>,
}

/// Scriptable fake keyboard
pub struct MockDevice {
    info: TransportDeviceInfo,
    responder: Responder,
    latency: Duration,
    state: Mutex<MockState>,
    cond: Condvar,
    disconnected: AtomicBool,
}

impl MockDevice {
    /// Create a device whose replies are produced by `responder`
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync + 'static,
    {
        Self {
            info: TransportDeviceInfo {
                vid: 0xFEED,
                pid: 0x0000,
                transport_type: TransportType::Mock,
                device_path: "mock".into(),
                serial: Some(crate::protocol::device::VIAL_SERIAL_MAGIC.into()),
                manufacturer: Some("Mock".into()),
                product_name: Some("Keyboard".into()),
            },
            responder: Box::new(responder),
            latency: Duration::ZERO,
            state: Mutex::new(MockState::default()),
            cond: Condvar::new(),
            disconnected: AtomicBool::new(false),
        }
    }

    /// Delay each reply by `latency` after it is requested
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue an unsolicited reply
    pub fn inject(&self, reply: Vec<u8>) {
        self.state.lock().pending.push_back(reply);
        self.cond.notify_all();
    }

    /// Simulate unplugging the device
    pub fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
        self.cond.notify_all();
    }

    /// All recorded events, oldest first
    pub fn events(&self) -> Vec<MockEvent> {
        self.state.lock().events.clone()
    }

    /// All written reports, oldest first
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|e| match e {
                MockEvent::Write { data, .. } => Some(data.clone()),
                MockEvent::Reply { .. } => None,
            })
            .collect()
    }

    fn check_connected(&self) -> Result<(), TransportError> {
        if self.disconnected.load(Ordering::SeqCst) {
            Err(TransportError::Disconnected)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Transport for MockDevice {
    async fn send_report(&self, report: &[u8; REPORT_SIZE]) -> Result<(), TransportError> {
        self.check_connected()?;
        let replies = (self.responder)(report);
        let mut state = self.state.lock();
        state.events.push(MockEvent::Write {
            data: report.to_vec(),
            at: Instant::now(),
        });
        state.pending.extend(replies);
        self.cond.notify_all();
        Ok(())
    }

    async fn read_report(&self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while state.pending.is_empty() {
            self.check_connected()?;
            if self.cond.wait_until(&mut state, deadline).timed_out() {
                return Ok(None);
            }
        }
        self.check_connected()?;

        if !self.latency.is_zero() {
            drop(state);
            std::thread::sleep(self.latency);
            state = self.state.lock();
        }

        let Some(reply) = state.pending.pop_front() else {
            return Ok(None);
        };
        state.events.push(MockEvent::Reply {
            data: reply.clone(),
            at: Instant::now(),
        });
        Ok(Some(reply))
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    async fn is_connected(&self) -> bool {
        !self.disconnected.load(Ordering::SeqCst)
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
