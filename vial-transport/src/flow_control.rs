//! Flow-control transport layer
//!
//! `FlowControlTransport` wraps a raw `Transport` (which only does send/read
//! of individual HID reports) and adds query semantics: strict request
//! ordering, reply validation, timeouts, chunked buffer transfer and
//! dynamic-entry enumeration.
//!
//! ```text
//! [HidRaw / Mock]            ← implements Transport (raw I/O)
//!        |
//! [FlowControlTransport]     ← worker thread + bounded mailbox
//!        |
//! [KeyboardInterface / CLI]
//! ```
//!
//! The channel carries no request id, so a reply can only be matched to its
//! request by time. A single worker drains the mailbox and does not write
//! request N+1 until request N has been answered or has timed out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use zerocopy::IntoBytes;

use crate::decode::{DecodeSpec, Decoded};
use crate::error::TransportError;
use crate::protocol::{
    self, cmd, echo_validator, vial, BufferHeader, BUFFER_CHUNK_SIZE, REPORT_SIZE,
};
use crate::types::{TransportConfig, TransportDeviceInfo};
use crate::{Transport, Validator};

struct CommandRequest {
    report: [u8; REPORT_SIZE],
    validator: Option<Validator>,
    timeout: Duration,
    response_tx: oneshot::Sender<Result<Vec<u8>, TransportError>>,
}

/// A concrete transport wrapper that serializes queries over a raw `Transport`.
///
/// Consumers that need query semantics (`KeyboardInterface`, the CLI) hold this.
pub struct FlowControlTransport {
    inner: Arc<dyn Transport>,
    request_tx: mpsc::Sender<CommandRequest>,
    connected: Arc<AtomicBool>,
    config: TransportConfig,
}

// ============================================================================
// Constructor
// ============================================================================

impl FlowControlTransport {
    /// Create a new flow-control wrapper with default timing.
    pub fn new(inner: Arc<dyn Transport>) -> Result<Self, TransportError> {
        Self::with_config(inner, TransportConfig::default())
    }

    /// Create a new flow-control wrapper.
    ///
    /// Spawns the worker thread that owns all I/O on `inner`.
    pub fn with_config(
        inner: Arc<dyn Transport>,
        config: TransportConfig,
    ) -> Result<Self, TransportError> {
        let (request_tx, request_rx) = mpsc::channel(config.queue_depth.max(1));
        let connected = Arc::new(AtomicBool::new(true));

        let worker_inner = Arc::clone(&inner);
        let worker_connected = Arc::clone(&connected);
        std::thread::Builder::new()
            .name("vial-flow-worker".into())
            .spawn(move || {
                futures::executor::block_on(command_worker(
                    worker_inner,
                    request_rx,
                    worker_connected,
                ));
            })
            .map_err(|e| TransportError::Internal(format!("spawn flow-control worker: {e}")))?;

        Ok(Self {
            inner,
            request_tx,
            connected,
            config,
        })
    }

    /// Access the wrapped raw transport.
    pub fn inner(&self) -> &Arc<dyn Transport> {
        &self.inner
    }

    /// Get device information
    pub fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }

    /// Default reply timeout
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Whether the channel is still usable
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Close the channel. Later requests fail with `NotConnected`.
    pub async fn close(&self) -> Result<(), TransportError> {
        self.connected.store(false, Ordering::SeqCst);
        self.inner.close().await
    }

    // ========================================================================
    // Query methods (flow-controlled)
    // ========================================================================

    /// Send a prepared report and wait for a reply accepted by `validator`.
    pub async fn query_report(
        &self,
        report: [u8; REPORT_SIZE],
        validator: Option<Validator>,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }

        let (response_tx, response_rx) = oneshot::channel();
        self.request_tx
            .send(CommandRequest {
                report,
                validator,
                timeout,
                response_tx,
            })
            .await
            .map_err(|_| TransportError::Disconnected)?;

        response_rx
            .await
            .map_err(|_| TransportError::Disconnected)?
    }

    /// Send `[cmd, args...]` and return the raw reply.
    pub async fn query(&self, cmd_byte: u8, args: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.query_report(protocol::build_report(cmd_byte, args), None, self.config.timeout)
            .await
    }

    /// Send `[cmd, args...]` and decode the reply.
    pub async fn send(
        &self,
        cmd_byte: u8,
        args: &[u8],
        spec: &DecodeSpec,
    ) -> Result<Decoded, TransportError> {
        let resp = self.query(cmd_byte, args).await?;
        Ok(spec.decode(&resp)?)
    }

    /// Like [`send`](Self::send), but replies rejected by `validator` are
    /// discarded and the wait continues until the timeout.
    pub async fn send_validated(
        &self,
        cmd_byte: u8,
        args: &[u8],
        spec: &DecodeSpec,
        validator: Validator,
    ) -> Result<Decoded, TransportError> {
        let resp = self
            .query_report(
                protocol::build_report(cmd_byte, args),
                Some(validator),
                self.config.timeout,
            )
            .await?;
        Ok(spec.decode(&resp)?)
    }

    /// Send a VIA command whose reply echoes the command byte.
    pub async fn send_echoed(
        &self,
        cmd_byte: u8,
        args: &[u8],
        spec: &DecodeSpec,
    ) -> Result<Decoded, TransportError> {
        self.send_validated(cmd_byte, args, spec, echo_validator(&[cmd_byte]))
            .await
    }

    /// Send a Vial sub-command (`[0xFE, sub, args...]`) and decode the reply.
    pub async fn vial(
        &self,
        sub: u8,
        args: &[u8],
        spec: &DecodeSpec,
    ) -> Result<Decoded, TransportError> {
        debug!("Vial {} args={:02X?}", vial::name(sub), args);
        let resp = self
            .query_report(
                protocol::build_vial_report(sub, args),
                None,
                self.config.timeout,
            )
            .await?;
        Ok(spec.decode(&resp)?)
    }

    // ========================================================================
    // Chunked transfer
    // ========================================================================

    /// Read `size` bytes through a buffer command (`[cmd, offset(BE16), len]`).
    ///
    /// `stop` sees the bytes read so far after every chunk; returning `true`
    /// ends the transfer early. The result is always `size` bytes long, with
    /// unread bytes left zero.
    pub async fn get_buffer<F>(
        &self,
        cmd_byte: u8,
        size: usize,
        mut stop: F,
    ) -> Result<Vec<u8>, TransportError>
    where
        F: FnMut(&[u8]) -> bool,
    {
        let mut data = vec![0u8; size];
        let mut offset = 0usize;

        while offset < size {
            let chunk = (size - offset).min(BUFFER_CHUNK_SIZE);
            let header = chunk_header(cmd_byte, offset, chunk)?;

            let resp = self
                .query_report(
                    protocol::build_report(cmd_byte, &header.as_bytes()[1..]),
                    Some(echo_validator(&header.as_bytes()[..3])),
                    self.config.timeout,
                )
                .await?;

            let payload = resp.get(4..4 + chunk).ok_or_else(|| {
                TransportError::Decode(crate::DecodeError::TooShort {
                    needed: 4 + chunk,
                    got: resp.len(),
                })
            })?;
            data[offset..offset + chunk].copy_from_slice(payload);
            offset += chunk;

            if stop(&data[..offset]) {
                debug!(
                    "{} stopped early at {}/{} bytes",
                    cmd::name(cmd_byte),
                    offset,
                    size
                );
                break;
            }
        }

        Ok(data)
    }

    /// Write `data` through a buffer command in 28-byte windows.
    pub async fn push_buffer(&self, cmd_byte: u8, data: &[u8]) -> Result<(), TransportError> {
        for (i, chunk) in data.chunks(BUFFER_CHUNK_SIZE).enumerate() {
            let header = chunk_header(cmd_byte, i * BUFFER_CHUNK_SIZE, chunk.len())?;
            let mut args = header.as_bytes()[1..].to_vec();
            args.extend_from_slice(chunk);

            self.query_report(
                protocol::build_report(cmd_byte, &args),
                Some(echo_validator(&[cmd_byte])),
                self.config.timeout,
            )
            .await?;
        }
        Ok(())
    }

    // ========================================================================
    // Dynamic entries
    // ========================================================================

    /// Fetch `count` records of one dynamic-entry kind, one request per index.
    pub async fn dynamic_entries(
        &self,
        op: u8,
        count: usize,
        spec: &DecodeSpec,
    ) -> Result<Vec<Decoded>, TransportError> {
        let mut entries = Vec::with_capacity(count);
        for idx in 0..count {
            let idx = u8::try_from(idx).map_err(|_| {
                TransportError::Internal(format!("dynamic entry index {idx} exceeds u8"))
            })?;
            entries.push(self.vial(vial::DYNAMIC_ENTRY_OP, &[op, idx], spec).await?);
        }
        Ok(entries)
    }
}

fn chunk_header(cmd_byte: u8, offset: usize, len: usize) -> Result<BufferHeader, TransportError> {
    let offset = u16::try_from(offset).map_err(|_| {
        TransportError::Internal(format!(
            "{} offset {offset} exceeds 16 bits",
            cmd::name(cmd_byte)
        ))
    })?;
    Ok(BufferHeader::new(cmd_byte, offset, len as u8))
}

impl Drop for FlowControlTransport {
    fn drop(&mut self) {
        debug!("FlowControlTransport dropping ({})", self.inner.device_info().device_path);
    }
}

// ============================================================================
// Worker
// ============================================================================

async fn command_worker(
    inner: Arc<dyn Transport>,
    mut rx: mpsc::Receiver<CommandRequest>,
    connected: Arc<AtomicBool>,
) {
    debug!("Flow-control worker started");

    while let Some(req) = rx.recv().await {
        if !connected.load(Ordering::SeqCst) {
            let _ = req.response_tx.send(Err(TransportError::NotConnected));
            continue;
        }

        let result = execute_query(&inner, &req).await;
        if matches!(result, Err(TransportError::Disconnected)) {
            warn!("Device disconnected, closing channel");
            connected.store(false, Ordering::SeqCst);
        }
        let _ = req.response_tx.send(result);
    }

    debug!("Flow-control worker stopped");
}

async fn execute_query(
    inner: &Arc<dyn Transport>,
    req: &CommandRequest,
) -> Result<Vec<u8>, TransportError> {
    let cmd_byte = req.report[0];
    let start = Instant::now();

    // A reply that arrived after its request timed out would otherwise be
    // taken as the answer to this one.
    while let Some(stale) = inner.read_report(Duration::ZERO).await? {
        warn!(
            "Dropping stale reply before {} (0x{:02X}): {:02X?}",
            cmd::name(cmd_byte),
            cmd_byte,
            &stale[..stale.len().min(8)]
        );
    }

    inner.send_report(&req.report).await?;

    loop {
        let elapsed = start.elapsed();
        if elapsed >= req.timeout {
            warn!(
                "Timeout for {} (0x{:02X}) after {:.0}ms",
                cmd::name(cmd_byte),
                cmd_byte,
                elapsed.as_secs_f64() * 1000.0
            );
            return Err(TransportError::Timeout);
        }

        let Some(resp) = inner.read_report(req.timeout - elapsed).await? else {
            continue;
        };

        match &req.validator {
            Some(_) if is_unhandled_reply(&req.report, &resp) => {
                warn!(
                    "{} (0x{:02X}) not handled by firmware",
                    cmd::name(cmd_byte),
                    cmd_byte
                );
                return Err(TransportError::InvalidResponse {
                    expected: cmd_byte,
                    actual: resp[0],
                });
            }
            Some(valid) if !valid(&resp) => {
                warn!(
                    "Discarding unexpected reply for {} (0x{:02X}): {:02X?}",
                    cmd::name(cmd_byte),
                    cmd_byte,
                    &resp[..resp.len().min(8)]
                );
            }
            _ => {
                debug!(
                    "Reply for {} in {:.2}ms",
                    cmd::name(cmd_byte),
                    start.elapsed().as_secs_f64() * 1000.0
                );
                return Ok(resp);
            }
        }
    }
}

/// Firmware answers a command it does not know with `0xFF` in place of the
/// command byte and the rest of the request echoed back.
fn is_unhandled_reply(report: &[u8; REPORT_SIZE], resp: &[u8]) -> bool {
    report[0] != cmd::UNHANDLED
        && resp.len() >= 4
        && resp[0] == cmd::UNHANDLED
        && resp[1..4] == report[1..4]
}
