//! Command handlers for the CLI application.
//!
//! This module organizes command handlers by category:
//! - `query`: Read-only commands (list, info, keycode)
//! - `keymap`: Keymap display and single-key writes
//! - `macros`: Macro display and replacement
//! - `dynamic`: Tap dance, combo and key override display
//! - `settings`: QMK settings and the security lock
//! - `profile`: .vil export and import

pub mod dynamic;
pub mod keymap;
pub mod macros;
pub mod profile;
pub mod query;
pub mod settings;

use std::sync::Arc;

use tracing::debug;
use vial_keyboard::{KeyboardInterface, KeyboardModel, KeycodeCodec};
use vial_transport::FlowControlTransport;

use crate::config::Config;

/// Result type for command handlers
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the configured keyboard.
///
/// Vial devices are preferred when the filter matches several.
pub async fn open_keyboard(
    config: &Config,
) -> Result<KeyboardInterface, Box<dyn std::error::Error>> {
    let transport = config.device.discovery().open_preferred().await?;
    debug!(
        "Opening {} at {}",
        transport.device_info().display_name(),
        transport.device_info().device_path
    );

    let flow = FlowControlTransport::with_config(transport, config.transport_config())?;
    Ok(KeyboardInterface::new(Arc::new(flow)).with_vendor_probe(config.vendor_probe))
}

/// Open the configured keyboard and fetch everything it stores
pub async fn open_loaded(
    config: &Config,
) -> Result<(KeyboardInterface, KeyboardModel), Box<dyn std::error::Error>> {
    let mut keyboard = open_keyboard(config).await?;
    let model = keyboard.load().await?;
    Ok((keyboard, model))
}

/// Parse a keycode argument, naming it in the error
pub fn parse_keycode(codec: &KeycodeCodec, s: &str) -> Result<u16, Box<dyn std::error::Error>> {
    codec
        .parse(s)
        .ok_or_else(|| format!("unknown keycode: \"{s}\"").into())
}
