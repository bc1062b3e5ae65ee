//! Protocol constants and utilities for VIA/Vial keyboard communication

use zerocopy::byteorder::{BigEndian, U16};
use zerocopy::{Immutable, IntoBytes, KnownLayout};

/// Size of every raw HID report exchanged with the keyboard (without report ID)
pub const REPORT_SIZE: usize = 32;

/// Payload bytes carried per report by the buffer get/set commands
pub const BUFFER_CHUNK_SIZE: usize = 28;

/// XZ container magic, used to locate the start of the definition payload
pub const XZ_MAGIC: [u8; 6] = [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];

/// VIA protocol commands (byte 0 of every report)
pub mod cmd {
    pub const GET_PROTOCOL_VERSION: u8 = 0x01;
    pub const GET_KEYBOARD_VALUE: u8 = 0x02;
    pub const SET_KEYBOARD_VALUE: u8 = 0x03;
    pub const DYNAMIC_KEYMAP_GET_KEYCODE: u8 = 0x04;
    pub const DYNAMIC_KEYMAP_SET_KEYCODE: u8 = 0x05;
    pub const DYNAMIC_KEYMAP_RESET: u8 = 0x06;
    pub const CUSTOM_SET_VALUE: u8 = 0x07;
    pub const CUSTOM_GET_VALUE: u8 = 0x08;
    pub const CUSTOM_SAVE: u8 = 0x09;
    pub const EEPROM_RESET: u8 = 0x0A;
    pub const BOOTLOADER_JUMP: u8 = 0x0B;
    pub const DYNAMIC_KEYMAP_MACRO_GET_COUNT: u8 = 0x0C;
    pub const DYNAMIC_KEYMAP_MACRO_GET_BUFFER_SIZE: u8 = 0x0D;
    pub const DYNAMIC_KEYMAP_MACRO_GET_BUFFER: u8 = 0x0E;
    pub const DYNAMIC_KEYMAP_MACRO_SET_BUFFER: u8 = 0x0F;
    pub const DYNAMIC_KEYMAP_MACRO_RESET: u8 = 0x10;
    pub const DYNAMIC_KEYMAP_GET_LAYER_COUNT: u8 = 0x11;
    pub const DYNAMIC_KEYMAP_GET_BUFFER: u8 = 0x12;
    pub const DYNAMIC_KEYMAP_SET_BUFFER: u8 = 0x13;
    pub const DYNAMIC_KEYMAP_GET_ENCODER: u8 = 0x14;
    pub const DYNAMIC_KEYMAP_SET_ENCODER: u8 = 0x15;

    /// Vial extension prefix; byte 1 carries a [`super::vial`] sub-command
    pub const VIAL_PREFIX: u8 = 0xFE;

    /// Returned by firmware for commands it does not implement
    pub const UNHANDLED: u8 = 0xFF;

    /// Get human-readable name for command byte
    pub fn name(cmd: u8) -> &'static str {
        match cmd {
            GET_PROTOCOL_VERSION => "GET_PROTOCOL_VERSION",
            GET_KEYBOARD_VALUE => "GET_KEYBOARD_VALUE",
            SET_KEYBOARD_VALUE => "SET_KEYBOARD_VALUE",
            DYNAMIC_KEYMAP_GET_KEYCODE => "DYNAMIC_KEYMAP_GET_KEYCODE",
            DYNAMIC_KEYMAP_SET_KEYCODE => "DYNAMIC_KEYMAP_SET_KEYCODE",
            DYNAMIC_KEYMAP_RESET => "DYNAMIC_KEYMAP_RESET",
            CUSTOM_SET_VALUE => "CUSTOM_SET_VALUE",
            CUSTOM_GET_VALUE => "CUSTOM_GET_VALUE",
            CUSTOM_SAVE => "CUSTOM_SAVE",
            EEPROM_RESET => "EEPROM_RESET",
            BOOTLOADER_JUMP => "BOOTLOADER_JUMP",
            DYNAMIC_KEYMAP_MACRO_GET_COUNT => "MACRO_GET_COUNT",
            DYNAMIC_KEYMAP_MACRO_GET_BUFFER_SIZE => "MACRO_GET_BUFFER_SIZE",
            DYNAMIC_KEYMAP_MACRO_GET_BUFFER => "MACRO_GET_BUFFER",
            DYNAMIC_KEYMAP_MACRO_SET_BUFFER => "MACRO_SET_BUFFER",
            DYNAMIC_KEYMAP_MACRO_RESET => "MACRO_RESET",
            DYNAMIC_KEYMAP_GET_LAYER_COUNT => "GET_LAYER_COUNT",
            DYNAMIC_KEYMAP_GET_BUFFER => "KEYMAP_GET_BUFFER",
            DYNAMIC_KEYMAP_SET_BUFFER => "KEYMAP_SET_BUFFER",
            DYNAMIC_KEYMAP_GET_ENCODER => "GET_ENCODER",
            DYNAMIC_KEYMAP_SET_ENCODER => "SET_ENCODER",
            VIAL_PREFIX => "VIAL",
            UNHANDLED => "UNHANDLED",
            _ => "UNKNOWN",
        }
    }
}

/// Value ids for GET_KEYBOARD_VALUE / SET_KEYBOARD_VALUE
pub mod keyboard_value {
    pub const UPTIME: u8 = 0x01;
    pub const LAYOUT_OPTIONS: u8 = 0x02;
    pub const SWITCH_MATRIX_STATE: u8 = 0x03;
    pub const FIRMWARE_VERSION: u8 = 0x04;
    pub const DEVICE_INDICATION: u8 = 0x05;
}

/// Vial sub-commands (byte 1 after [`cmd::VIAL_PREFIX`])
pub mod vial {
    pub const GET_KEYBOARD_ID: u8 = 0x00;
    pub const GET_SIZE: u8 = 0x01;
    pub const GET_KEYBOARD_DEFINITION: u8 = 0x02;
    pub const GET_ENCODER: u8 = 0x03;
    pub const SET_ENCODER: u8 = 0x04;
    pub const GET_UNLOCK_STATUS: u8 = 0x05;
    pub const UNLOCK_START: u8 = 0x06;
    pub const UNLOCK_POLL: u8 = 0x07;
    pub const LOCK: u8 = 0x08;
    pub const QMK_SETTINGS_QUERY: u8 = 0x09;
    pub const QMK_SETTINGS_GET: u8 = 0x0A;
    pub const QMK_SETTINGS_SET: u8 = 0x0B;
    pub const QMK_SETTINGS_RESET: u8 = 0x0C;
    pub const DYNAMIC_ENTRY_OP: u8 = 0x0D;

    pub fn name(sub: u8) -> &'static str {
        match sub {
            GET_KEYBOARD_ID => "GET_KEYBOARD_ID",
            GET_SIZE => "GET_SIZE",
            GET_KEYBOARD_DEFINITION => "GET_KEYBOARD_DEFINITION",
            GET_ENCODER => "GET_ENCODER",
            SET_ENCODER => "SET_ENCODER",
            GET_UNLOCK_STATUS => "GET_UNLOCK_STATUS",
            UNLOCK_START => "UNLOCK_START",
            UNLOCK_POLL => "UNLOCK_POLL",
            LOCK => "LOCK",
            QMK_SETTINGS_QUERY => "QMK_SETTINGS_QUERY",
            QMK_SETTINGS_GET => "QMK_SETTINGS_GET",
            QMK_SETTINGS_SET => "QMK_SETTINGS_SET",
            QMK_SETTINGS_RESET => "QMK_SETTINGS_RESET",
            DYNAMIC_ENTRY_OP => "DYNAMIC_ENTRY_OP",
            _ => "UNKNOWN",
        }
    }
}

/// Dynamic entry operations (byte 2 after `VIAL_PREFIX, DYNAMIC_ENTRY_OP`)
pub mod dynamic {
    pub const GET_NUMBER_OF_ENTRIES: u8 = 0x00;
    pub const TAP_DANCE_GET: u8 = 0x01;
    pub const TAP_DANCE_SET: u8 = 0x02;
    pub const COMBO_GET: u8 = 0x03;
    pub const COMBO_SET: u8 = 0x04;
    pub const KEY_OVERRIDE_GET: u8 = 0x05;
    pub const KEY_OVERRIDE_SET: u8 = 0x06;
}

/// Timing constants
pub mod timing {
    /// Default bound on waiting for a reply (ms)
    pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

    /// Queue capacity for pending command requests
    pub const REQUEST_QUEUE_SIZE: usize = 16;
}

/// Device identification constants
pub mod device {
    /// Raw HID usage page used by VIA/Vial firmware
    pub const USAGE_PAGE: u16 = 0xFF60;
    /// Raw HID usage used by VIA/Vial firmware
    pub const USAGE: u16 = 0x61;
    /// Serial number marker advertised by Vial-enabled firmware
    pub const VIAL_SERIAL_MAGIC: &str = "vial:f64c2b3c";
}

/// Header of the chunked buffer commands: `[cmd, offset(BE16), size]`
#[derive(Debug, Clone, Copy, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct BufferHeader {
    pub cmd: u8,
    pub offset: U16<BigEndian>,
    pub size: u8,
}

impl BufferHeader {
    pub fn new(cmd: u8, offset: u16, size: u8) -> Self {
        Self {
            cmd,
            offset: U16::new(offset),
            size,
        }
    }
}

/// Build a report buffer
///
/// Format: `[cmd] [data...] [zero padding]`; data beyond the report is truncated.
pub fn build_report(cmd: u8, data: &[u8]) -> [u8; REPORT_SIZE] {
    let mut buf = [0u8; REPORT_SIZE];
    buf[0] = cmd;
    let len = std::cmp::min(data.len(), REPORT_SIZE - 1);
    buf[1..1 + len].copy_from_slice(&data[..len]);
    buf
}

/// Build a Vial extension report: `[0xFE] [sub] [data...]`
pub fn build_vial_report(sub: u8, data: &[u8]) -> [u8; REPORT_SIZE] {
    let mut args = Vec::with_capacity(data.len() + 1);
    args.push(sub);
    args.extend_from_slice(data);
    build_report(cmd::VIAL_PREFIX, &args)
}

/// Work out where the payload starts in a definition block reply.
///
/// Most firmware answers the definition fetch with raw payload bytes, but some
/// variants repeat the `[0xFE, sub]` request prefix first. The first block of a
/// definition always starts with the XZ magic, so the offset is found by
/// locating that magic (or, failing that, an echoed prefix). A genuine payload
/// that happens to begin with `0xFE, expected_cmd` is indistinguishable from an
/// echo.
pub fn detect_echo_offset(bytes: &[u8], expected_cmd: u8) -> usize {
    let magic = &XZ_MAGIC[..2];
    if bytes.starts_with(magic) {
        return 0;
    }
    if bytes.len() >= 4 && &bytes[2..4] == magic {
        return 2;
    }
    if bytes.len() >= 2 && bytes[0] == cmd::VIAL_PREFIX && bytes[1] == expected_cmd {
        return 2;
    }
    0
}

/// Predicate that accepts a reply only when it starts with `prefix`.
///
/// VIA firmware echoes the request header, so this rejects stale replies
/// left over from an earlier timed-out request.
pub fn echo_validator(prefix: &[u8]) -> crate::Validator {
    let prefix = prefix.to_vec();
    Box::new(move |resp: &[u8]| resp.starts_with(&prefix))
}
