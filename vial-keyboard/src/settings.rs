//! Keyboard settings types

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::KeyboardError;

/// Firmware version information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareVersion {
    /// Version as reported by the keyboard value query (big-endian u32)
    pub raw: u32,
}

impl FirmwareVersion {
    /// Create from raw version number
    pub fn new(raw: u32) -> Self {
        Self { raw }
    }

    pub fn major(&self) -> u8 {
        (self.raw >> 24) as u8
    }

    pub fn minor(&self) -> u8 {
        (self.raw >> 16) as u8
    }

    pub fn patch(&self) -> u16 {
        self.raw as u16
    }

    /// Format as major.minor.patch (e.g., "1.2.3" for raw=0x01020003)
    pub fn format_dotted(&self) -> String {
        format!("{}.{}.{}", self.major(), self.minor(), self.patch())
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_dotted())
    }
}

/// Protocol identity of a connected keyboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub via_protocol: u16,
    /// Zero on VIA-only firmware
    pub vial_protocol: u32,
    pub keyboard_id: u64,
    /// Vendor extension protocol, when probed
    pub vendor_protocol: Option<u16>,
    pub firmware: FirmwareVersion,
}

impl DeviceIdentity {
    pub fn is_vial(&self) -> bool {
        self.vial_protocol != 0
    }
}

/// Vial security lock state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockStatus {
    pub unlocked: bool,
    pub in_progress: bool,
    /// Matrix positions (row, col) to hold down while unlocking
    pub keys: Vec<(u8, u8)>,
}

impl UnlockStatus {
    /// Parse `[unlocked, in_progress, row, col, row, col, ..., 0xFF]`
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let keys = bytes
            .get(2..)
            .unwrap_or_default()
            .chunks_exact(2)
            .take_while(|pair| pair[0] != 0xFF && pair[1] != 0xFF)
            .map(|pair| (pair[0], pair[1]))
            .collect();
        Self {
            unlocked: bytes.first() == Some(&1),
            in_progress: bytes.get(1) == Some(&1),
            keys,
        }
    }
}

// ============================================================================
// QMK settings
// ============================================================================

/// Setting id → value, only ids the firmware reports as supported
pub type SettingsMap = BTreeMap<u16, u32>;

/// Terminates a settings query page
pub const SETTINGS_QUERY_END: u16 = 0xFFFF;

/// Number of ids in one settings query reply
pub const SETTINGS_PER_QUERY: usize = 16;

/// One entry of the QMK settings schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QmkSetting {
    pub id: u16,
    pub name: &'static str,
    /// Wire width in bytes (1, 2 or 4)
    pub width: usize,
}

const fn setting(id: u16, name: &'static str, width: usize) -> QmkSetting {
    QmkSetting { id, name, width }
}

/// Known QMK settings
pub const QMK_SETTINGS: &[QmkSetting] = &[
    setting(1, "grave_esc_override", 1),
    setting(2, "combo_term", 2),
    setting(3, "auto_shift", 1),
    setting(4, "auto_shift_timeout", 2),
    setting(5, "oneshot_tap_toggle", 1),
    setting(6, "oneshot_timeout", 2),
    setting(7, "tapping_term", 2),
    setting(8, "tap_hold_options", 1),
    setting(9, "mousekey_delay", 2),
    setting(10, "mousekey_interval", 2),
    setting(11, "mousekey_move_delta", 2),
    setting(12, "mousekey_max_speed", 2),
    setting(13, "mousekey_time_to_max", 2),
    setting(14, "mousekey_wheel_delay", 2),
    setting(15, "mousekey_wheel_interval", 2),
    setting(16, "mousekey_wheel_max_speed", 2),
    setting(17, "mousekey_wheel_time_to_max", 2),
    setting(18, "tap_code_delay", 2),
    setting(19, "tap_hold_caps_delay", 2),
    setting(20, "tapping_toggle", 1),
    setting(21, "magic", 2),
    setting(22, "quick_tap_term", 2),
    setting(26, "unilateral_tap", 1),
    setting(27, "prior_idle_time", 2),
];

/// Look up a setting by id
pub fn qmk_setting(id: u16) -> Option<&'static QmkSetting> {
    QMK_SETTINGS.iter().find(|s| s.id == id)
}

/// Look up a setting by name
pub fn qmk_setting_by_name(name: &str) -> Option<&'static QmkSetting> {
    QMK_SETTINGS.iter().find(|s| s.name == name)
}

/// Look up a setting by number or by name
pub fn find_setting(key: &str) -> Result<&'static QmkSetting, KeyboardError> {
    let found = match key.parse::<u16>() {
        Ok(id) => qmk_setting(id),
        Err(_) => qmk_setting_by_name(key),
    };
    found.ok_or_else(|| KeyboardError::NotFound(format!("setting \"{key}\"")))
}

/// Parse one settings query page.
///
/// Returns the ids on the page and, if the list continues, the cursor for
/// the next query. The firmware lists ids strictly greater than the cursor,
/// so the next cursor is the largest id seen.
pub fn parse_settings_page(ids: &[u64]) -> (Vec<u16>, Option<u16>) {
    let mut page = Vec::new();
    for &id in ids.iter().take(SETTINGS_PER_QUERY) {
        let id = id as u16;
        if id == SETTINGS_QUERY_END {
            return (page, None);
        }
        page.push(id);
    }
    let next = page
        .iter()
        .max()
        .copied()
        .filter(|&next| next != SETTINGS_QUERY_END);
    (page, next)
}

/// Read a little-endian value of `width` bytes
pub fn decode_setting_value(bytes: &[u8], width: usize) -> Option<u32> {
    let bytes = bytes.get(..width)?;
    Some(
        bytes
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_setting_by_id_or_name() {
        assert_eq!(find_setting("7").unwrap().name, "tapping_term");
        assert_eq!(find_setting("tapping_term").unwrap().id, 7);
        assert_eq!(find_setting("unilateral_tap").unwrap().id, 26);
        assert!(matches!(find_setting("23"), Err(KeyboardError::NotFound(_))));
        assert!(matches!(find_setting("tapping"), Err(KeyboardError::NotFound(_))));
    }

    #[test]
    fn test_firmware_version_format() {
        let v = FirmwareVersion::new(0x0102_0003);
        assert_eq!(v.major(), 1);
        assert_eq!(v.minor(), 2);
        assert_eq!(v.patch(), 3);
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn test_unlock_status_parse() {
        let mut bytes = vec![0xFFu8; 32];
        bytes[0] = 0;
        bytes[1] = 1;
        bytes[2..6].copy_from_slice(&[0, 1, 2, 3]);
        let status = UnlockStatus::from_bytes(&bytes);
        assert!(!status.unlocked);
        assert!(status.in_progress);
        assert_eq!(status.keys, vec![(0, 1), (2, 3)]);

        assert_eq!(UnlockStatus::from_bytes(&[]), UnlockStatus::default());
    }

    #[test]
    fn test_settings_page_with_terminator() {
        let (ids, next) = parse_settings_page(&[2, 6, 7, 0xFFFF, 0xFFFF]);
        assert_eq!(ids, vec![2, 6, 7]);
        assert_eq!(next, None);
    }

    #[test]
    fn test_settings_page_full() {
        let full: Vec<u64> = (1..=16).collect();
        let (ids, next) = parse_settings_page(&full);
        assert_eq!(ids.len(), 16);
        // Id 17 must still be listed by the next query
        assert_eq!(next, Some(16));

        let (_, next) = parse_settings_page(&[3, 40, 9, 12, 1, 2, 4, 5, 6, 7, 8, 10, 11, 13, 14, 15]);
        assert_eq!(next, Some(40));
    }

    #[test]
    fn test_schema_lookup() {
        assert_eq!(qmk_setting(7).map(|s| s.name), Some("tapping_term"));
        assert_eq!(qmk_setting_by_name("combo_term").map(|s| s.id), Some(2));
        assert!(qmk_setting(0x0F00).is_none());
        assert!(QMK_SETTINGS.iter().all(|s| matches!(s.width, 1 | 2 | 4)));
    }

    #[test]
    fn test_decode_setting_value_widths() {
        let bytes = [0x34, 0x12, 0x78, 0x56];
        assert_eq!(decode_setting_value(&bytes, 1), Some(0x34));
        assert_eq!(decode_setting_value(&bytes, 2), Some(0x1234));
        assert_eq!(decode_setting_value(&bytes, 4), Some(0x5678_1234));
        assert_eq!(decode_setting_value(&bytes[..1], 2), None);
    }
}
