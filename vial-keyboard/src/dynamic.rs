//! Dynamic entries: tap-dance, combo and key-override records
//!
//! Each kind is a fixed-count table addressed by index. A get reply is
//! `[status, record...]` with status 0 on success; a set request carries the
//! index followed by the whole record, little-endian.

use serde::{Deserialize, Serialize};
use vial_transport::protocol::dynamic;
use vial_transport::{DecodeSpec, Decoded};
use zerocopy::byteorder::{LittleEndian, U16};
use zerocopy::{Immutable, IntoBytes, KnownLayout};

use crate::error::KeyboardError;

/// Key-override option bit that enables the entry
pub const KEY_OVERRIDE_ENABLED: u8 = 0x80;

/// Number of entries of each kind the firmware provides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicCounts {
    pub tap_dance: u8,
    pub combo: u8,
    pub key_override: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapDance {
    pub on_tap: u16,
    pub on_hold: u16,
    pub on_double_tap: u16,
    pub on_tap_hold: u16,
    /// Tapping term in milliseconds
    pub tapping_term: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    /// Input keys; unused slots are `KC_NO`
    pub keys: [u16; 4],
    pub output: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyOverride {
    pub trigger: u16,
    pub replacement: u16,
    /// Bitmask of layers the override is active on
    pub layers: u16,
    pub trigger_mods: u8,
    pub negative_mod_mask: u8,
    pub suppressed_mods: u8,
    pub options: u8,
}

impl KeyOverride {
    pub fn enabled(&self) -> bool {
        self.options & KEY_OVERRIDE_ENABLED != 0
    }
}

/// A record kind that travels through the dynamic-entry sub-command
pub trait DynamicEntry: Sized {
    /// Human-readable kind, for errors and logs
    const KIND: &'static str;
    /// Sub-op that reads one record
    const GET_OP: u8;
    /// Sub-op that writes one record
    const SET_OP: u8;
    /// Reply layout of the get op, status byte first
    const FORMAT: &'static str;

    /// Build from the decoded fields, status excluded
    fn from_fields(fields: &[u64]) -> Self;

    /// Set-request payload: index followed by the record
    fn to_wire(&self, index: u8) -> Vec<u8>;

    fn decode_spec() -> DecodeSpec {
        DecodeSpec::unpack(Self::FORMAT)
    }

    /// Check the status byte and build the record
    fn from_reply(index: usize, reply: Decoded) -> Result<Self, KeyboardError> {
        let fields = reply.into_values();
        match fields.split_first() {
            Some((0, rest)) => Ok(Self::from_fields(rest)),
            Some((status, _)) => Err(KeyboardError::UnexpectedResponse(format!(
                "{} {index}: status {status}",
                Self::KIND
            ))),
            None => Err(KeyboardError::UnexpectedResponse(format!(
                "{} {index}: empty reply",
                Self::KIND
            ))),
        }
    }
}

#[derive(IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct TapDanceWire {
    index: u8,
    on_tap: U16<LittleEndian>,
    on_hold: U16<LittleEndian>,
    on_double_tap: U16<LittleEndian>,
    on_tap_hold: U16<LittleEndian>,
    tapping_term: U16<LittleEndian>,
}

#[derive(IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct ComboWire {
    index: u8,
    keys: [U16<LittleEndian>; 4],
    output: U16<LittleEndian>,
}

#[derive(IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct KeyOverrideWire {
    index: u8,
    trigger: U16<LittleEndian>,
    replacement: U16<LittleEndian>,
    layers: U16<LittleEndian>,
    trigger_mods: u8,
    negative_mod_mask: u8,
    suppressed_mods: u8,
    options: u8,
}

impl DynamicEntry for TapDance {
    const KIND: &'static str = "tap dance";
    const GET_OP: u8 = dynamic::TAP_DANCE_GET;
    const SET_OP: u8 = dynamic::TAP_DANCE_SET;
    const FORMAT: &'static str = "<BHHHHH";

    fn from_fields(f: &[u64]) -> Self {
        Self {
            on_tap: field(f, 0),
            on_hold: field(f, 1),
            on_double_tap: field(f, 2),
            on_tap_hold: field(f, 3),
            tapping_term: field(f, 4),
        }
    }

    fn to_wire(&self, index: u8) -> Vec<u8> {
        TapDanceWire {
            index,
            on_tap: U16::new(self.on_tap),
            on_hold: U16::new(self.on_hold),
            on_double_tap: U16::new(self.on_double_tap),
            on_tap_hold: U16::new(self.on_tap_hold),
            tapping_term: U16::new(self.tapping_term),
        }
        .as_bytes()
        .to_vec()
    }
}

impl DynamicEntry for Combo {
    const KIND: &'static str = "combo";
    const GET_OP: u8 = dynamic::COMBO_GET;
    const SET_OP: u8 = dynamic::COMBO_SET;
    const FORMAT: &'static str = "<BHHHHH";

    fn from_fields(f: &[u64]) -> Self {
        Self {
            keys: [field(f, 0), field(f, 1), field(f, 2), field(f, 3)],
            output: field(f, 4),
        }
    }

    fn to_wire(&self, index: u8) -> Vec<u8> {
        ComboWire {
            index,
            keys: self.keys.map(U16::new),
            output: U16::new(self.output),
        }
        .as_bytes()
        .to_vec()
    }
}

impl DynamicEntry for KeyOverride {
    const KIND: &'static str = "key override";
    const GET_OP: u8 = dynamic::KEY_OVERRIDE_GET;
    const SET_OP: u8 = dynamic::KEY_OVERRIDE_SET;
    const FORMAT: &'static str = "<BHHHBBBB";

    fn from_fields(f: &[u64]) -> Self {
        Self {
            trigger: field(f, 0),
            replacement: field(f, 1),
            layers: field(f, 2),
            trigger_mods: field(f, 3),
            negative_mod_mask: field(f, 4),
            suppressed_mods: field(f, 5),
            options: field(f, 6),
        }
    }

    fn to_wire(&self, index: u8) -> Vec<u8> {
        KeyOverrideWire {
            index,
            trigger: U16::new(self.trigger),
            replacement: U16::new(self.replacement),
            layers: U16::new(self.layers),
            trigger_mods: self.trigger_mods,
            negative_mod_mask: self.negative_mod_mask,
            suppressed_mods: self.suppressed_mods,
            options: self.options,
        }
        .as_bytes()
        .to_vec()
    }
}

/// Field `i`, truncated to the target width
fn field<T: TryFrom<u64> + Default>(fields: &[u64], i: usize) -> T {
    fields
        .get(i)
        .and_then(|&v| T::try_from(v).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_dance_wire_layout() {
        let td = TapDance {
            on_tap: 0x0004,
            on_hold: 0x00E0,
            on_double_tap: 0x0104,
            on_tap_hold: 0,
            tapping_term: 200,
        };
        assert_eq!(
            td.to_wire(3),
            vec![3, 0x04, 0x00, 0xE0, 0x00, 0x04, 0x01, 0x00, 0x00, 200, 0x00]
        );
    }

    #[test]
    fn test_key_override_wire_layout() {
        let ko = KeyOverride {
            trigger: 0x002A,
            replacement: 0x004C,
            layers: 0xFFFF,
            trigger_mods: 0x02,
            negative_mod_mask: 0,
            suppressed_mods: 0x02,
            options: KEY_OVERRIDE_ENABLED | 0x07,
        };
        assert!(ko.enabled());
        assert_eq!(
            ko.to_wire(0),
            vec![0, 0x2A, 0, 0x4C, 0, 0xFF, 0xFF, 0x02, 0, 0x02, 0x87]
        );
    }

    #[test]
    fn test_combo_from_reply() {
        let mut reply = vec![0u8];
        for kc in [0x04u16, 0x05, 0, 0, 0x29] {
            reply.extend_from_slice(&kc.to_le_bytes());
        }
        let decoded = Combo::decode_spec().decode(&reply).unwrap();
        let combo = Combo::from_reply(0, decoded).unwrap();
        assert_eq!(
            combo,
            Combo {
                keys: [0x04, 0x05, 0, 0],
                output: 0x29
            }
        );
    }

    #[test]
    fn test_nonzero_status_is_error() {
        let reply = [1u8; 11];
        let decoded = TapDance::decode_spec().decode(&reply).unwrap();
        let err = TapDance::from_reply(2, decoded).unwrap_err();
        assert!(matches!(err, KeyboardError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_key_override_from_fields() {
        let reply = [0u8, 0x2A, 0, 0x4C, 0, 0x01, 0x00, 2, 0, 2, 0x80];
        let decoded = KeyOverride::decode_spec().decode(&reply).unwrap();
        let ko = KeyOverride::from_reply(0, decoded).unwrap();
        assert_eq!(ko.trigger, 0x2A);
        assert_eq!(ko.layers, 1);
        assert!(ko.enabled());
    }
}
