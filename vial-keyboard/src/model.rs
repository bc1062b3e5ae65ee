//! In-memory keyboard model assembled at connect time

use serde::{Deserialize, Serialize};

use crate::definition::KeyboardDefinition;
use crate::dynamic::{Combo, DynamicCounts, KeyOverride, TapDance};
use crate::layout::Layout;
use crate::macros::Macro;
use crate::settings::{DeviceIdentity, SettingsMap};

/// Keycodes of one layer, row-major (`row * cols + col`)
pub type LayerKeymap = Vec<u16>;

/// (counter-clockwise, clockwise) keycodes of one encoder
pub type EncoderBinding = (u16, u16);

/// Everything fetched from a keyboard in one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardModel {
    pub identity: DeviceIdentity,
    pub definition: KeyboardDefinition,
    pub layout: Layout,
    pub rows: u8,
    pub cols: u8,
    pub layers: u8,
    /// One entry per layer
    pub keymap: Vec<LayerKeymap>,
    /// Per layer, per encoder index
    pub encoders: Vec<Vec<EncoderBinding>>,
    pub layout_options: u32,
    /// Device macro buffer capacity in bytes
    pub macro_buffer_size: usize,
    pub macros: Vec<Macro>,
    pub dynamic_counts: DynamicCounts,
    pub tap_dances: Vec<TapDance>,
    pub combos: Vec<Combo>,
    pub key_overrides: Vec<KeyOverride>,
    pub settings: SettingsMap,
}

impl KeyboardModel {
    fn key_index(&self, row: u8, col: u8) -> Option<usize> {
        (row < self.rows && col < self.cols)
            .then(|| row as usize * self.cols as usize + col as usize)
    }

    /// Keycode at a matrix position
    pub fn keycode(&self, layer: u8, row: u8, col: u8) -> Option<u16> {
        let idx = self.key_index(row, col)?;
        self.keymap.get(layer as usize)?.get(idx).copied()
    }

    /// Update one keycode in place. Returns `false` if out of range.
    pub fn set_keycode(&mut self, layer: u8, row: u8, col: u8, keycode: u16) -> bool {
        let Some(idx) = self.key_index(row, col) else {
            return false;
        };
        match self
            .keymap
            .get_mut(layer as usize)
            .and_then(|keys| keys.get_mut(idx))
        {
            Some(slot) => {
                *slot = keycode;
                true
            }
            None => false,
        }
    }

    /// Split a flat keymap buffer (layer-major, row-major) into layers
    pub fn keymap_from_flat(flat: &[u16], rows: u8, cols: u8) -> Vec<LayerKeymap> {
        let per_layer = rows as usize * cols as usize;
        if per_layer == 0 {
            return Vec::new();
        }
        flat.chunks(per_layer).map(<[u16]>::to_vec).collect()
    }

    /// Flatten the keymap back into the device buffer order
    pub fn flat_keymap(&self) -> Vec<u16> {
        self.keymap.iter().flatten().copied().collect()
    }

    /// Number of encoders known for this keyboard
    pub fn encoder_count(&self) -> usize {
        self.encoders.first().map_or(0, Vec::len)
    }
}
