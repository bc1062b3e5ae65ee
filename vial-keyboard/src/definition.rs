//! Keyboard definition: the XZ-compressed JSON the firmware carries about itself
//!
//! The blob is fetched in 32-byte blocks by index. Some firmware repeats the
//! `[0xFE, 0x02]` request prefix at the start of every block; the first block
//! decides the offset for all of them.

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vial_transport::detect_echo_offset;
use vial_transport::protocol::vial;
use xz2::read::XzDecoder;

use crate::error::KeyboardError;
use crate::keycode::CustomKeycode;

/// Bytes per definition block
pub const BLOCK_SIZE: usize = 32;

/// Larger declared sizes are treated as a corrupt reply
pub const MAX_DEFINITION_SIZE: u32 = 20 * 1024 * 1024;

/// Switch matrix dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: u8,
    pub cols: u8,
}

/// Physical layout section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layouts {
    /// KLE rows
    #[serde(default)]
    pub keymap: Vec<serde_json::Value>,
    /// Layout option labels: a string for an on/off option, an array of
    /// `[name, choice...]` for a multiple-choice option
    #[serde(default)]
    pub labels: Vec<serde_json::Value>,
}

/// Parsed keyboard definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vendor_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    pub matrix: Matrix,
    #[serde(default)]
    pub layouts: Layouts,
    #[serde(default)]
    pub custom_keycodes: Vec<CustomKeycode>,
    #[serde(default)]
    pub lighting: Option<serde_json::Value>,
}

impl KeyboardDefinition {
    /// Parse the decompressed JSON
    pub fn from_json(json: &[u8]) -> Result<Self, KeyboardError> {
        serde_json::from_slice(json)
            .map_err(|e| KeyboardError::Definition(format!("invalid definition JSON: {e}")))
    }

    /// Decompress and parse a raw definition blob
    pub fn from_blob(blob: &[u8]) -> Result<Self, KeyboardError> {
        Self::from_json(&decompress(blob)?)
    }

    /// Number of layout options and, per option, how many bits it uses
    pub fn layout_option_bits(&self) -> Vec<u32> {
        self.layouts
            .labels
            .iter()
            .map(|label| match label {
                serde_json::Value::Array(choices) if choices.len() > 2 => {
                    let n = (choices.len() - 1) as u32;
                    u32::BITS - (n - 1).leading_zeros()
                }
                _ => 1,
            })
            .collect()
    }
}

/// Validate the size reported by the firmware
pub fn check_size(size: u32) -> Result<usize, KeyboardError> {
    if size == 0 {
        return Err(KeyboardError::Definition("definition size is zero".into()));
    }
    if size > MAX_DEFINITION_SIZE {
        return Err(KeyboardError::Definition(format!(
            "definition size {size} exceeds {MAX_DEFINITION_SIZE} bytes"
        )));
    }
    Ok(size as usize)
}

/// Number of blocks needed for `size` payload bytes at `offset` echo bytes
/// per block
pub fn block_count(size: usize, offset: usize) -> usize {
    let per_block = BLOCK_SIZE - offset;
    size.div_ceil(per_block)
}

/// Collects block replies into the compressed blob
#[derive(Debug)]
pub struct BlobAssembler {
    size: usize,
    offset: Option<usize>,
    data: Vec<u8>,
}

impl BlobAssembler {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            offset: None,
            data: Vec::with_capacity(size),
        }
    }

    /// Append one block reply. Returns `true` once `size` bytes are held.
    pub fn push(&mut self, block: &[u8]) -> bool {
        let offset = *self.offset.get_or_insert_with(|| {
            let offset = detect_echo_offset(block, vial::GET_KEYBOARD_DEFINITION);
            debug!("Definition block echo offset: {offset}");
            offset
        });
        let payload = block.get(offset..).unwrap_or_default();
        let take = payload.len().min(BLOCK_SIZE - offset).min(self.remaining());
        self.data.extend_from_slice(&payload[..take]);
        self.is_complete()
    }

    pub fn remaining(&self) -> usize {
        self.size - self.data.len()
    }

    pub fn is_complete(&self) -> bool {
        self.data.len() >= self.size
    }

    pub fn into_blob(self) -> Vec<u8> {
        self.data
    }
}

/// XZ-decompress a definition blob
pub fn decompress(blob: &[u8]) -> Result<Vec<u8>, KeyboardError> {
    let mut json = Vec::new();
    XzDecoder::new(blob)
        .read_to_end(&mut json)
        .map_err(|e| KeyboardError::Definition(format!("decompression failed: {e}")))?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use xz2::write::XzEncoder;

    const SAMPLE: &str = r#"{
        "name": "Test 4x12",
        "matrix": {"rows": 4, "cols": 12},
        "layouts": {
            "keymap": [["0,0", "0,1"], ["1,0"]],
            "labels": ["Split Backspace", ["Bottom Row", "2u", "1u", "ANSI"]]
        },
        "customKeycodes": [
            {"name": "CK_TEST", "title": "Test key", "shortName": "Test"}
        ]
    }"#;

    fn compress(data: &[u8]) -> Vec<u8> {
        let mut enc = XzEncoder::new(Vec::new(), 6);
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn test_from_blob() {
        let def = KeyboardDefinition::from_blob(&compress(SAMPLE.as_bytes())).unwrap();
        assert_eq!(def.name.as_deref(), Some("Test 4x12"));
        assert_eq!(def.matrix, Matrix { rows: 4, cols: 12 });
        assert_eq!(def.layouts.keymap.len(), 2);
        assert_eq!(def.custom_keycodes[0].short_name, "Test");
        assert_eq!(def.layout_option_bits(), vec![1, 2]);
    }

    #[test]
    fn test_corrupt_blob_is_error() {
        let err = KeyboardDefinition::from_blob(b"not xz at all").unwrap_err();
        assert!(matches!(err, KeyboardError::Definition(_)));

        let err = KeyboardDefinition::from_blob(&compress(b"{\"matrix\": 3}")).unwrap_err();
        assert!(matches!(err, KeyboardError::Definition(_)));
    }

    #[test]
    fn test_size_bounds() {
        assert!(check_size(0).is_err());
        assert!(check_size(MAX_DEFINITION_SIZE + 1).is_err());
        assert_eq!(check_size(1234).unwrap(), 1234);
    }

    #[test]
    fn test_assembler_raw_blocks() {
        let blob = compress(SAMPLE.as_bytes());
        let mut asm = BlobAssembler::new(blob.len());
        for chunk in blob.chunks(BLOCK_SIZE) {
            let mut block = chunk.to_vec();
            block.resize(BLOCK_SIZE, 0);
            asm.push(&block);
        }
        assert!(asm.is_complete());
        assert_eq!(asm.into_blob(), blob);
    }

    #[test]
    fn test_assembler_echoed_blocks() {
        let blob = compress(SAMPLE.as_bytes());
        assert_eq!(block_count(blob.len(), 2), blob.len().div_ceil(30));

        let mut asm = BlobAssembler::new(blob.len());
        for chunk in blob.chunks(BLOCK_SIZE - 2) {
            let mut block = vec![0xFE, vial::GET_KEYBOARD_DEFINITION];
            block.extend_from_slice(chunk);
            block.resize(BLOCK_SIZE, 0);
            asm.push(&block);
        }
        assert!(asm.is_complete());
        assert_eq!(
            KeyboardDefinition::from_blob(&asm.into_blob()).unwrap().matrix.cols,
            12
        );
    }
}
