//! Reply decoding.
//!
//! Every query names how its reply should be unpacked with a [`DecodeSpec`].
//! Struct formats follow the familiar `struct` module syntax:
//!
//! ```text
//! <BHHHHH   little-endian: u8, then five u16
//! >xH       big-endian: skip one byte, then u16
//! <4H       repeat count: four u16
//! ```
//!
//! Supported field codes: `B` (u8), `H` (u16), `I` (u32), `Q` (u64), `x` (pad).

use thiserror::Error;

/// Errors produced while unpacking a reply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload too short: need {needed} bytes, got {got}")]
    TooShort { needed: usize, got: usize },

    #[error("bad struct format {format:?}: {reason}")]
    BadFormat { format: String, reason: String },

    #[error("field index {index} out of range ({len} fields)")]
    Index { index: usize, len: usize },
}

/// Element width for integer-array decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    U8,
    U16,
    U32,
}

impl Width {
    pub fn bytes(self) -> usize {
        match self {
            Width::U8 => 1,
            Width::U16 => 2,
            Width::U32 => 4,
        }
    }
}

/// How to unpack a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeSpec {
    /// Whole reply as bytes
    Raw,
    /// Reply as an array of fixed-width unsigned integers
    Ints {
        width: Width,
        big_endian: bool,
        /// Extract a single element instead of the whole array
        index: Option<usize>,
    },
    /// Struct-style unpack
    Struct(String),
    /// Struct-style unpack returning one field
    Field { format: String, index: usize },
}

impl DecodeSpec {
    pub fn ints(width: Width, big_endian: bool) -> Self {
        DecodeSpec::Ints {
            width,
            big_endian,
            index: None,
        }
    }

    pub fn int_at(width: Width, big_endian: bool, index: usize) -> Self {
        DecodeSpec::Ints {
            width,
            big_endian,
            index: Some(index),
        }
    }

    pub fn unpack(format: &str) -> Self {
        DecodeSpec::Struct(format.to_string())
    }

    pub fn field(format: &str, index: usize) -> Self {
        DecodeSpec::Field {
            format: format.to_string(),
            index,
        }
    }

    /// Decode a reply according to this spec
    pub fn decode(&self, data: &[u8]) -> Result<Decoded, DecodeError> {
        match self {
            DecodeSpec::Raw => Ok(Decoded::Bytes(data.to_vec())),
            DecodeSpec::Ints {
                width,
                big_endian,
                index,
            } => decode_ints(data, *width, *big_endian, *index),
            DecodeSpec::Struct(format) => unpack(format, data).map(Decoded::Fields),
            DecodeSpec::Field { format, index } => {
                let fields = unpack(format, data)?;
                fields
                    .get(*index)
                    .copied()
                    .map(Decoded::Int)
                    .ok_or(DecodeError::Index {
                        index: *index,
                        len: fields.len(),
                    })
            }
        }
    }
}

/// Result of decoding a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Bytes(Vec<u8>),
    Ints(Vec<u64>),
    Int(u64),
    Fields(Vec<u64>),
}

impl Decoded {
    /// Single integer value (`Int`, or the first element of an array)
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Decoded::Int(v) => Some(*v),
            Decoded::Ints(v) | Decoded::Fields(v) => v.first().copied(),
            Decoded::Bytes(b) => b.first().map(|&b| b as u64),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Decoded::Bytes(b) => b,
            Decoded::Ints(v) | Decoded::Fields(v) => v.into_iter().map(|x| x as u8).collect(),
            Decoded::Int(v) => vec![v as u8],
        }
    }

    /// Integer sequence (`Ints` / `Fields`, or a one-element vec for `Int`)
    pub fn into_values(self) -> Vec<u64> {
        match self {
            Decoded::Ints(v) | Decoded::Fields(v) => v,
            Decoded::Int(v) => vec![v],
            Decoded::Bytes(b) => b.into_iter().map(u64::from).collect(),
        }
    }
}

fn read_uint(bytes: &[u8], big_endian: bool) -> u64 {
    let fold = |acc: u64, &b: &u8| (acc << 8) | b as u64;
    if big_endian {
        bytes.iter().fold(0, fold)
    } else {
        bytes.iter().rev().fold(0, fold)
    }
}

fn decode_ints(
    data: &[u8],
    width: Width,
    big_endian: bool,
    index: Option<usize>,
) -> Result<Decoded, DecodeError> {
    let w = width.bytes();
    match index {
        Some(i) => {
            let needed = (i + 1) * w;
            if data.len() < needed {
                return Err(DecodeError::TooShort {
                    needed,
                    got: data.len(),
                });
            }
            Ok(Decoded::Int(read_uint(&data[i * w..needed], big_endian)))
        }
        None => Ok(Decoded::Ints(
            data.chunks_exact(w)
                .map(|c| read_uint(c, big_endian))
                .collect(),
        )),
    }
}

/// Largest repeat count accepted in a struct format. Buffers are addressed
/// with 16-bit offsets, so nothing longer can be unpacked.
const MAX_REPEAT: usize = u16::MAX as usize;

/// Parsed struct format: endianness plus field widths (0 = pad byte)
struct Format {
    big_endian: bool,
    fields: Vec<usize>,
}

impl Format {
    fn parse(format: &str) -> Result<Self, DecodeError> {
        let bad = |reason: String| DecodeError::BadFormat {
            format: format.to_string(),
            reason,
        };

        let mut chars = format.chars().peekable();
        let big_endian = match chars.peek() {
            Some('>') | Some('!') => {
                chars.next();
                true
            }
            Some('<') | Some('=') => {
                chars.next();
                false
            }
            _ => false,
        };

        let mut fields = Vec::new();
        let mut count: Option<usize> = None;
        for c in chars {
            if let Some(d) = c.to_digit(10) {
                count = count
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(d as usize))
                    .filter(|&n| n <= MAX_REPEAT)
                    .map(Some)
                    .ok_or_else(|| bad(format!("repeat count above {MAX_REPEAT}")))?;
                continue;
            }
            let width = match c {
                'x' => 0,
                'B' | 'b' | 'c' | '?' => 1,
                'H' | 'h' => 2,
                'I' | 'i' | 'L' | 'l' => 4,
                'Q' | 'q' => 8,
                ' ' => continue,
                other => return Err(bad(format!("unsupported field code '{other}'"))),
            };
            for _ in 0..count.take().unwrap_or(1) {
                fields.push(width);
            }
        }
        if count.is_some() {
            return Err(bad("trailing repeat count".into()));
        }
        Ok(Self { big_endian, fields })
    }

    fn size(&self) -> usize {
        self.fields.iter().map(|&w| w.max(1)).sum()
    }
}

/// Unpack `data` according to a struct format string.
///
/// Pad bytes are skipped and do not produce a value. Extra trailing bytes are
/// ignored, a short payload is an error.
pub fn unpack(format: &str, data: &[u8]) -> Result<Vec<u64>, DecodeError> {
    let fmt = Format::parse(format)?;
    let needed = fmt.size();
    if data.len() < needed {
        return Err(DecodeError::TooShort {
            needed,
            got: data.len(),
        });
    }

    let mut values = Vec::with_capacity(fmt.fields.len());
    let mut pos = 0;
    for width in fmt.fields {
        if width == 0 {
            pos += 1;
            continue;
        }
        values.push(read_uint(&data[pos..pos + width], fmt.big_endian));
        pos += width;
    }
    Ok(values)
}

/// Size in bytes of a struct format
pub fn calcsize(format: &str) -> Result<usize, DecodeError> {
    Format::parse(format).map(|f| f.size())
}
