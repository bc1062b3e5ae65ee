//! KLE layout deserializer
//!
//! The definition's `layouts.keymap` is keyboard-layout-editor JSON: an array
//! of rows, each row a mix of key labels (strings) and property objects that
//! modify the keys after them. A key's first label line is its matrix
//! position `"row,col"`; the fourth line, when present, is the layout option
//! `"option,choice"` the key belongs to. Encoders are keys whose tenth label
//! line is `e`, with `"index,direction"` as their first line.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::KeyboardError;

/// Position and size of one switch, in key units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyGeometry {
    pub row: u8,
    pub col: u8,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Rotation in degrees around (`rx`, `ry`)
    pub r: f64,
    pub rx: f64,
    pub ry: f64,
    /// Layout option (option, choice) this key is drawn for
    pub option: Option<(u8, u8)>,
}

/// One rotation direction of an encoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderGeometry {
    pub index: u8,
    /// 0 = counter-clockwise, 1 = clockwise
    pub direction: u8,
    pub x: f64,
    pub y: f64,
}

/// Deserialized physical layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub keys: Vec<KeyGeometry>,
    pub encoders: Vec<EncoderGeometry>,
}

/// Property object in a KLE row
#[derive(Debug, Default, Deserialize)]
struct KleProps {
    x: Option<f64>,
    y: Option<f64>,
    w: Option<f64>,
    h: Option<f64>,
    r: Option<f64>,
    rx: Option<f64>,
    ry: Option<f64>,
}

/// Running cursor while walking the rows
struct Cursor {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    r: f64,
    rx: f64,
    ry: f64,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: 1.0,
            h: 1.0,
            r: 0.0,
            rx: 0.0,
            ry: 0.0,
        }
    }
}

impl Cursor {
    fn apply(&mut self, props: KleProps) {
        if let Some(r) = props.r {
            self.r = r;
        }
        if let Some(rx) = props.rx {
            self.rx = rx;
            self.x = self.rx;
            self.y = self.ry;
        }
        if let Some(ry) = props.ry {
            self.ry = ry;
            self.x = self.rx;
            self.y = self.ry;
        }
        self.x += props.x.unwrap_or(0.0);
        self.y += props.y.unwrap_or(0.0);
        if let Some(w) = props.w {
            self.w = w;
        }
        if let Some(h) = props.h {
            self.h = h;
        }
    }

    /// Move past the key just placed
    fn advance(&mut self) {
        self.x += self.w;
        self.w = 1.0;
        self.h = 1.0;
    }

    fn next_row(&mut self) {
        self.y += 1.0;
        self.x = self.rx;
    }
}

impl Layout {
    /// Deserialize KLE rows
    pub fn from_kle(rows: &[Value]) -> Result<Self, KeyboardError> {
        let mut layout = Layout::default();
        let mut cursor = Cursor::default();

        for row in rows {
            // Metadata objects sit outside the row arrays
            let Value::Array(items) = row else {
                continue;
            };
            for item in items {
                match item {
                    Value::Object(_) => {
                        let props: KleProps = serde_json::from_value(item.clone())
                            .map_err(|e| KeyboardError::Definition(format!("bad KLE key properties: {e}")))?;
                        cursor.apply(props);
                    }
                    Value::String(label) => {
                        layout.place(label, &cursor);
                        cursor.advance();
                    }
                    _ => {
                        return Err(KeyboardError::Definition(format!(
                            "unexpected KLE element: {item}"
                        )))
                    }
                }
            }
            cursor.next_row();
        }

        Ok(layout)
    }

    fn place(&mut self, label: &str, cursor: &Cursor) {
        let lines: Vec<&str> = label.split('\n').collect();
        let first = lines.first().copied().unwrap_or_default();

        let encoder = if lines.get(9).map(|l| l.trim()) == Some("e") {
            parse_pair(first)
        } else {
            first.strip_prefix('e').and_then(parse_pair)
        };
        if let Some((index, direction)) = encoder {
            self.encoders.push(EncoderGeometry {
                index,
                direction,
                x: cursor.x,
                y: cursor.y,
            });
            return;
        }

        // Labels without a matrix position are decorative
        let Some((row, col)) = parse_pair(first) else {
            return;
        };
        self.keys.push(KeyGeometry {
            row,
            col,
            x: cursor.x,
            y: cursor.y,
            w: cursor.w,
            h: cursor.h,
            r: cursor.r,
            rx: cursor.rx,
            ry: cursor.ry,
            option: lines.get(3).and_then(|l| parse_pair(l)),
        });
    }

    /// Keys indexed by matrix position. With layout options, the first key
    /// listed for a position wins.
    pub fn by_position(&self) -> HashMap<(u8, u8), &KeyGeometry> {
        let mut map = HashMap::new();
        for key in &self.keys {
            map.entry((key.row, key.col)).or_insert(key);
        }
        map
    }

    /// Number of encoders in the layout
    pub fn encoder_count(&self) -> usize {
        self.encoders
            .iter()
            .map(|e| e.index as usize + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Parse `"a,b"` into two small integers
fn parse_pair(s: &str) -> Option<(u8, u8)> {
    let (a, b) = s.trim().split_once(',')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}
