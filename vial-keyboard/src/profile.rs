//! "vil" profile files
//!
//! A vil file is the JSON dump of a keyboard's configuration with every
//! keycode written as its codec string. Export reads a [`KeyboardModel`];
//! import validates the file and applies it onto a model fetched from the
//! connected keyboard, so only what the keyboard supports is overwritten.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::dynamic::{Combo, KeyOverride, TapDance};
use crate::error::KeyboardError;
use crate::keycode::KeycodeCodec;
use crate::macros::{self, Macro, MacroAction};
use crate::model::KeyboardModel;

/// Only vil version understood
pub const VIL_VERSION: u32 = 1;

/// One keymap cell. Vial writes `-1` for matrix positions with no switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VilKey {
    Name(String),
    Absent(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VilKeyOverride {
    pub trigger: String,
    pub replacement: String,
    pub layers: u16,
    pub trigger_mods: u8,
    pub negative_mod_mask: u8,
    pub suppressed_mods: u8,
    pub options: u8,
}

/// On-disk profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub version: u32,
    #[serde(default)]
    pub uid: u64,
    /// `[layer][row][col]`
    pub layout: Vec<Vec<Vec<VilKey>>>,
    /// `[layer][encoder]` as `[ccw, cw]`
    #[serde(default)]
    pub encoder_layout: Vec<Vec<[String; 2]>>,
    /// `-1` when the keyboard has no layout options
    #[serde(default = "no_layout_options")]
    pub layout_options: i64,
    #[serde(rename = "macro", default)]
    pub macros: Vec<Vec<Value>>,
    #[serde(default)]
    pub vial_protocol: i64,
    #[serde(default)]
    pub via_protocol: i64,
    /// `[on_tap, on_hold, on_double_tap, on_tap_hold, tapping_term]`
    #[serde(default)]
    pub tap_dance: Vec<(String, String, String, String, u16)>,
    /// `[key1, key2, key3, key4, output]`
    #[serde(default)]
    pub combo: Vec<[String; 5]>,
    #[serde(default)]
    pub key_override: Vec<VilKeyOverride>,
    /// Setting id (as a string) to value
    #[serde(default)]
    pub settings: BTreeMap<String, u32>,
}

fn no_layout_options() -> i64 {
    -1
}

// ============================================================================
// Export
// ============================================================================

impl Profile {
    /// Snapshot a model
    pub fn export(model: &KeyboardModel, codec: &KeycodeCodec) -> Self {
        let name = |kc: u16| codec.stringify(kc);
        let cols = model.cols.max(1) as usize;

        Self {
            version: VIL_VERSION,
            uid: model.identity.keyboard_id,
            layout: model
                .keymap
                .iter()
                .map(|layer| {
                    layer
                        .chunks(cols)
                        .map(|row| row.iter().map(|&kc| VilKey::Name(name(kc))).collect())
                        .collect()
                })
                .collect(),
            encoder_layout: model
                .encoders
                .iter()
                .map(|layer| layer.iter().map(|&(ccw, cw)| [name(ccw), name(cw)]).collect())
                .collect(),
            layout_options: if model.definition.layouts.labels.is_empty() {
                -1
            } else {
                model.layout_options as i64
            },
            macros: model
                .macros
                .iter()
                .map(|m| m.iter().map(|a| action_to_json(a, codec)).collect())
                .collect(),
            vial_protocol: model.identity.vial_protocol as i64,
            via_protocol: model.identity.via_protocol as i64,
            tap_dance: model
                .tap_dances
                .iter()
                .map(|td| {
                    (
                        name(td.on_tap),
                        name(td.on_hold),
                        name(td.on_double_tap),
                        name(td.on_tap_hold),
                        td.tapping_term,
                    )
                })
                .collect(),
            combo: model
                .combos
                .iter()
                .map(|c| {
                    [
                        name(c.keys[0]),
                        name(c.keys[1]),
                        name(c.keys[2]),
                        name(c.keys[3]),
                        name(c.output),
                    ]
                })
                .collect(),
            key_override: model
                .key_overrides
                .iter()
                .map(|ko| VilKeyOverride {
                    trigger: name(ko.trigger),
                    replacement: name(ko.replacement),
                    layers: ko.layers,
                    trigger_mods: ko.trigger_mods,
                    negative_mod_mask: ko.negative_mod_mask,
                    suppressed_mods: ko.suppressed_mods,
                    options: ko.options,
                })
                .collect(),
            settings: model
                .settings
                .iter()
                .map(|(id, value)| (id.to_string(), *value))
                .collect(),
        }
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String, KeyboardError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| KeyboardError::InvalidParameter(format!("profile serialization: {e}")))
    }

    /// Write the profile to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), KeyboardError> {
        std::fs::write(path.as_ref(), self.to_json()?).map_err(|e| {
            KeyboardError::InvalidParameter(format!("write {}: {e}", path.as_ref().display()))
        })
    }
}

fn action_to_json(action: &MacroAction, codec: &KeycodeCodec) -> Value {
    match action {
        MacroAction::Tap(kc) => json!(["tap", codec.stringify(*kc)]),
        MacroAction::Down(kc) => json!(["down", codec.stringify(*kc)]),
        MacroAction::Up(kc) => json!(["up", codec.stringify(*kc)]),
        MacroAction::Delay(ms) => json!(["delay", ms]),
        MacroAction::Text(text) => json!(["text", text]),
    }
}

// ============================================================================
// Import
// ============================================================================

impl Profile {
    /// Parse and validate a profile
    pub fn from_json(json: &str) -> Result<Self, KeyboardError> {
        let profile: Profile = serde_json::from_str(json)
            .map_err(|e| KeyboardError::InvalidParameter(format!("invalid vil file: {e}")))?;
        if profile.version != VIL_VERSION {
            return Err(KeyboardError::NotSupported(format!(
                "vil version {} (expected {VIL_VERSION})",
                profile.version
            )));
        }
        Ok(profile)
    }

    /// Read a profile from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, KeyboardError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            KeyboardError::InvalidParameter(format!("read {}: {e}", path.as_ref().display()))
        })?;
        Self::from_json(&content)
    }

    /// Overwrite `model` with the profile's contents.
    ///
    /// Entries beyond what the keyboard provides are ignored. Nothing in
    /// `model` changes unless the whole profile resolves.
    pub fn apply(&self, model: &mut KeyboardModel, codec: &KeycodeCodec) -> Result<(), KeyboardError> {
        if self.uid != 0 && self.uid != model.identity.keyboard_id {
            warn!(
                "Profile uid {:#018x} does not match keyboard {:#018x}",
                self.uid, model.identity.keyboard_id
            );
        }

        let mut next = model.clone();
        let key = |field: String, s: &str| -> Result<u16, KeyboardError> {
            codec.parse(s).ok_or_else(|| {
                KeyboardError::InvalidParameter(format!("{field}: unknown keycode \"{s}\""))
            })
        };

        for (l, layer) in self.layout.iter().enumerate().take(next.layers as usize) {
            for (r, row) in layer.iter().enumerate().take(next.rows as usize) {
                for (c, cell) in row.iter().enumerate().take(next.cols as usize) {
                    if let VilKey::Name(s) = cell {
                        let kc = key(format!("layout[{l}][{r}][{c}]"), s)?;
                        next.set_keycode(l as u8, r as u8, c as u8, kc);
                    }
                }
            }
        }

        for (l, layer) in self.encoder_layout.iter().enumerate() {
            let Some(target) = next.encoders.get_mut(l) else {
                break;
            };
            for (e, [ccw, cw]) in layer.iter().enumerate() {
                let Some(slot) = target.get_mut(e) else {
                    break;
                };
                *slot = (
                    key(format!("encoder_layout[{l}][{e}][0]"), ccw)?,
                    key(format!("encoder_layout[{l}][{e}][1]"), cw)?,
                );
            }
        }

        if let Ok(options) = u32::try_from(self.layout_options) {
            next.layout_options = options;
        }

        for (i, actions) in self.macros.iter().enumerate() {
            let Some(slot) = next.macros.get_mut(i) else {
                break;
            };
            *slot = macro_from_json(actions, codec, i)?;
        }

        for (i, td) in self.tap_dance.iter().enumerate() {
            let Some(slot) = next.tap_dances.get_mut(i) else {
                break;
            };
            *slot = TapDance {
                on_tap: key(format!("tap_dance[{i}][0]"), &td.0)?,
                on_hold: key(format!("tap_dance[{i}][1]"), &td.1)?,
                on_double_tap: key(format!("tap_dance[{i}][2]"), &td.2)?,
                on_tap_hold: key(format!("tap_dance[{i}][3]"), &td.3)?,
                tapping_term: td.4,
            };
        }

        for (i, combo) in self.combo.iter().enumerate() {
            let Some(slot) = next.combos.get_mut(i) else {
                break;
            };
            let mut codes = [0u16; 5];
            for (j, s) in combo.iter().enumerate() {
                codes[j] = key(format!("combo[{i}][{j}]"), s)?;
            }
            *slot = Combo {
                keys: [codes[0], codes[1], codes[2], codes[3]],
                output: codes[4],
            };
        }

        for (i, ko) in self.key_override.iter().enumerate() {
            let Some(slot) = next.key_overrides.get_mut(i) else {
                break;
            };
            *slot = KeyOverride {
                trigger: key(format!("key_override[{i}].trigger"), &ko.trigger)?,
                replacement: key(format!("key_override[{i}].replacement"), &ko.replacement)?,
                layers: ko.layers,
                trigger_mods: ko.trigger_mods,
                negative_mod_mask: ko.negative_mod_mask,
                suppressed_mods: ko.suppressed_mods,
                options: ko.options,
            };
        }

        for (id, value) in &self.settings {
            let id: u16 = id.parse().map_err(|_| {
                KeyboardError::InvalidParameter(format!("settings: bad setting id \"{id}\""))
            })?;
            match next.settings.get_mut(&id) {
                Some(slot) => *slot = *value,
                None => debug!("Skipping setting {id}: not supported by this keyboard"),
            }
        }

        *model = next;
        Ok(())
    }
}

fn macro_from_json(
    actions: &[Value],
    codec: &KeycodeCodec,
    index: usize,
) -> Result<Macro, KeyboardError> {
    let bad = |j: usize, what: &str| {
        KeyboardError::InvalidParameter(format!("macro[{index}][{j}]: {what}"))
    };

    let mut out = Vec::new();
    for (j, action) in actions.iter().enumerate() {
        let items = action.as_array().ok_or_else(|| bad(j, "expected an array"))?;
        let (kind, args) = items
            .split_first()
            .ok_or_else(|| bad(j, "empty action"))?;
        match kind.as_str() {
            Some(kind @ ("tap" | "down" | "up")) => {
                for arg in args {
                    let s = arg.as_str().ok_or_else(|| bad(j, "expected a keycode string"))?;
                    let kc = codec
                        .parse(s)
                        .ok_or_else(|| bad(j, &format!("unknown keycode \"{s}\"")))?;
                    out.push(match kind {
                        "tap" => MacroAction::Tap(kc),
                        "down" => MacroAction::Down(kc),
                        _ => MacroAction::Up(kc),
                    });
                }
            }
            Some("delay") => {
                let ms = args
                    .first()
                    .and_then(Value::as_u64)
                    .and_then(|ms| u16::try_from(ms).ok())
                    .ok_or_else(|| bad(j, "invalid delay"))?;
                out.push(MacroAction::Delay(ms));
            }
            Some("text") => {
                let text = args
                    .first()
                    .and_then(Value::as_str)
                    .ok_or_else(|| bad(j, "expected text"))?;
                out.push(MacroAction::Text(text.to_string()));
            }
            _ => return Err(bad(j, &format!("unknown action {kind}"))),
        }
    }
    Ok(macros::normalize(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::DynamicCounts;
    use crate::settings::DeviceIdentity;

    fn model() -> KeyboardModel {
        let mut flat = vec![0u16; 2 * 2 * 3];
        flat[0] = 0x0029; // KC_ESC
        flat[1] = 0x0104; // LCTL(KC_A)
        let mut m = KeyboardModel {
            identity: DeviceIdentity {
                via_protocol: 9,
                vial_protocol: 6,
                keyboard_id: 0x1122_3344_5566_7788,
                ..Default::default()
            },
            rows: 2,
            cols: 3,
            layers: 2,
            keymap: KeyboardModel::keymap_from_flat(&flat, 2, 3),
            encoders: vec![vec![(0x0080, 0x0081)], vec![(0, 0)]],
            macros: vec![
                vec![
                    MacroAction::Down(0x00E1),
                    MacroAction::Tap(0x0004),
                    MacroAction::Up(0x00E1),
                    MacroAction::Delay(300),
                    MacroAction::Text("hi".into()),
                ],
                vec![],
            ],
            dynamic_counts: DynamicCounts {
                tap_dance: 1,
                combo: 1,
                key_override: 1,
            },
            tap_dances: vec![TapDance {
                on_tap: 0x0004,
                on_hold: 0x00E0,
                tapping_term: 200,
                ..Default::default()
            }],
            combos: vec![Combo {
                keys: [0x0004, 0x0005, 0, 0],
                output: 0x0029,
            }],
            key_overrides: vec![KeyOverride::default()],
            ..Default::default()
        };
        m.settings.insert(7, 180);
        m
    }

    #[test]
    fn test_export_uses_keycode_names() {
        let codec = KeycodeCodec::default();
        let p = Profile::export(&model(), &codec);
        assert_eq!(p.version, VIL_VERSION);
        assert_eq!(p.layout.len(), 2);
        assert_eq!(p.layout[0].len(), 2);
        assert_eq!(p.layout[0][0][0], VilKey::Name(codec.stringify(0x0029)));
        assert_eq!(p.layout[0][0][1], VilKey::Name("LCTL(KC_A)".into()));
        assert_eq!(p.macros[0][3], json!(["delay", 300]));
        assert_eq!(p.combo[0][4], codec.stringify(0x0029));
        assert_eq!(p.settings.get("7"), Some(&180));
        assert_eq!(p.layout_options, -1);
    }

    #[test]
    fn test_export_import_round_trip() {
        let codec = KeycodeCodec::default();
        let original = model();
        let json = Profile::export(&original, &codec).to_json().unwrap();

        let mut target = original.clone();
        target.keymap = KeyboardModel::keymap_from_flat(&[0; 12], 2, 3);
        target.macros = vec![vec![], vec![]];
        target.tap_dances = vec![TapDance::default()];
        target.settings.insert(7, 0);

        Profile::from_json(&json).unwrap().apply(&mut target, &codec).unwrap();
        assert_eq!(target, original);
    }

    #[test]
    fn test_vial_file_with_absent_keys() {
        let codec = KeycodeCodec::default();
        let json = r#"{
            "version": 1,
            "uid": 0,
            "layout": [[["KC_B", -1, "KC_C"], [-1, -1, -1]]],
            "macro": [[["tap", "KC_A", "KC_B"], ["text", "x"], ["text", "y"]]],
            "settings": {"7": 250, "99": 1}
        }"#;
        let mut m = model();
        Profile::from_json(json).unwrap().apply(&mut m, &codec).unwrap();
        assert_eq!(m.keycode(0, 0, 0), Some(0x0005));
        assert_eq!(m.keycode(0, 0, 1), Some(0x0104));
        assert_eq!(m.keycode(0, 0, 2), Some(0x0006));
        assert_eq!(
            m.macros[0],
            vec![
                MacroAction::Tap(0x0004),
                MacroAction::Tap(0x0005),
                MacroAction::Text("xy".into())
            ]
        );
        assert_eq!(m.settings.get(&7), Some(&250));
        assert!(!m.settings.contains_key(&99));
    }

    #[test]
    fn test_unknown_keycode_names_field() {
        let codec = KeycodeCodec::default();
        let mut p = Profile::export(&model(), &codec);
        p.combo[0][2] = "KC_NOPE".into();

        let mut m = model();
        let before = m.clone();
        let err = p.apply(&mut m, &codec).unwrap_err();
        match err {
            KeyboardError::InvalidParameter(msg) => {
                assert!(msg.contains("combo[0][2]"), "{msg}");
                assert!(msg.contains("KC_NOPE"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(m, before);
    }

    #[test]
    fn test_rejects_bad_files() {
        assert!(Profile::from_json("{").is_err());
        let err = Profile::from_json(r#"{"version": 2, "layout": []}"#).unwrap_err();
        assert!(matches!(err, KeyboardError::NotSupported(_)));

        let codec = KeycodeCodec::default();
        let p = Profile::from_json(r#"{"version": 1, "layout": [], "macro": [[["wiggle"]]]}"#)
            .unwrap();
        assert!(p.apply(&mut model(), &codec).is_err());
    }
}
