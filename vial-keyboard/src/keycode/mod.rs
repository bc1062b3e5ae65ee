//! QMK keycode codec
//!
//! Keycodes are 16-bit integers. The low byte is a basic key; the high byte
//! either carries a modifier mask (`LCTL(kc)`, `LCTL_T(kc)`, `LT3(kc)`) or the
//! whole value falls in a reserved range (`MO(1)`, `M5`, `TD(2)`, `USER00`).
//!
//! # String forms
//!
//! ```text
//! 0x0004  → KC_A
//! 0x0104  → LCTL(KC_A)
//! 0x0100  → LCTL(kc)           (template with an empty slot)
//! 0x0B04  → LCTL(LSFT(LGUI(KC_A)))
//! 0x2104  → LCTL_T(KC_A)
//! 0x4304  → LT3(KC_A)          (also parsed from `LT(3, KC_A)`)
//! 0x2304  → 0x2304             (parsed from `MT(MOD_LCTL | MOD_LSFT, KC_A)`)
//! 0x5221  → MO(1)
//! 0x7705  → M5
//! 0x7E40  → USER00
//! 0x5FFF  → 0x5FFF             (anything unnamed)
//! ```
//!
//! Every codec instance owns its tables; custom keycodes from one device never
//! leak into another session.

mod names;

pub use names::{mods, range};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use names::{
    ALIASES, BASIC, LAYER_ACTION_COUNT, LAYER_TAP_COUNT, MACRO_COUNT, MOD_SHORTHANDS, MOD_TAP,
    ONE_SHOT_MODS, QUANTUM, SINGLE_MODS, TAP_DANCE_COUNT, USER_KEYCODE_COUNT,
};

/// Placeholder for the empty slot of a template
const SLOT: &str = "kc";

/// Device-defined key from the definition's `customKeycodes` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomKeycode {
    /// Internal name, accepted by [`KeycodeCodec::parse`] as an alias
    #[serde(default)]
    pub name: String,
    /// Short label shown on the key
    #[serde(default)]
    pub short_name: String,
    /// Longer description
    #[serde(default)]
    pub title: String,
}

/// Bidirectional keycode ↔ string translation for one session
#[derive(Debug, Clone)]
pub struct KeycodeCodec {
    /// Whole-code names (basic, quantum, layer actions, macros, ...)
    by_code: HashMap<u16, String>,
    /// Every canonical name, templates included
    by_name: HashMap<String, u16>,
    /// High-byte mask → `NAME(kc)` template
    templates: HashMap<u16, String>,
    aliases: HashMap<String, String>,
    custom: Vec<CustomKeycode>,
}

impl Default for KeycodeCodec {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl KeycodeCodec {
    /// Build the tables, merging the device's custom keycodes into the
    /// `USER00..USER63` slots.
    pub fn new(custom: &[CustomKeycode]) -> Self {
        let mut codec = Self {
            by_code: HashMap::new(),
            by_name: HashMap::new(),
            templates: HashMap::new(),
            aliases: HashMap::new(),
            custom: custom
                .iter()
                .take(USER_KEYCODE_COUNT as usize)
                .cloned()
                .collect(),
        };

        for &(code, name) in BASIC.iter().chain(QUANTUM) {
            codec.insert(code, name.to_string());
        }

        for mask in 0x01..=0x1Fu8 {
            if mask == mods::RIGHT {
                continue;
            }
            codec.insert_template((mask as u16) << 8, mod_template(mask));
        }
        for &(mask, name) in MOD_TAP {
            codec.insert_template(range::QK_MOD_TAP | ((mask as u16) << 8), format!("{name}({SLOT})"));
        }
        for n in 0..LAYER_TAP_COUNT {
            codec.insert_template(range::QK_LAYER_TAP | (n << 8), format!("LT{n}({SLOT})"));
        }

        for n in 0..LAYER_ACTION_COUNT {
            codec.insert(range::QK_TO + n, format!("TO({n})"));
            codec.insert(range::QK_MOMENTARY + n, format!("MO({n})"));
            codec.insert(range::QK_DEF_LAYER + n, format!("DF({n})"));
            codec.insert(range::QK_TOGGLE_LAYER + n, format!("TG({n})"));
            codec.insert(range::QK_ONE_SHOT_LAYER + n, format!("OSL({n})"));
            codec.insert(range::QK_LAYER_TAP_TOGGLE + n, format!("TT({n})"));
        }
        for &(mask, name) in ONE_SHOT_MODS {
            codec.insert(range::QK_ONE_SHOT_MOD + mask as u16, name.to_string());
        }
        for n in 0..TAP_DANCE_COUNT {
            codec.insert(range::QK_TAP_DANCE + n, format!("TD({n})"));
        }
        for n in 0..MACRO_COUNT {
            codec.insert(range::QK_MACRO + n, format!("M{n}"));
        }
        for n in 0..USER_KEYCODE_COUNT {
            codec.insert(range::QK_USER + n, format!("USER{n:02}"));
        }

        for &(alias, canonical) in ALIASES {
            codec.aliases.insert(alias.to_string(), canonical.to_string());
        }
        let custom_aliases: Vec<(String, String)> = codec
            .custom
            .iter()
            .enumerate()
            .filter(|(_, key)| !key.name.is_empty() && !codec.by_name.contains_key(&key.name))
            .map(|(i, key)| (key.name.clone(), format!("USER{i:02}")))
            .collect();
        codec.aliases.extend(custom_aliases);

        codec
    }

    fn insert(&mut self, code: u16, name: String) {
        self.by_name.insert(name.clone(), code);
        self.by_code.insert(code, name);
    }

    fn insert_template(&mut self, mask: u16, template: String) {
        self.by_name.insert(template.clone(), mask);
        self.templates.insert(mask, template);
    }

    /// Device-defined keys, in `USERnn` order
    pub fn custom_keycodes(&self) -> &[CustomKeycode] {
        &self.custom
    }

    /// Canonical string form of `code`. Total: unnamed codes become `0x%04X`.
    pub fn stringify(&self, code: u16) -> String {
        let mask = code & 0xFF00;
        let base = code & 0x00FF;

        if let Some(template) = self.templates.get(&mask) {
            if base == 0 {
                return template.clone();
            }
            if let Some(name) = self.by_code.get(&base) {
                return template.replace(SLOT, name);
            }
        }
        if let Some(name) = self.by_code.get(&code) {
            return name.clone();
        }
        format!("0x{code:04X}")
    }

    /// Parse a keycode string. `None` means the string names no keycode.
    pub fn parse(&self, s: &str) -> Option<u16> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if s.eq_ignore_ascii_case(SLOT) {
            return Some(0);
        }
        let s = self.aliases.get(s).map(String::as_str).unwrap_or(s);

        if let Some((name, arg)) = split_call(s) {
            if arg.contains(',') {
                return self.parse_tap_call(name, arg);
            }
            let template = format!("{name}({SLOT})");
            let template = self
                .aliases
                .get(&template)
                .cloned()
                .unwrap_or(template);
            if let Some(&mask) = self.by_name.get(&template) {
                if self.templates.contains_key(&mask) {
                    let inner = self.parse(arg)?;
                    return compose(mask, inner);
                }
            }
        }

        if let Some(&code) = self.by_name.get(s) {
            return Some(code);
        }
        if let Some(code) = parse_int(s) {
            return Some(code);
        }
        if s.bytes().any(|b| b.is_ascii_lowercase()) {
            return self.parse(&s.to_ascii_uppercase());
        }
        None
    }

    /// `LT(layer, kc)` and `MT(mods, kc)`
    fn parse_tap_call(&self, name: &str, args: &str) -> Option<u16> {
        let (first, kc) = args.split_once(',')?;
        let kc = self.parse(kc)?;
        if name.eq_ignore_ascii_case("LT") {
            let layer = parse_int(first.trim()).filter(|&n| n < LAYER_TAP_COUNT)?;
            compose(range::QK_LAYER_TAP | (layer << 8), kc)
        } else if name.eq_ignore_ascii_case("MT") {
            let mask = parse_mod_mask(first)?;
            compose(range::QK_MOD_TAP | ((mask as u16) << 8), kc)
        } else {
            None
        }
    }

    /// Short display label: the custom short name for device keys, the
    /// canonical string otherwise.
    pub fn label(&self, code: u16) -> String {
        if let Some(key) = code
            .checked_sub(range::QK_USER)
            .and_then(|i| self.custom.get(i as usize))
        {
            if !key.short_name.is_empty() {
                return key.short_name.clone();
            }
        }
        self.stringify(code)
    }

    /// Every code that has a name (whole-code names and template masks)
    pub fn named_codes(&self) -> impl Iterator<Item = u16> + '_ {
        self.by_name.values().copied()
    }
}

/// `LCTL(kc)`, `C_S(kc)`, or a nesting of single-modifier wrappers when QMK
/// has no shorthand for the mask.
fn mod_template(mask: u8) -> String {
    if let Some(&(_, name)) = SINGLE_MODS
        .iter()
        .chain(MOD_SHORTHANDS)
        .find(|(m, _)| *m == mask)
    {
        return format!("{name}({SLOT})");
    }

    let side = mask & mods::RIGHT;
    let mut template = SLOT.to_string();
    for bit in [mods::GUI, mods::ALT, mods::SFT, mods::CTL] {
        if mask & bit == 0 {
            continue;
        }
        if let Some(&(_, name)) = SINGLE_MODS.iter().find(|(m, _)| *m == side | bit) {
            template = format!("{name}({template})");
        }
    }
    template
}

/// Merge a template mask with its argument, rejecting arguments the
/// encoding cannot hold.
fn compose(mask: u16, inner: u16) -> Option<u16> {
    let limit = if mask <= range::QK_MODS_MAX {
        range::QK_MODS_MAX
    } else {
        range::QK_BASIC_MAX
    };
    (inner <= limit).then_some(mask | inner)
}

/// `MOD_LCTL | MOD_LSFT`, `MOD_HYPR` or a plain number
fn parse_mod_mask(s: &str) -> Option<u8> {
    let mut mask = 0u8;
    for part in s.split('|') {
        let part = part.trim().to_ascii_uppercase();
        let bits = match part.strip_prefix("MOD_") {
            Some(name) => SINGLE_MODS
                .iter()
                .chain(MOD_SHORTHANDS)
                .find(|(_, n)| *n == name)
                .map(|&(m, _)| m)?,
            None => u8::try_from(parse_int(&part)?).ok()?,
        };
        mask |= bits;
    }
    (1..=0x1F).contains(&mask).then_some(mask)
}

/// Split `NAME(ARG)` at the first `(` and the final `)`
fn split_call(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let inner = s.strip_suffix(')')?;
    let name = &s[..open];
    if name.is_empty() {
        return None;
    }
    Some((name, inner[open + 1..].trim()))
}

fn parse_int(s: &str) -> Option<u16> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}
