//! Macro bytecode codec and text syntax.
//!
//! Macros live on the device as one contiguous buffer. Each macro is a run of
//! text bytes and `0x01`-prefixed actions, ended by a `0x00` terminator:
//!
//! ```text
//! 01 01 kc         tap
//! 01 02 kc         down
//! 01 03 kc         up
//! 01 04 lo hi      delay = (lo - 1) + (hi - 1) * 255 ms
//! 01 05 kc kc      tap,  16-bit keycode (little-endian)
//! 01 06 kc kc      down, 16-bit keycode
//! 01 07 kc kc      up,   16-bit keycode
//! other bytes      text typed verbatim
//! 00               end of macro
//! ```
//!
//! None of the encoded bytes may be zero except the terminator, so 16-bit
//! keycodes with a zero low byte are sent as `0xFF00 | (kc >> 8)`. That
//! leaves keycodes above `0xFF00` with no encoding of their own.
//!
//! Text carries no length, so two text steps in a row come back from the
//! device as one. [`normalize`] applies the same merge (and drops empty text)
//! so a macro compares equal before and after a round trip.
//!
//! # Text syntax
//!
//! ```text
//! KC_A                  → Tap(KC_A)
//! LCTL(KC_C)            → Tap(LCTL(KC_C))
//! KC_LSFT:down          → Down(KC_LSFT)
//! KC_LSFT:up            → Up(KC_LSFT)
//! 100ms                 → Delay(100)
//! "hello, world"        → Text("hello, world")
//! ```
//!
//! Steps are comma-separated; commas inside quotes belong to the text.

use std::fmt;

use crate::error::KeyboardError;
use crate::keycode::KeycodeCodec;

const PREFIX: u8 = 0x01;
const TAP: u8 = 0x01;
const DOWN: u8 = 0x02;
const UP: u8 = 0x03;
const DELAY: u8 = 0x04;
const WIDE_TAP: u8 = 0x05;
const WIDE_DOWN: u8 = 0x06;
const WIDE_UP: u8 = 0x07;
const TERMINATOR: u8 = 0x00;

/// Longest delay the two-byte encoding can carry
pub const MAX_DELAY_MS: u16 = 254 * 255 + 254;

/// One macro step
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MacroAction {
    Tap(u16),
    Down(u16),
    Up(u16),
    /// Pause in milliseconds
    Delay(u16),
    Text(String),
}

/// A macro is an ordered list of actions
pub type Macro = Vec<MacroAction>;

// ============================================================================
// Bytecode
// ============================================================================

/// Encode one macro, without its terminator.
pub fn encode_macro(actions: &[MacroAction]) -> Result<Vec<u8>, KeyboardError> {
    let mut out = Vec::new();
    for action in actions {
        match action {
            MacroAction::Tap(kc) => encode_key(&mut out, TAP, WIDE_TAP, *kc)?,
            MacroAction::Down(kc) => encode_key(&mut out, DOWN, WIDE_DOWN, *kc)?,
            MacroAction::Up(kc) => encode_key(&mut out, UP, WIDE_UP, *kc)?,
            MacroAction::Delay(ms) => {
                if *ms > MAX_DELAY_MS {
                    return Err(KeyboardError::InvalidParameter(format!(
                        "macro delay {ms}ms exceeds {MAX_DELAY_MS}ms"
                    )));
                }
                out.extend_from_slice(&[
                    PREFIX,
                    DELAY,
                    (ms % 255 + 1) as u8,
                    (ms / 255 + 1) as u8,
                ]);
            }
            MacroAction::Text(text) => {
                if text.bytes().any(|b| b == TERMINATOR || b == PREFIX) {
                    return Err(KeyboardError::InvalidParameter(
                        "macro text cannot contain 0x00 or 0x01 bytes".into(),
                    ));
                }
                out.extend_from_slice(text.as_bytes());
            }
        }
    }
    Ok(out)
}

fn encode_key(out: &mut Vec<u8>, short: u8, wide: u8, kc: u16) -> Result<(), KeyboardError> {
    if kc == 0 {
        return Err(KeyboardError::InvalidParameter(
            "macro key action needs a non-zero keycode".into(),
        ));
    }
    if kc > 0xFF00 {
        return Err(KeyboardError::InvalidParameter(format!(
            "keycode {kc:#06x} cannot be encoded in a macro"
        )));
    }
    if kc <= 0xFF {
        out.extend_from_slice(&[PREFIX, short, kc as u8]);
    } else {
        let wire = if kc & 0xFF == 0 { 0xFF00 | (kc >> 8) } else { kc };
        out.extend_from_slice(&[PREFIX, wide]);
        out.extend_from_slice(&wire.to_le_bytes());
    }
    Ok(())
}

/// Decode one macro's bytes (up to, not including, its terminator).
///
/// Truncated trailing actions are dropped.
pub fn decode_macro(bytes: &[u8]) -> Macro {
    let mut actions = Vec::new();
    let mut text = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == TERMINATOR {
            break;
        }
        if b != PREFIX {
            text.push(b);
            i += 1;
            continue;
        }

        flush_text(&mut actions, &mut text);
        let Some(&kind) = bytes.get(i + 1) else {
            break;
        };
        let action = match kind {
            TAP | DOWN | UP => bytes.get(i + 2).map(|&kc| {
                i += 3;
                key_action(kind, kc as u16)
            }),
            DELAY | WIDE_TAP | WIDE_DOWN | WIDE_UP => bytes.get(i + 2..i + 4).map(|arg| {
                i += 4;
                match kind {
                    DELAY => MacroAction::Delay(
                        (arg[0] as u16).saturating_sub(1) + (arg[1] as u16).saturating_sub(1) * 255,
                    ),
                    _ => {
                        let wire = u16::from_le_bytes([arg[0], arg[1]]);
                        let kc = if wire > 0xFF00 { (wire & 0xFF) << 8 } else { wire };
                        key_action(kind - (WIDE_TAP - TAP), kc)
                    }
                }
            }),
            _ => {
                // Unknown action: skip the prefix and its type byte
                i += 2;
                continue;
            }
        };
        match action {
            Some(action) => actions.push(action),
            None => break,
        }
    }

    flush_text(&mut actions, &mut text);
    actions
}

fn key_action(kind: u8, kc: u16) -> MacroAction {
    match kind {
        TAP => MacroAction::Tap(kc),
        DOWN => MacroAction::Down(kc),
        _ => MacroAction::Up(kc),
    }
}

fn flush_text(actions: &mut Macro, text: &mut Vec<u8>) {
    if !text.is_empty() {
        actions.push(MacroAction::Text(String::from_utf8_lossy(text).into_owned()));
        text.clear();
    }
}

/// Merge adjacent text steps and drop empty ones, matching what
/// [`decode_macro`] returns for the encoded bytes.
pub fn normalize(actions: Macro) -> Macro {
    let mut out: Macro = Vec::with_capacity(actions.len());
    for action in actions {
        if let MacroAction::Text(text) = &action {
            if text.is_empty() {
                continue;
            }
            if let Some(MacroAction::Text(prev)) = out.last_mut() {
                prev.push_str(text);
                continue;
            }
        }
        out.push(action);
    }
    out
}

/// Split a macro buffer into `count` macros.
///
/// Bytes after the `count`-th terminator are ignored; missing macros are
/// returned empty.
pub fn split(buffer: &[u8], count: usize) -> Vec<&[u8]> {
    // An unterminated tail is not a macro
    let terminated = terminators(buffer).min(count);
    let mut macros: Vec<&[u8]> = buffer
        .split(|&b| b == TERMINATOR)
        .take(terminated)
        .collect();
    macros.resize(count, &[][..]);
    macros
}

/// Decode the whole device buffer into `count` macros.
pub fn decode_buffer(buffer: &[u8], count: usize) -> Vec<Macro> {
    split(buffer, count).into_iter().map(decode_macro).collect()
}

/// Encode all macros into one buffer of at most `size` bytes.
///
/// The result is not padded; the caller pushes only the bytes returned.
pub fn encode_buffer(macros: &[Macro], size: usize) -> Result<Vec<u8>, KeyboardError> {
    let mut buffer = Vec::new();
    for actions in macros {
        buffer.extend(encode_macro(actions)?);
        buffer.push(TERMINATOR);
    }
    if buffer.len() > size {
        return Err(KeyboardError::InvalidParameter(format!(
            "macros need {} bytes but the device holds {size}",
            buffer.len()
        )));
    }
    Ok(buffer)
}

/// Count terminators seen so far; used to stop a buffer read early.
pub fn terminators(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == TERMINATOR).count()
}

// ============================================================================
// Text syntax
// ============================================================================

/// Error type for parsing the macro text syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMacroError {
    UnknownKeycode(String),
    InvalidDelay(String),
    InvalidDirection(String),
    UnterminatedText,
}

impl fmt::Display for ParseMacroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKeycode(s) => write!(f, "unknown keycode: \"{s}\""),
            Self::InvalidDelay(s) => write!(f, "invalid delay: \"{s}\""),
            Self::InvalidDirection(s) => {
                write!(f, "invalid direction: \"{s}\" (expected down or up)")
            }
            Self::UnterminatedText => write!(f, "unterminated text step"),
        }
    }
}

impl std::error::Error for ParseMacroError {}

impl From<ParseMacroError> for KeyboardError {
    fn from(e: ParseMacroError) -> Self {
        KeyboardError::InvalidParameter(e.to_string())
    }
}

impl MacroAction {
    /// Parse one step of the text syntax
    pub fn parse(s: &str, codec: &KeycodeCodec) -> Result<Self, ParseMacroError> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix('"') {
            let text = rest
                .strip_suffix('"')
                .ok_or(ParseMacroError::UnterminatedText)?;
            return Ok(MacroAction::Text(unescape(text)));
        }
        if let Some(num) = s.strip_suffix("ms") {
            if num.trim().bytes().all(|b| b.is_ascii_digit()) {
                return num
                    .trim()
                    .parse::<u16>()
                    .map(MacroAction::Delay)
                    .map_err(|_| ParseMacroError::InvalidDelay(s.to_string()));
            }
        }

        let (key, direction) = match s.rsplit_once(':') {
            Some((key, dir)) => (key.trim(), Some(dir.trim())),
            None => (s, None),
        };
        let kc = codec
            .parse(key)
            .ok_or_else(|| ParseMacroError::UnknownKeycode(key.to_string()))?;
        match direction.map(str::to_ascii_lowercase).as_deref() {
            None => Ok(MacroAction::Tap(kc)),
            Some("down") | Some("press") => Ok(MacroAction::Down(kc)),
            Some("up") | Some("release") => Ok(MacroAction::Up(kc)),
            Some(_) => Err(ParseMacroError::InvalidDirection(
                direction.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Display adapter resolving keycodes through `codec`
    pub fn display<'a>(&'a self, codec: &'a KeycodeCodec) -> MacroActionDisplay<'a> {
        MacroActionDisplay {
            action: self,
            codec,
        }
    }
}

/// See [`MacroAction::display`]
pub struct MacroActionDisplay<'a> {
    action: &'a MacroAction,
    codec: &'a KeycodeCodec,
}

impl fmt::Display for MacroActionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            MacroAction::Tap(kc) => write!(f, "{}", self.codec.stringify(*kc)),
            MacroAction::Down(kc) => write!(f, "{}:down", self.codec.stringify(*kc)),
            MacroAction::Up(kc) => write!(f, "{}:up", self.codec.stringify(*kc)),
            MacroAction::Delay(ms) => write!(f, "{ms}ms"),
            MacroAction::Text(text) => {
                write!(f, "\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
            }
        }
    }
}

/// Parse a comma-separated macro. The result is [`normalize`]d.
pub fn parse_macro(s: &str, codec: &KeycodeCodec) -> Result<Macro, ParseMacroError> {
    split_steps(s)?
        .into_iter()
        .filter(|step| !step.trim().is_empty())
        .map(|step| MacroAction::parse(step, codec))
        .collect::<Result<Macro, _>>()
        .map(normalize)
}

/// Format a macro in the text syntax accepted by [`parse_macro`]
pub fn format_macro(actions: &[MacroAction], codec: &KeycodeCodec) -> String {
    actions
        .iter()
        .map(|a| a.display(codec).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split on commas that are outside double quotes
fn split_steps(s: &str) -> Result<Vec<&str>, ParseMacroError> {
    let mut steps = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ',' if !quoted => {
                steps.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if quoted {
        return Err(ParseMacroError::UnterminatedText);
    }
    steps.push(&s[start..]);
    Ok(steps)
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const KC_A: u16 = 0x04;
    const KC_LSFT: u16 = 0xE1;

    #[test]
    fn test_encode_basic_actions() {
        let bytes = encode_macro(&[
            MacroAction::Text("hi".into()),
            MacroAction::Tap(KC_A),
            MacroAction::Down(KC_LSFT),
            MacroAction::Up(KC_LSFT),
        ])
        .unwrap();
        assert_eq!(
            bytes,
            vec![b'h', b'i', 1, 1, 0x04, 1, 2, 0xE1, 1, 3, 0xE1]
        );
    }

    #[test]
    fn test_delay_encoding() {
        assert_eq!(
            encode_macro(&[MacroAction::Delay(100)]).unwrap(),
            vec![1, 4, 101, 1]
        );
        assert_eq!(
            encode_macro(&[MacroAction::Delay(1000)]).unwrap(),
            vec![1, 4, (1000 % 255 + 1) as u8, (1000 / 255 + 1) as u8]
        );
        assert!(encode_macro(&[MacroAction::Delay(MAX_DELAY_MS + 1)]).is_err());
    }

    #[test]
    fn test_wide_keycode_encoding() {
        // LCTL(KC_A)
        assert_eq!(
            encode_macro(&[MacroAction::Tap(0x0104)]).unwrap(),
            vec![1, 5, 0x04, 0x01]
        );
        // MO(1)-style value with a zero low byte is remapped
        assert_eq!(
            encode_macro(&[MacroAction::Down(0x5200)]).unwrap(),
            vec![1, 6, 0x52, 0xFF]
        );
    }

    #[test]
    fn test_decode_round_trip() {
        let actions = vec![
            MacroAction::Text("Hello".into()),
            MacroAction::Delay(0),
            MacroAction::Delay(255),
            MacroAction::Delay(MAX_DELAY_MS),
            MacroAction::Tap(KC_A),
            MacroAction::Down(0x0200),
            MacroAction::Up(0x7E40),
            MacroAction::Text("!".into()),
        ];
        let bytes = encode_macro(&actions).unwrap();
        assert!(!bytes.contains(&0));
        assert_eq!(decode_macro(&bytes), actions);
    }

    #[test]
    fn test_delay_boundaries() {
        for (ms, wire) in [
            (254, [255, 1]),
            (255, [1, 2]),
            (256, [2, 2]),
            (MAX_DELAY_MS, [255, 255]),
        ] {
            let bytes = encode_macro(&[MacroAction::Delay(ms)]).unwrap();
            assert_eq!(bytes, vec![1, 4, wire[0], wire[1]], "{ms}ms");
            assert_eq!(decode_macro(&bytes), vec![MacroAction::Delay(ms)]);
        }
    }

    #[test]
    fn test_wide_keycode_zero_low_byte() {
        // 0x0100 would put a zero byte on the wire
        let bytes = encode_macro(&[MacroAction::Tap(0x0100), MacroAction::Up(0x5200)]).unwrap();
        assert_eq!(bytes, vec![1, 5, 0x01, 0xFF, 1, 7, 0x52, 0xFF]);
        assert_eq!(
            decode_macro(&bytes),
            vec![MacroAction::Tap(0x0100), MacroAction::Up(0x5200)]
        );

        // Would decode as 0x0100
        assert!(encode_macro(&[MacroAction::Tap(0xFF01)]).is_err());
    }

    #[test]
    fn test_adjacent_text_merges() {
        let actions = vec![
            MacroAction::Text("ab".into()),
            MacroAction::Text(String::new()),
            MacroAction::Text("cd".into()),
            MacroAction::Tap(KC_A),
            MacroAction::Text(String::new()),
        ];
        let bytes = encode_macro(&actions).unwrap();
        assert_eq!(bytes, vec![b'a', b'b', b'c', b'd', 1, 1, 0x04]);

        let expected = vec![MacroAction::Text("abcd".into()), MacroAction::Tap(KC_A)];
        assert_eq!(decode_macro(&bytes), expected);
        assert_eq!(normalize(actions), expected);

        let codec = KeycodeCodec::default();
        assert_eq!(
            parse_macro(r#""ab", "", "cd", KC_A"#, &codec).unwrap(),
            expected
        );
    }

    #[test]
    fn test_reject_unencodable() {
        assert!(encode_macro(&[MacroAction::Tap(0)]).is_err());
        assert!(encode_macro(&[MacroAction::Text("a\u{1}b".into())]).is_err());
    }

    #[test]
    fn test_decode_truncated_action() {
        assert_eq!(
            decode_macro(&[b'x', 1, 4, 5]),
            vec![MacroAction::Text("x".into())]
        );
    }

    #[test]
    fn test_split_ignores_trailing_garbage() {
        let buffer = [b'a', 0, 1, 1, 4, 0, 0xAA, 0xBB, 0xCC];
        let macros = split(&buffer, 2);
        assert_eq!(macros.len(), 2);
        assert_eq!(macros[0], b"a");
        assert_eq!(macros[1], &[1, 1, 4]);
    }

    #[test]
    fn test_split_pads_missing() {
        let macros = split(&[b'a', 0], 3);
        assert_eq!(macros, vec![&b"a"[..], &[][..], &[][..]]);
        // Unterminated tail is not a macro
        let macros = split(&[b'a', 0, b'b'], 2);
        assert_eq!(macros, vec![&b"a"[..], &[][..]]);
    }

    #[test]
    fn test_encode_buffer_capacity() {
        let macros = vec![
            vec![MacroAction::Text("abc".into())],
            vec![],
            vec![MacroAction::Tap(KC_A)],
        ];
        let buf = encode_buffer(&macros, 64).unwrap();
        assert_eq!(buf, vec![b'a', b'b', b'c', 0, 0, 1, 1, 4, 0]);
        assert_eq!(decode_buffer(&buf, 3), macros);

        let err = encode_buffer(&macros, 8).unwrap_err();
        assert!(matches!(err, KeyboardError::InvalidParameter(_)));
    }

    #[test]
    fn test_text_syntax_round_trip() {
        let codec = KeycodeCodec::default();
        let actions = parse_macro(
            r#"KC_LSFT:down, KC_A, KC_LSFT:up, 50ms, "a, \"b\"", LCTL(KC_C)"#,
            &codec,
        )
        .unwrap();
        assert_eq!(
            actions,
            vec![
                MacroAction::Down(KC_LSFT),
                MacroAction::Tap(KC_A),
                MacroAction::Up(KC_LSFT),
                MacroAction::Delay(50),
                MacroAction::Text("a, \"b\"".into()),
                MacroAction::Tap(0x0106),
            ]
        );

        let text = format_macro(&actions, &codec);
        assert_eq!(parse_macro(&text, &codec).unwrap(), actions);
    }

    #[test]
    fn test_text_syntax_errors() {
        let codec = KeycodeCodec::default();
        assert_eq!(
            parse_macro("KC_NOPE", &codec),
            Err(ParseMacroError::UnknownKeycode("KC_NOPE".into()))
        );
        assert_eq!(
            parse_macro("KC_A:sideways", &codec),
            Err(ParseMacroError::InvalidDirection("sideways".into()))
        );
        assert_eq!(
            parse_macro("99999ms", &codec),
            Err(ParseMacroError::InvalidDelay("99999ms".into()))
        );
        assert_eq!(
            parse_macro("\"open", &codec),
            Err(ParseMacroError::UnterminatedText)
        );
    }
}
