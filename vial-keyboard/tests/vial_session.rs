//! End-to-end tests against a scripted Vial keyboard.
//!
//! `FakeKeyboard` answers every VIA/Vial command the way QMK/Vial firmware
//! does: VIA replies echo the request header, Vial replies carry the payload
//! from byte 0.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use vial_keyboard::macros::MacroAction;
use vial_keyboard::{
    Combo, KeyOverride, KeyboardError, KeyboardInterface, KeycodeCodec, Profile, TapDance,
};
use vial_transport::mock::MockDevice;
use vial_transport::{FlowControlTransport, TransportConfig, REPORT_SIZE};
use xz2::write::XzEncoder;

const ROWS: u8 = 4;
const COLS: u8 = 12;
const LAYERS: u8 = 4;
const MACRO_SIZE: usize = 256;
const KEYBOARD_ID: u64 = 0x1122_3344_5566_7788;
const FIRMWARE: u32 = 0x0102_0003;

/// Keycodes cycled through the fake keymap
const KEYS: &[u16] = &[
    0x0004, // KC_A
    0x0029, // KC_ESC
    0x0001, // KC_TRNS
    0x0000, // KC_NO
    0x0104, // LCTL(KC_A)
    0x0B04, // LCTL(LSFT(LGUI(KC_A)))
    0x2229, // LSFT_T(KC_ESC)
    0x4104, // LT1(KC_A)
    0x5221, // MO(1)
    0x5262, // TG(2)
    0x7700, // M0
    0x5701, // TD(1)
    0x7E40, // USER00
    0x7C00, // QK_BOOT
    0x5FFF, // unnamed
];

fn definition_json() -> String {
    let mut rows = Vec::new();
    for r in 0..ROWS {
        let keys: Vec<String> = (0..COLS).map(|c| format!("\"{r},{c}\"")).collect();
        rows.push(format!("[{}]", keys.join(",")));
    }
    rows.push(r#"[{"x": 1}, "0,0\n\n\n\n\n\n\n\n\ne", "0,1\n\n\n\n\n\n\n\n\ne"]"#.to_string());
    format!(
        r#"{{
            "name": "Fake 4x12",
            "vendorId": "0xFEED",
            "productId": "0x0000",
            "matrix": {{"rows": {ROWS}, "cols": {COLS}}},
            "layouts": {{"labels": ["Split Space"], "keymap": [{{"name": "meta"}}, {}]}},
            "customKeycodes": [{{"name": "CK_BLINK", "shortName": "Blink", "title": "Blink LEDs"}}]
        }}"#,
        rows.join(",")
    )
}

fn compress(data: &[u8]) -> Vec<u8> {
    let mut enc = XzEncoder::new(Vec::new(), 6);
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

struct FakeState {
    keymap: Vec<u16>,
    encoders: Vec<[u16; 2]>,
    layout_options: u32,
    macros: Vec<u8>,
    blob: Vec<u8>,
    settings: BTreeMap<u16, u32>,
    tap_dances: Vec<[u8; 10]>,
    combos: Vec<[u8; 10]>,
    key_overrides: Vec<[u8; 10]>,
    unlocked: bool,
    unlock_polls: u8,
}

/// In-memory Vial keyboard
#[derive(Clone)]
struct FakeKeyboard {
    state: Arc<Mutex<FakeState>>,
}

impl FakeKeyboard {
    fn new() -> Self {
        let keymap = (0..ROWS as usize * COLS as usize * LAYERS as usize)
            .map(|i| KEYS[i % KEYS.len()])
            .collect();

        // Two macros followed by stale bytes
        let mut macros = vec![0x01, 0x02, 0xE1, 0x01, 0x01, 0x04, 0x01, 0x03, 0xE1, 0x00];
        macros.extend_from_slice(b"hi\0");
        macros.extend_from_slice(&[0x55; 8]);
        macros.resize(MACRO_SIZE, 0);

        let mut settings = BTreeMap::new();
        for id in 1..=22u16 {
            settings.insert(id, 0);
        }
        settings.insert(2, 50);
        settings.insert(7, 200);
        settings.insert(26, 1);
        // Listed by the firmware, unknown to the schema
        settings.insert(0x0100, 7);

        let mut td = [0u8; 10];
        td[0..2].copy_from_slice(&0x0004u16.to_le_bytes());
        td[2..4].copy_from_slice(&0x00E0u16.to_le_bytes());
        td[8..10].copy_from_slice(&200u16.to_le_bytes());

        Self {
            state: Arc::new(Mutex::new(FakeState {
                keymap,
                encoders: vec![[0x0081, 0x0080]; LAYERS as usize * 2],
                layout_options: 1,
                macros,
                blob: compress(definition_json().as_bytes()),
                settings,
                tap_dances: vec![td, [0; 10]],
                combos: vec![[0; 10]; 2],
                key_overrides: vec![[0; 10]],
                unlocked: false,
                unlock_polls: 0,
            })),
        }
    }

    fn respond(&self, req: &[u8]) -> Vec<Vec<u8>> {
        let mut s = self.state.lock();
        let mut out = req.to_vec();
        match req[0] {
            0x01 => out[1..3].copy_from_slice(&9u16.to_be_bytes()),
            0x02 => match req[1] {
                0x02 => out[2..6].copy_from_slice(&s.layout_options.to_be_bytes()),
                0x04 => out[2..6].copy_from_slice(&FIRMWARE.to_be_bytes()),
                _ => out[0] = 0xFF,
            },
            0x03 if req[1] == 0x02 => {
                s.layout_options = u32::from_be_bytes([req[2], req[3], req[4], req[5]]);
            }
            0x04 => {
                let kc = s.keymap[key_index(req[1], req[2], req[3])];
                out[4..6].copy_from_slice(&kc.to_be_bytes());
            }
            0x05 => {
                let idx = key_index(req[1], req[2], req[3]);
                s.keymap[idx] = u16::from_be_bytes([req[4], req[5]]);
            }
            0x06 => s.keymap.fill(0x0004),
            0x0C => out[1] = 2,
            0x0D => out[1..3].copy_from_slice(&(MACRO_SIZE as u16).to_be_bytes()),
            0x0E => {
                let (off, len) = buffer_window(req);
                out[4..4 + len].copy_from_slice(&s.macros[off..off + len]);
            }
            0x0F => {
                let (off, len) = buffer_window(req);
                s.macros[off..off + len].copy_from_slice(&req[4..4 + len]);
            }
            0x10 => s.macros.fill(0),
            0x11 => out[1] = LAYERS,
            0x12 => {
                let (off, len) = buffer_window(req);
                let bytes: Vec<u8> = s.keymap.iter().flat_map(|kc| kc.to_be_bytes()).collect();
                out[4..4 + len].copy_from_slice(&bytes[off..off + len]);
            }
            0x13 => {
                let (off, len) = buffer_window(req);
                for (i, pair) in req[4..4 + len].chunks_exact(2).enumerate() {
                    s.keymap[off / 2 + i] = u16::from_be_bytes([pair[0], pair[1]]);
                }
            }
            0xFE => return vec![vial_reply(&mut s, req)],
            _ => out[0] = 0xFF,
        }
        vec![out]
    }
}

fn key_index(layer: u8, row: u8, col: u8) -> usize {
    (layer as usize * ROWS as usize + row as usize) * COLS as usize + col as usize
}

fn buffer_window(req: &[u8]) -> (usize, usize) {
    (u16::from_be_bytes([req[1], req[2]]) as usize, req[3] as usize)
}

fn le16(b: &[u8]) -> u16 {
    u16::from_le_bytes([b[0], b[1]])
}

fn vial_reply(s: &mut FakeState, req: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; REPORT_SIZE];
    match req[1] {
        0x00 => {
            out[0..4].copy_from_slice(&6u32.to_le_bytes());
            out[4..12].copy_from_slice(&KEYBOARD_ID.to_le_bytes());
        }
        0x01 => out[0..4].copy_from_slice(&(s.blob.len() as u32).to_le_bytes()),
        0x02 => {
            let page = u32::from_le_bytes([req[2], req[3], req[4], req[5]]) as usize;
            let start = (page * REPORT_SIZE).min(s.blob.len());
            let end = (start + REPORT_SIZE).min(s.blob.len());
            out[..end - start].copy_from_slice(&s.blob[start..end]);
        }
        0x03 => {
            let [ccw, cw] = s.encoders[req[2] as usize * 2 + req[3] as usize];
            out[0..2].copy_from_slice(&ccw.to_be_bytes());
            out[2..4].copy_from_slice(&cw.to_be_bytes());
        }
        0x04 => {
            let slot = &mut s.encoders[req[2] as usize * 2 + req[3] as usize];
            slot[req[4] as usize] = u16::from_be_bytes([req[5], req[6]]);
        }
        0x05 => {
            out.fill(0xFF);
            out[0] = s.unlocked as u8;
            out[1] = (s.unlock_polls > 0) as u8;
            out[2..6].copy_from_slice(&[3, 0, 3, 11]);
        }
        0x06 => s.unlock_polls = 1,
        0x07 => {
            s.unlock_polls += 1;
            s.unlocked = s.unlock_polls > 3;
            out[0] = s.unlocked as u8;
            out[1] = !s.unlocked as u8;
        }
        0x08 => s.unlocked = false,
        0x09 => {
            out.fill(0xFF);
            let cursor = le16(&req[2..4]);
            let ids = s.settings.keys().filter(|&&id| id > cursor).take(16);
            for (i, &id) in ids.enumerate() {
                out[i * 2..i * 2 + 2].copy_from_slice(&id.to_le_bytes());
            }
        }
        0x0A => match s.settings.get(&le16(&req[2..4])) {
            Some(v) => out[1..5].copy_from_slice(&v.to_le_bytes()),
            None => out[0] = 1,
        },
        0x0B => {
            let v = u32::from_le_bytes([req[4], req[5], req[6], req[7]]);
            s.settings.insert(le16(&req[2..4]), v);
        }
        0x0C => s.settings.values_mut().for_each(|v| *v = 0),
        0x0D => {
            let idx = req[3] as usize;
            match req[2] {
                0x00 => {
                    out[0] = s.tap_dances.len() as u8;
                    out[1] = s.combos.len() as u8;
                    out[2] = s.key_overrides.len() as u8;
                }
                0x01 => out[1..11].copy_from_slice(&s.tap_dances[idx]),
                0x02 => s.tap_dances[idx].copy_from_slice(&req[4..14]),
                0x03 => out[1..11].copy_from_slice(&s.combos[idx]),
                0x04 => s.combos[idx].copy_from_slice(&req[4..14]),
                0x05 => out[1..11].copy_from_slice(&s.key_overrides[idx]),
                0x06 => s.key_overrides[idx].copy_from_slice(&req[4..14]),
                _ => out[0] = 0xFF,
            }
        }
        _ => out.fill(0xFF),
    }
    out
}

fn connect() -> (Arc<MockDevice>, FakeKeyboard, KeyboardInterface) {
    let fake = FakeKeyboard::new();
    let responder = fake.clone();
    let dev = Arc::new(MockDevice::new(move |req| responder.respond(req)));
    let flow = FlowControlTransport::with_config(
        dev.clone(),
        TransportConfig {
            timeout: Duration::from_millis(200),
            ..TransportConfig::default()
        },
    )
    .unwrap();
    (dev, fake, KeyboardInterface::new(Arc::new(flow)))
}

// ── identity ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_identity() {
    let (_dev, _fake, kb) = connect();
    let id = kb.get_identity().await.unwrap();
    assert_eq!(id.via_protocol, 9);
    assert_eq!(id.vial_protocol, 6);
    assert_eq!(id.keyboard_id, KEYBOARD_ID);
    assert_eq!(id.firmware.to_string(), "1.2.3");
    assert_eq!(id.vendor_protocol, None);
}

#[tokio::test]
async fn test_vendor_probe_unanswered() {
    let (_dev, _fake, kb) = connect();
    let kb = kb.with_vendor_probe(Some(0xFD));
    assert_eq!(kb.probe_vendor_protocol().await.unwrap(), None);
}

// ── full load ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_model() {
    let (_dev, _fake, mut kb) = connect();
    let model = kb.load().await.unwrap();

    assert_eq!((model.rows, model.cols, model.layers), (4, 12, 4));
    assert_eq!(model.keymap.len(), 4);
    assert!(model.keymap.iter().all(|layer| layer.len() == 48));
    for (i, &kc) in model.flat_keymap().iter().enumerate() {
        assert_eq!(kc, KEYS[i % KEYS.len()]);
        let name = kb.codec().stringify(kc);
        assert_eq!(kb.codec().parse(&name), Some(kc), "{name}");
    }
    assert_eq!(kb.codec().stringify(0x7E40), "USER00");
    assert_eq!(kb.codec().parse("CK_BLINK"), Some(0x7E40));

    assert_eq!(model.layout.keys.len(), 48);
    assert_eq!(model.encoders, vec![vec![(0x0081, 0x0080)]; 4]);
    assert_eq!(model.layout_options, 1);

    assert_eq!(model.macro_buffer_size, MACRO_SIZE);
    assert_eq!(model.macros.len(), 2);
    assert_eq!(
        model.macros[0],
        vec![
            MacroAction::Down(0x00E1),
            MacroAction::Tap(0x0004),
            MacroAction::Up(0x00E1)
        ]
    );
    assert_eq!(model.macros[1], vec![MacroAction::Text("hi".into())]);

    assert_eq!(model.dynamic_counts.tap_dance, 2);
    assert_eq!(model.tap_dances[0].on_hold, 0x00E0);
    assert_eq!(model.tap_dances[0].tapping_term, 200);
    assert_eq!(model.combos.len(), 2);
    assert_eq!(model.key_overrides.len(), 1);

    // 24 schema ids listed, the unknown one skipped
    assert_eq!(model.settings.len(), 23);
    assert_eq!(model.settings.get(&7), Some(&200));
    assert!(!model.settings.contains_key(&0x0100));
}

#[tokio::test]
async fn test_macro_read_stops_after_terminators() {
    let (dev, _fake, kb) = connect();
    kb.get_macros(2, MACRO_SIZE).await.unwrap();
    let reads = dev.writes().iter().filter(|w| w[0] == 0x0E).count();
    assert_eq!(reads, 1, "both terminators are in the first window");
}

// ── single-item pushes ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_keycode_emits_one_report() {
    let (dev, fake, kb) = connect();
    let kc = KeycodeCodec::default().parse("KC_A").unwrap();
    kb.set_keycode(1, 2, 3, kc).await.unwrap();

    let writes = dev.writes();
    assert_eq!(writes.len(), 1);
    let mut expected = vec![0u8; REPORT_SIZE];
    expected[..6].copy_from_slice(&[0x05, 1, 2, 3, 0x00, 0x04]);
    assert_eq!(writes[0], expected);

    assert_eq!(fake.state.lock().keymap[key_index(1, 2, 3)], 0x0004);
    assert_eq!(kb.get_keycode(1, 2, 3).await.unwrap(), 0x0004);
}

#[tokio::test]
async fn test_set_macros_and_read_back() {
    let (_dev, _fake, kb) = connect();
    let macros = vec![
        vec![MacroAction::Text("hello".into()), MacroAction::Delay(300)],
        vec![MacroAction::Tap(0x0104)],
    ];
    kb.set_macros(&macros, MACRO_SIZE).await.unwrap();
    assert_eq!(kb.get_macros(2, MACRO_SIZE).await.unwrap(), macros);

    let too_big = vec![vec![MacroAction::Text("x".repeat(MACRO_SIZE))]];
    let err = kb.set_macros(&too_big, MACRO_SIZE).await.unwrap_err();
    assert!(matches!(err, KeyboardError::InvalidParameter(_)));
}

#[tokio::test]
async fn test_dynamic_entry_push() {
    let (_dev, _fake, kb) = connect();
    let combo = Combo {
        keys: [0x0004, 0x0005, 0, 0],
        output: 0x0029,
    };
    kb.set_combo(1, &combo).await.unwrap();
    let ko = KeyOverride {
        trigger: 0x002A,
        replacement: 0x004C,
        layers: 0xFFFF,
        trigger_mods: 0x02,
        options: 0x80,
        ..Default::default()
    };
    kb.set_key_override(0, &ko).await.unwrap();
    let td = TapDance {
        on_tap: 0x0029,
        tapping_term: 150,
        ..Default::default()
    };
    kb.set_tap_dance(1, &td).await.unwrap();

    assert_eq!(kb.get_combos(2).await.unwrap()[1], combo);
    assert_eq!(kb.get_key_overrides(1).await.unwrap()[0], ko);
    assert_eq!(kb.get_tap_dances(2).await.unwrap()[1], td);
}

#[tokio::test]
async fn test_settings_paging_and_set() {
    let (dev, _fake, kb) = connect();
    let ids = kb.get_supported_settings().await.unwrap();
    assert_eq!(ids.len(), 24);
    assert_eq!(ids[..3], [1, 2, 3]);
    // The id right after a full page is not lost
    assert_eq!(ids[15..17], [16, 17]);
    assert_eq!(*ids.last().unwrap(), 0x0100);

    let queries: Vec<u16> = dev
        .writes()
        .iter()
        .filter(|w| w[0] == 0xFE && w[1] == 0x09)
        .map(|w| le16(&w[2..4]))
        .collect();
    assert_eq!(queries, vec![0, 16]);

    kb.set_setting(7, 250).await.unwrap();
    assert_eq!(kb.get_settings(&[7]).await.unwrap().get(&7), Some(&250));

    let err = kb.set_setting(26, 0x1FF).await.unwrap_err();
    assert!(matches!(err, KeyboardError::InvalidParameter(_)));
    // Listed by the keyboard but absent from the schema
    let err = kb.set_setting(0x0100, 1).await.unwrap_err();
    assert!(matches!(err, KeyboardError::NotFound(_)));
}

#[tokio::test]
async fn test_encoder_and_layout_options() {
    let (_dev, _fake, kb) = connect();
    kb.set_encoder(2, 1, true, 0x0052).await.unwrap();
    assert_eq!(kb.get_encoder(2, 1).await.unwrap(), (0x0081, 0x0052));

    kb.set_layout_options(0x0000_0003).await.unwrap();
    assert_eq!(kb.get_layout_options().await.unwrap(), 3);
}

#[tokio::test]
async fn test_unlock_polls_until_unlocked() {
    let (dev, _fake, kb) = connect();
    let status = kb.get_unlock_status().await.unwrap();
    assert!(!status.unlocked);
    assert_eq!(status.keys, vec![(3, 0), (3, 11)]);

    kb.unlock(Duration::from_secs(2)).await.unwrap();
    assert!(kb.get_unlock_status().await.unwrap().unlocked);
    let polls = dev
        .writes()
        .iter()
        .filter(|w| w[0] == 0xFE && w[1] == 0x07)
        .count();
    assert_eq!(polls, 3);

    kb.lock().await.unwrap();
    assert!(!kb.get_unlock_status().await.unwrap().unlocked);
}

#[tokio::test]
async fn test_resets() {
    let (_dev, fake, kb) = connect();
    kb.reset_keymap().await.unwrap();
    kb.reset_macros().await.unwrap();
    kb.reset_settings().await.unwrap();

    let s = fake.state.lock();
    assert!(s.keymap.iter().all(|&kc| kc == 0x0004));
    assert!(s.macros.iter().all(|&b| b == 0));
    assert!(s.settings.values().all(|&v| v == 0));
}

// ── profile ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_profile_import_pushes_model() {
    let (_dev, fake, mut kb) = connect();
    let model = kb.load().await.unwrap();

    let mut profile = Profile::export(&model, kb.codec());
    profile.layout[0][0][0] = vial_keyboard::profile::VilKey::Name("KC_Z".into());
    profile.combo[0] = [
        "KC_J".into(),
        "KC_K".into(),
        "KC_NO".into(),
        "KC_NO".into(),
        "KC_ESC".into(),
    ];
    profile.settings.insert("7".into(), 180);
    let json = profile.to_json().unwrap();

    let mut edited = model.clone();
    Profile::from_json(&json)
        .unwrap()
        .apply(&mut edited, kb.codec())
        .unwrap();
    kb.push_model(&edited).await.unwrap();

    {
        let s = fake.state.lock();
        assert_eq!(s.keymap[0], 0x001D);
        assert_eq!(s.settings.get(&7), Some(&180));
    }
    let reloaded = kb.load().await.unwrap();
    assert_eq!(reloaded, edited);
}
