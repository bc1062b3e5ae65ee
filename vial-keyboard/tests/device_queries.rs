//! Integration tests against a real keyboard.
//!
//! These tests require a Vial keyboard to be connected.
//! Run with: cargo test -p vial-keyboard --test device_queries -- --ignored --nocapture

use std::sync::Arc;
use std::time::{Duration, Instant};

use vial_keyboard::{KeyboardInterface, Profile};
use vial_transport::{FlowControlTransport, HidDiscovery, Transport};

/// HidDiscovery → open_preferred → FlowControlTransport → KeyboardInterface
async fn open_keyboard() -> (Arc<dyn Transport>, KeyboardInterface) {
    let transport = HidDiscovery::new()
        .vial_only(true)
        .open_preferred()
        .await
        .expect("No Vial keyboard found, plug in a supported device");

    let flow = Arc::new(FlowControlTransport::new(Arc::clone(&transport)).unwrap());
    (transport, KeyboardInterface::new(flow))
}

#[tokio::test(flavor = "multi_thread")]
#[ignore] // requires hardware
async fn identity_queries_resolve() {
    let (_raw, kb) = open_keyboard().await;

    let identity = tokio::time::timeout(Duration::from_secs(5), kb.get_identity())
        .await
        .expect("identity queries did not resolve within 5s")
        .unwrap();

    println!("{}: {identity:?}", kb.device_name());
    assert!(identity.via_protocol >= 9, "VIA protocol 9+ expected");
    assert!(identity.is_vial());
}

/// Full connect-time fetch; prints a summary of what was read.
#[tokio::test(flavor = "multi_thread")]
#[ignore] // requires hardware
async fn full_load_round_trips_through_profile() {
    let (_raw, mut kb) = open_keyboard().await;

    let start = Instant::now();
    let model = kb.load().await.unwrap();
    println!(
        "Loaded {}x{}x{} in {:?}",
        model.layers,
        model.rows,
        model.cols,
        start.elapsed()
    );

    assert_eq!(model.keymap.len(), model.layers as usize);
    for layer in &model.keymap {
        assert_eq!(layer.len(), model.rows as usize * model.cols as usize);
        for &kc in layer {
            let name = kb.codec().stringify(kc);
            assert_eq!(kb.codec().parse(&name), Some(kc), "{name}");
        }
    }

    // Export then import onto the same model must change nothing
    let json = Profile::export(&model, kb.codec()).to_json().unwrap();
    let mut copy = model.clone();
    Profile::from_json(&json)
        .unwrap()
        .apply(&mut copy, kb.codec())
        .unwrap();
    assert_eq!(copy, model);
}

/// Writes a key and restores it.
#[tokio::test(flavor = "multi_thread")]
#[ignore] // requires hardware, modifies the keymap temporarily
async fn set_keycode_restores() {
    let (_raw, kb) = open_keyboard().await;

    let original = kb.get_keycode(0, 0, 0).await.unwrap();
    let probe = if original == 0x0004 { 0x0005 } else { 0x0004 };

    kb.set_keycode(0, 0, 0, probe).await.unwrap();
    assert_eq!(kb.get_keycode(0, 0, 0).await.unwrap(), probe);

    kb.set_keycode(0, 0, 0, original).await.unwrap();
    assert_eq!(kb.get_keycode(0, 0, 0).await.unwrap(), original);
}
