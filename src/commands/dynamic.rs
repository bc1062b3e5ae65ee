//! Tap dance, combo and key override display.

use super::{open_keyboard, CommandResult};
use crate::config::Config;
use vial_keyboard::{Combo, KeyOverride, KeycodeCodec, TapDance, MIN_DYNAMIC_PROTOCOL};

pub async fn show(config: &Config) -> CommandResult {
    let mut keyboard = open_keyboard(config).await?;
    let (vial_protocol, _) = keyboard.get_vial_identity().await?;
    if vial_protocol < MIN_DYNAMIC_PROTOCOL {
        println!("Vial protocol {vial_protocol} has no dynamic entries");
        return Ok(());
    }
    keyboard.load_definition().await?;

    let counts = keyboard.get_dynamic_counts().await?;
    let tap_dances = keyboard.get_tap_dances(counts.tap_dance).await?;
    let combos = keyboard.get_combos(counts.combo).await?;
    let overrides = keyboard.get_key_overrides(counts.key_override).await?;
    let codec = keyboard.codec();

    println!("Tap dance ({}):", tap_dances.len());
    for (i, td) in tap_dances.iter().enumerate() {
        if *td != TapDance::default() {
            println!("  TD({i}): {}", format_tap_dance(codec, td));
        }
    }
    println!("\nCombos ({}):", combos.len());
    for (i, combo) in combos.iter().enumerate() {
        if *combo != Combo::default() {
            println!("  {i}: {}", format_combo(codec, combo));
        }
    }
    println!("\nKey overrides ({}):", overrides.len());
    for (i, ko) in overrides.iter().enumerate() {
        if *ko != KeyOverride::default() {
            println!("  {i}: {}", format_key_override(codec, ko));
        }
    }
    Ok(())
}

fn format_tap_dance(codec: &KeycodeCodec, td: &TapDance) -> String {
    format!(
        "tap={} hold={} double={} tap+hold={} term={}ms",
        codec.stringify(td.on_tap),
        codec.stringify(td.on_hold),
        codec.stringify(td.on_double_tap),
        codec.stringify(td.on_tap_hold),
        td.tapping_term
    )
}

fn format_combo(codec: &KeycodeCodec, combo: &Combo) -> String {
    let keys: Vec<String> = combo
        .keys
        .iter()
        .filter(|&&kc| kc != 0)
        .map(|&kc| codec.stringify(kc))
        .collect();
    format!("{} -> {}", keys.join(" + "), codec.stringify(combo.output))
}

fn format_key_override(codec: &KeycodeCodec, ko: &KeyOverride) -> String {
    format!(
        "{} -> {} layers={:#06x} mods={:#04x} neg={:#04x} suppressed={:#04x} options={:#04x}{}",
        codec.stringify(ko.trigger),
        codec.stringify(ko.replacement),
        ko.layers,
        ko.trigger_mods,
        ko.negative_mod_mask,
        ko.suppressed_mods,
        ko.options,
        if ko.enabled() { "" } else { " (disabled)" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entries() {
        let codec = KeycodeCodec::default();
        let td = TapDance {
            on_tap: 0x0004,
            on_hold: 0x00E0,
            tapping_term: 200,
            ..Default::default()
        };
        assert_eq!(
            format_tap_dance(&codec, &td),
            "tap=KC_A hold=KC_LCTRL double=KC_NO tap+hold=KC_NO term=200ms"
        );

        let combo = Combo {
            keys: [0x0004, 0x0005, 0, 0],
            output: 0x0029,
        };
        assert_eq!(format_combo(&codec, &combo), "KC_A + KC_B -> KC_ESCAPE");

        let ko = KeyOverride {
            trigger: 0x0004,
            replacement: 0x0005,
            options: 0,
            ..Default::default()
        };
        assert!(format_key_override(&codec, &ko).ends_with("(disabled)"));
    }
}
