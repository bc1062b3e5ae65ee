//! .vil profile export and import.

use std::path::Path;

use super::{open_loaded, CommandResult};
use crate::config::Config;
use tracing::info;
use vial_keyboard::{KeyboardModel, Profile};

/// Save everything the keyboard stores to `file`
pub async fn export(config: &Config, file: &Path) -> CommandResult {
    let (keyboard, model) = open_loaded(config).await?;
    Profile::export(&model, keyboard.codec()).save(file)?;

    println!(
        "Saved {} layers, {} macros, {} settings to {}",
        model.layers,
        model.macros.len(),
        model.settings.len(),
        file.display()
    );
    Ok(())
}

/// Apply `file` to the keyboard
pub async fn import(config: &Config, file: &Path, dry_run: bool) -> CommandResult {
    let profile = Profile::load(file)?;
    let (keyboard, current) = open_loaded(config).await?;

    let mut target = current.clone();
    profile.apply(&mut target, keyboard.codec())?;

    let changes = summarize_changes(&current, &target);
    if changes.is_empty() {
        println!("Keyboard already matches {}", file.display());
        return Ok(());
    }
    for line in &changes {
        println!("  {line}");
    }
    if dry_run {
        println!("Dry run, nothing written");
        return Ok(());
    }

    keyboard.push_model(&target).await?;
    info!("Imported {}", file.display());
    println!("Wrote {} to {}", file.display(), keyboard.device_name());
    Ok(())
}

/// One line per part of the model that differs
fn summarize_changes(before: &KeyboardModel, after: &KeyboardModel) -> Vec<String> {
    let mut lines = Vec::new();

    let keys = before
        .flat_keymap()
        .iter()
        .zip(after.flat_keymap().iter())
        .filter(|(a, b)| a != b)
        .count();
    if keys > 0 {
        lines.push(format!("{keys} key(s) changed"));
    }
    if before.encoders != after.encoders {
        lines.push("encoders changed".to_string());
    }
    if before.layout_options != after.layout_options {
        lines.push(format!(
            "layout options {:#x} -> {:#x}",
            before.layout_options, after.layout_options
        ));
    }

    let count_diff = |name: &str, n: usize| (n > 0).then(|| format!("{n} {name} changed"));
    let macros = before
        .macros
        .iter()
        .zip(&after.macros)
        .filter(|(a, b)| a != b)
        .count();
    let tap_dances = before
        .tap_dances
        .iter()
        .zip(&after.tap_dances)
        .filter(|(a, b)| a != b)
        .count();
    let combos = before
        .combos
        .iter()
        .zip(&after.combos)
        .filter(|(a, b)| a != b)
        .count();
    let overrides = before
        .key_overrides
        .iter()
        .zip(&after.key_overrides)
        .filter(|(a, b)| a != b)
        .count();
    let settings = after
        .settings
        .iter()
        .filter(|&(id, value)| before.settings.get(id) != Some(value))
        .count();

    lines.extend(
        [
            count_diff("macro(s)", macros),
            count_diff("tap dance(s)", tap_dances),
            count_diff("combo(s)", combos),
            count_diff("key override(s)", overrides),
            count_diff("setting(s)", settings),
        ]
        .into_iter()
        .flatten(),
    );
    lines
}
