//! Keymap command handlers.

use super::{open_keyboard, parse_keycode, CommandResult};
use crate::config::Config;
use vial_keyboard::{KeyboardModel, KeycodeCodec};

/// Show the keymap, one matrix grid per layer
pub async fn show(config: &Config, only_layer: Option<u8>) -> CommandResult {
    let mut keyboard = open_keyboard(config).await?;
    let definition = keyboard.load_definition().await?;
    let (rows, cols) = (definition.matrix.rows, definition.matrix.cols);
    let layers = keyboard.get_layer_count().await?;

    if let Some(layer) = only_layer {
        if layer >= layers {
            return Err(format!("layer {layer} out of range (keyboard has {layers})").into());
        }
    }

    let flat = keyboard.get_keymap(rows, cols, layers).await?;
    let keymap = KeyboardModel::keymap_from_flat(&flat, rows, cols);

    println!(
        "{}: {layers} layers, {rows}x{cols} matrix",
        definition.name.as_deref().unwrap_or(&keyboard.device_name())
    );
    for (layer, keys) in keymap.iter().enumerate() {
        if only_layer.is_some_and(|l| l as usize != layer) {
            continue;
        }
        println!("\nLayer {layer}:");
        for line in format_grid(keyboard.codec(), keys, cols) {
            println!("  {line}");
        }
    }
    Ok(())
}

/// Assign one keycode
pub async fn set_key(config: &Config, layer: u8, row: u8, col: u8, keycode: &str) -> CommandResult {
    let mut keyboard = open_keyboard(config).await?;
    // Custom keycode names only resolve once the definition is loaded
    let definition = keyboard.load_definition().await?;
    if row >= definition.matrix.rows || col >= definition.matrix.cols {
        return Err(format!(
            "position ({row}, {col}) outside the {}x{} matrix",
            definition.matrix.rows, definition.matrix.cols
        )
        .into());
    }

    let code = parse_keycode(keyboard.codec(), keycode)?;
    let old = keyboard.get_keycode(layer, row, col).await?;
    keyboard.set_keycode(layer, row, col, code).await?;

    let codec = keyboard.codec();
    println!(
        "Layer {layer} ({row}, {col}): {} -> {}",
        codec.stringify(old),
        codec.stringify(code)
    );
    Ok(())
}

/// Render one layer as aligned rows of key labels
fn format_grid(codec: &KeycodeCodec, keys: &[u16], cols: u8) -> Vec<String> {
    if cols == 0 {
        return Vec::new();
    }
    let labels: Vec<String> = keys.iter().map(|&kc| codec.label(kc)).collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0);
    labels
        .chunks(cols as usize)
        .map(|row| {
            row.iter()
                .map(|l| format!("{l:<width$}"))
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        })
        .collect()
}
