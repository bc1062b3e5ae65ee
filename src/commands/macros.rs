//! Macro command handlers.

use super::{open_keyboard, CommandResult};
use crate::config::Config;
use vial_keyboard::macros::{encode_buffer, format_macro, parse_macro};
use vial_keyboard::KeyboardInterface;

/// Load definition (for custom keycode names) and every macro
async fn read_macros(
    config: &Config,
) -> Result<(KeyboardInterface, Vec<vial_keyboard::Macro>, usize), Box<dyn std::error::Error>> {
    let mut keyboard = open_keyboard(config).await?;
    keyboard.load_definition().await?;
    let count = keyboard.get_macro_count().await? as usize;
    let size = keyboard.get_macro_buffer_size().await? as usize;
    let macros = keyboard.get_macros(count, size).await?;
    Ok((keyboard, macros, size))
}

/// Show all macros
pub async fn show(config: &Config) -> CommandResult {
    let (keyboard, macros, size) = read_macros(config).await?;
    let used = encode_buffer(&macros, size).map(|b| b.len()).unwrap_or(size);

    println!("{} macros, {used}/{size} bytes used\n", macros.len());
    for (i, m) in macros.iter().enumerate() {
        if m.is_empty() {
            println!("  M{i}: (empty)");
        } else {
            println!("  M{i}: {}", format_macro(m, keyboard.codec()));
        }
    }
    Ok(())
}

/// Replace one macro, keeping the others
pub async fn set(config: &Config, index: u8, steps: &[String]) -> CommandResult {
    let (keyboard, mut macros, size) = read_macros(config).await?;
    let count = macros.len();
    let slot = macros
        .get_mut(index as usize)
        .ok_or_else(|| format!("macro {index} out of range (keyboard has {count})"))?;

    let actions = parse_macro(&steps.join(","), keyboard.codec())?;
    println!("M{index}: {}", format_macro(&actions, keyboard.codec()));
    *slot = actions;

    keyboard.set_macros(&macros, size).await?;
    println!("Macro {index} written");
    Ok(())
}
