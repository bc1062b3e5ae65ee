//! QMK settings and security lock handlers.

use std::time::Duration;

use super::{open_keyboard, CommandResult};
use crate::config::Config;
use vial_keyboard::settings::{find_setting, qmk_setting};
use vial_keyboard::MIN_DYNAMIC_PROTOCOL;

/// Show every supported setting with its current value
pub async fn show(config: &Config) -> CommandResult {
    let keyboard = open_keyboard(config).await?;
    let (vial_protocol, _) = keyboard.get_vial_identity().await?;
    if vial_protocol < MIN_DYNAMIC_PROTOCOL {
        println!("Vial protocol {vial_protocol} has no QMK settings");
        return Ok(());
    }

    let supported = keyboard.get_supported_settings().await?;
    let values = keyboard.get_settings(&supported).await?;

    println!("QMK settings ({} supported):\n", supported.len());
    for id in supported {
        match (qmk_setting(id), values.get(&id)) {
            (Some(setting), Some(value)) => {
                println!("  {id:>3}  {:<28} {value}", setting.name);
            }
            _ => println!("  {id:>3}  (unknown setting)"),
        }
    }
    Ok(())
}

/// Change one setting by id or name
pub async fn set(config: &Config, id: &str, value: u32) -> CommandResult {
    let setting = find_setting(id)?;
    let keyboard = open_keyboard(config).await?;

    let supported = keyboard.get_supported_settings().await?;
    if !supported.contains(&setting.id) {
        return Err(format!("keyboard does not support {}", setting.name).into());
    }

    keyboard.set_setting(setting.id, value).await?;
    println!("{} ({}) = {value}", setting.name, setting.id);
    Ok(())
}

/// Run the unlock sequence, showing which keys to hold
pub async fn unlock(config: &Config, timeout_secs: u64) -> CommandResult {
    let keyboard = open_keyboard(config).await?;
    let status = keyboard.get_unlock_status().await?;
    if status.unlocked {
        println!("Keyboard is already unlocked");
        return Ok(());
    }

    let keys: Vec<String> = status
        .keys
        .iter()
        .map(|(row, col)| format!("({row}, {col})"))
        .collect();
    println!("Hold these keys until unlocked: {}", keys.join(" "));

    keyboard.unlock(Duration::from_secs(timeout_secs)).await?;
    println!("Unlocked");
    Ok(())
}

pub async fn lock(config: &Config) -> CommandResult {
    let keyboard = open_keyboard(config).await?;
    keyboard.lock().await?;
    println!("Locked");
    Ok(())
}
