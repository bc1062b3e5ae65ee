//! Query command handlers.

use super::{open_keyboard, CommandResult};
use crate::config::Config;
use vial_keyboard::KeycodeCodec;
use vial_transport::DeviceDiscovery;

/// List connected keyboards
pub async fn list(config: &Config) -> CommandResult {
    let devices = config.device.discovery().list_devices().await?;
    if devices.is_empty() {
        println!("No VIA/Vial keyboards found");
        return Ok(());
    }

    println!("Found {} device(s):\n", devices.len());
    for dev in &devices {
        let kind = if dev.info.is_vial() { "Vial" } else { "VIA" };
        println!("  {} [{kind}]", dev.info.display_name());
        println!("    Path:   {}", dev.info.device_path);
        if let Some(serial) = &dev.info.serial {
            println!("    Serial: {serial}");
        }
    }
    Ok(())
}

/// Show protocol identity and firmware version
pub async fn info(config: &Config, json: bool) -> CommandResult {
    let keyboard = open_keyboard(config).await?;
    let identity = keyboard.get_identity().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&identity)?);
        return Ok(());
    }

    println!("Device:         {}", keyboard.device_name());
    println!("VID/PID:        {:04x}:{:04x}", keyboard.vid(), keyboard.pid());
    println!("VIA protocol:   {}", identity.via_protocol);
    if identity.is_vial() {
        println!("Vial protocol:  {}", identity.vial_protocol);
        println!("Keyboard ID:    {:016x}", identity.keyboard_id);
    } else {
        println!("Vial protocol:  not supported");
    }
    println!("Firmware:       {}", identity.firmware);
    if let Some(vendor) = identity.vendor_protocol {
        println!("Vendor proto:   {vendor}");
    }
    Ok(())
}

/// Translate between keycode names and numbers (no device needed)
pub fn keycode(value: &str) -> CommandResult {
    println!("{}", translate_keycode(&KeycodeCodec::default(), value)?);
    Ok(())
}

/// A number becomes its canonical name, a name becomes its number
fn translate_keycode(codec: &KeycodeCodec, value: &str) -> Result<String, String> {
    let code = codec
        .parse(value)
        .ok_or_else(|| format!("unknown keycode: \"{value}\""))?;
    let name = codec.stringify(code);
    let is_number = value
        .trim()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit());
    Ok(if is_number {
        name
    } else {
        format!("0x{code:04X}  {name}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_keycode() {
        let codec = KeycodeCodec::default();
        assert_eq!(translate_keycode(&codec, "0x0004").unwrap(), "KC_A");
        assert_eq!(translate_keycode(&codec, "4").unwrap(), "KC_A");
        assert_eq!(translate_keycode(&codec, "KC_A").unwrap(), "0x0004  KC_A");
        assert_eq!(
            translate_keycode(&codec, "LCTL(KC_A)").unwrap(),
            "0x0104  LCTL(KC_A)"
        );
        assert!(translate_keycode(&codec, "KC_NOPE").is_err());
    }
}
