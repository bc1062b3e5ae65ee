//! High-level keyboard interface for VIA/Vial keyboards
//!
//! This crate provides the codecs for everything a Vial keyboard stores
//! (keycodes, macros, dynamic entries, QMK settings, the compressed
//! definition and its KLE layout) and [`KeyboardInterface`], the async API
//! that fetches and pushes them over a [`FlowControlTransport`].

pub mod definition;
pub mod dynamic;
pub mod error;
pub mod keycode;
pub mod layout;
pub mod macros;
pub mod model;
pub mod profile;
pub mod settings;

pub use definition::KeyboardDefinition;
pub use dynamic::{Combo, DynamicCounts, DynamicEntry, KeyOverride, TapDance};
pub use error::KeyboardError;
pub use keycode::{CustomKeycode, KeycodeCodec};
pub use layout::{EncoderGeometry, KeyGeometry, Layout};
pub use macros::{Macro, MacroAction};
pub use model::{EncoderBinding, KeyboardModel};
pub use profile::Profile;
pub use settings::{DeviceIdentity, FirmwareVersion, SettingsMap, UnlockStatus};

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use vial_transport::protocol::{cmd, dynamic as dyn_op, keyboard_value, vial};
use vial_transport::{DecodeSpec, FlowControlTransport, TransportError, Width};

use definition::BlobAssembler;

/// First Vial protocol with dynamic entries and QMK settings
pub const MIN_DYNAMIC_PROTOCOL: u32 = 4;

/// Interval between unlock polls
pub const UNLOCK_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// High-level keyboard interface using any transport
///
/// Holds the per-session keycode codec, which picks up the device's custom
/// keycodes once the definition has been loaded.
pub struct KeyboardInterface {
    transport: Arc<FlowControlTransport>,
    codec: KeycodeCodec,
    vendor_probe: Option<u8>,
}

impl KeyboardInterface {
    /// Create a new keyboard interface
    pub fn new(transport: Arc<FlowControlTransport>) -> Self {
        Self {
            transport,
            codec: KeycodeCodec::default(),
            vendor_probe: None,
        }
    }

    /// Command id used to probe a vendor protocol extension, if any
    pub fn with_vendor_probe(mut self, cmd_byte: Option<u8>) -> Self {
        self.vendor_probe = cmd_byte;
        self
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &Arc<FlowControlTransport> {
        &self.transport
    }

    /// Keycode codec for this session
    pub fn codec(&self) -> &KeycodeCodec {
        &self.codec
    }

    // === Identity ===

    /// VIA protocol version
    pub async fn get_via_protocol_version(&self) -> Result<u16, KeyboardError> {
        let v = self
            .transport
            .send_echoed(cmd::GET_PROTOCOL_VERSION, &[], &DecodeSpec::field(">xH", 0))
            .await?;
        Ok(v.as_int().unwrap_or_default() as u16)
    }

    /// Vial protocol version and keyboard id.
    ///
    /// VIA-only firmware rejects the Vial prefix; that reads as `(0, 0)`.
    pub async fn get_vial_identity(&self) -> Result<(u32, u64), KeyboardError> {
        let reply = self
            .transport
            .vial(vial::GET_KEYBOARD_ID, &[], &DecodeSpec::Raw)
            .await?
            .into_bytes();
        if reply.first() == Some(&cmd::UNHANDLED) {
            debug!("Vial prefix unhandled, treating as VIA-only firmware");
            return Ok((0, 0));
        }
        let fields = DecodeSpec::unpack("<IQ").decode(&reply)?.into_values();
        Ok((
            fields.first().copied().unwrap_or_default() as u32,
            fields.get(1).copied().unwrap_or_default(),
        ))
    }

    /// Firmware version from the VIA keyboard value query
    pub async fn get_firmware_version(&self) -> Result<FirmwareVersion, KeyboardError> {
        let v = self
            .transport
            .send_echoed(
                cmd::GET_KEYBOARD_VALUE,
                &[keyboard_value::FIRMWARE_VERSION],
                &DecodeSpec::field(">xxI", 0),
            )
            .await?;
        Ok(FirmwareVersion::new(v.as_int().unwrap_or_default() as u32))
    }

    /// Vendor extension protocol version, when a probe command is configured.
    ///
    /// The extension answers `[cmd, version(BE16)]`; firmware without it
    /// answers `0xFF`.
    pub async fn probe_vendor_protocol(&self) -> Result<Option<u16>, KeyboardError> {
        let Some(probe) = self.vendor_probe else {
            return Ok(None);
        };
        let reply = self.transport.query(probe, &[]).await?;
        if reply.first() != Some(&probe) {
            debug!("Vendor probe 0x{probe:02X} not answered");
            return Ok(None);
        }
        let v = DecodeSpec::field(">xH", 0).decode(&reply)?;
        Ok(v.as_int().map(|v| v as u16))
    }

    /// Fetch everything that identifies the keyboard
    pub async fn get_identity(&self) -> Result<DeviceIdentity, KeyboardError> {
        let via_protocol = self.get_via_protocol_version().await?;
        let (vial_protocol, keyboard_id) = self.get_vial_identity().await?;
        let firmware = self.get_firmware_version().await?;
        let vendor_protocol = self.probe_vendor_protocol().await?;
        Ok(DeviceIdentity {
            via_protocol,
            vial_protocol,
            keyboard_id,
            vendor_protocol,
            firmware,
        })
    }

    // === Definition ===

    /// Compressed definition size in bytes
    pub async fn get_definition_size(&self) -> Result<u32, KeyboardError> {
        let v = self
            .transport
            .vial(vial::GET_SIZE, &[], &DecodeSpec::int_at(Width::U32, false, 0))
            .await?;
        Ok(v.as_int().unwrap_or_default() as u32)
    }

    /// Fetch, decompress and parse the keyboard definition.
    ///
    /// Installs the definition's custom keycodes into this session's codec.
    pub async fn load_definition(&mut self) -> Result<KeyboardDefinition, KeyboardError> {
        let size = definition::check_size(self.get_definition_size().await?)?;
        let max_blocks = definition::block_count(size, 2) + 1;
        let start = Instant::now();

        let mut assembler = BlobAssembler::new(size);
        let mut block = 0u32;
        while !assembler.is_complete() {
            if block as usize >= max_blocks {
                return Err(KeyboardError::Definition(format!(
                    "definition transfer stalled at {}/{size} bytes",
                    size - assembler.remaining()
                )));
            }
            let bytes = self
                .transport
                .vial(
                    vial::GET_KEYBOARD_DEFINITION,
                    &block.to_le_bytes(),
                    &DecodeSpec::Raw,
                )
                .await?
                .into_bytes();
            assembler.push(&bytes);
            block += 1;
        }

        let def = KeyboardDefinition::from_blob(&assembler.into_blob())?;
        info!(
            "Loaded definition ({size} bytes, {block} blocks, {:.0}ms): {} {}x{}",
            start.elapsed().as_secs_f64() * 1000.0,
            def.name.as_deref().unwrap_or("unnamed"),
            def.matrix.rows,
            def.matrix.cols
        );
        self.codec = KeycodeCodec::new(&def.custom_keycodes);
        Ok(def)
    }

    // === Keymap ===

    /// Number of dynamic keymap layers
    pub async fn get_layer_count(&self) -> Result<u8, KeyboardError> {
        let v = self
            .transport
            .send_echoed(
                cmd::DYNAMIC_KEYMAP_GET_LAYER_COUNT,
                &[],
                &DecodeSpec::field(">xB", 0),
            )
            .await?;
        Ok(v.as_int().unwrap_or_default() as u8)
    }

    /// Whole keymap, layer-major then row-major
    pub async fn get_keymap(&self, rows: u8, cols: u8, layers: u8) -> Result<Vec<u16>, KeyboardError> {
        let size = 2 * rows as usize * cols as usize * layers as usize;
        let bytes = self
            .transport
            .get_buffer(cmd::DYNAMIC_KEYMAP_GET_BUFFER, size, |_| false)
            .await?;
        Ok(bytes
            .chunks_exact(2)
            .map(|kc| u16::from_be_bytes([kc[0], kc[1]]))
            .collect())
    }

    /// Write the whole keymap in one chunked transfer
    pub async fn set_keymap(&self, keymap: &[u16]) -> Result<(), KeyboardError> {
        let bytes: Vec<u8> = keymap.iter().flat_map(|kc| kc.to_be_bytes()).collect();
        self.transport
            .push_buffer(cmd::DYNAMIC_KEYMAP_SET_BUFFER, &bytes)
            .await?;
        Ok(())
    }

    /// Keycode at one matrix position
    pub async fn get_keycode(&self, layer: u8, row: u8, col: u8) -> Result<u16, KeyboardError> {
        let v = self
            .transport
            .send_echoed(
                cmd::DYNAMIC_KEYMAP_GET_KEYCODE,
                &[layer, row, col],
                &DecodeSpec::field(">xBBBH", 3),
            )
            .await?;
        Ok(v.as_int().unwrap_or_default() as u16)
    }

    /// Set the keycode at one matrix position
    pub async fn set_keycode(
        &self,
        layer: u8,
        row: u8,
        col: u8,
        keycode: u16,
    ) -> Result<(), KeyboardError> {
        let [hi, lo] = keycode.to_be_bytes();
        self.transport
            .send_echoed(
                cmd::DYNAMIC_KEYMAP_SET_KEYCODE,
                &[layer, row, col, hi, lo],
                &DecodeSpec::Raw,
            )
            .await?;
        debug!("Set L{layer} ({row},{col}) = {}", self.codec.stringify(keycode));
        Ok(())
    }

    // === Encoders ===

    /// (counter-clockwise, clockwise) keycodes of one encoder
    pub async fn get_encoder(&self, layer: u8, index: u8) -> Result<EncoderBinding, KeyboardError> {
        let fields = self
            .transport
            .vial(vial::GET_ENCODER, &[layer, index], &DecodeSpec::unpack(">HH"))
            .await?
            .into_values();
        match fields.as_slice() {
            [ccw, cw] => Ok((*ccw as u16, *cw as u16)),
            _ => Err(KeyboardError::UnexpectedResponse(format!(
                "encoder {index} on layer {layer}"
            ))),
        }
    }

    /// Bind one encoder direction (`clockwise = true` for cw)
    pub async fn set_encoder(
        &self,
        layer: u8,
        index: u8,
        clockwise: bool,
        keycode: u16,
    ) -> Result<(), KeyboardError> {
        let [hi, lo] = keycode.to_be_bytes();
        self.transport
            .vial(
                vial::SET_ENCODER,
                &[layer, index, clockwise as u8, hi, lo],
                &DecodeSpec::Raw,
            )
            .await?;
        Ok(())
    }

    /// All encoder bindings, per layer
    pub async fn get_encoders(
        &self,
        layers: u8,
        count: usize,
    ) -> Result<Vec<Vec<EncoderBinding>>, KeyboardError> {
        let count = u8::try_from(count)
            .map_err(|_| KeyboardError::InvalidParameter(format!("{count} encoders")))?;
        let mut all = Vec::with_capacity(layers as usize);
        for layer in 0..layers {
            let mut bindings = Vec::with_capacity(count as usize);
            for index in 0..count {
                bindings.push(self.get_encoder(layer, index).await?);
            }
            all.push(bindings);
        }
        Ok(all)
    }

    // === Layout Options ===

    pub async fn get_layout_options(&self) -> Result<u32, KeyboardError> {
        let v = self
            .transport
            .send_echoed(
                cmd::GET_KEYBOARD_VALUE,
                &[keyboard_value::LAYOUT_OPTIONS],
                &DecodeSpec::field(">xxI", 0),
            )
            .await?;
        Ok(v.as_int().unwrap_or_default() as u32)
    }

    pub async fn set_layout_options(&self, options: u32) -> Result<(), KeyboardError> {
        let mut args = vec![keyboard_value::LAYOUT_OPTIONS];
        args.extend_from_slice(&options.to_be_bytes());
        self.transport
            .send_echoed(cmd::SET_KEYBOARD_VALUE, &args, &DecodeSpec::Raw)
            .await?;
        Ok(())
    }

    // === Macros ===

    /// Number of macro slots
    pub async fn get_macro_count(&self) -> Result<u8, KeyboardError> {
        let v = self
            .transport
            .send_echoed(
                cmd::DYNAMIC_KEYMAP_MACRO_GET_COUNT,
                &[],
                &DecodeSpec::field(">xB", 0),
            )
            .await?;
        Ok(v.as_int().unwrap_or_default() as u8)
    }

    /// Macro buffer capacity in bytes
    pub async fn get_macro_buffer_size(&self) -> Result<u16, KeyboardError> {
        let v = self
            .transport
            .send_echoed(
                cmd::DYNAMIC_KEYMAP_MACRO_GET_BUFFER_SIZE,
                &[],
                &DecodeSpec::field(">xH", 0),
            )
            .await?;
        Ok(v.as_int().unwrap_or_default() as u16)
    }

    /// Read and decode all macros.
    ///
    /// The read stops as soon as `count` terminators have arrived.
    pub async fn get_macros(&self, count: usize, size: usize) -> Result<Vec<Macro>, KeyboardError> {
        if count == 0 || size == 0 {
            return Ok(vec![Vec::new(); count]);
        }
        let buffer = self
            .transport
            .get_buffer(cmd::DYNAMIC_KEYMAP_MACRO_GET_BUFFER, size, |read| {
                macros::terminators(read) >= count
            })
            .await?;
        Ok(macros::decode_buffer(&buffer, count))
    }

    /// Encode and write all macros
    pub async fn set_macros(&self, all: &[Macro], size: usize) -> Result<(), KeyboardError> {
        let buffer = macros::encode_buffer(all, size)?;
        self.transport
            .push_buffer(cmd::DYNAMIC_KEYMAP_MACRO_SET_BUFFER, &buffer)
            .await?;
        debug!("Wrote {} macros ({}/{size} bytes)", all.len(), buffer.len());
        Ok(())
    }

    // === Dynamic Entries ===

    pub async fn get_dynamic_counts(&self) -> Result<DynamicCounts, KeyboardError> {
        let fields = self
            .transport
            .vial(
                vial::DYNAMIC_ENTRY_OP,
                &[dyn_op::GET_NUMBER_OF_ENTRIES],
                &DecodeSpec::unpack("<BBB"),
            )
            .await?
            .into_values();
        Ok(DynamicCounts {
            tap_dance: fields.first().copied().unwrap_or_default() as u8,
            combo: fields.get(1).copied().unwrap_or_default() as u8,
            key_override: fields.get(2).copied().unwrap_or_default() as u8,
        })
    }

    /// Fetch `count` records of one kind
    pub async fn get_entries<T: DynamicEntry>(&self, count: u8) -> Result<Vec<T>, KeyboardError> {
        let replies = self
            .transport
            .dynamic_entries(T::GET_OP, count as usize, &T::decode_spec())
            .await?;
        replies
            .into_iter()
            .enumerate()
            .map(|(i, reply)| T::from_reply(i, reply))
            .collect()
    }

    /// Write one record
    pub async fn set_entry<T: DynamicEntry>(&self, index: u8, entry: &T) -> Result<(), KeyboardError> {
        let mut args = vec![T::SET_OP];
        args.extend_from_slice(&entry.to_wire(index));
        let reply = self
            .transport
            .vial(vial::DYNAMIC_ENTRY_OP, &args, &DecodeSpec::Raw)
            .await?
            .into_bytes();
        match reply.first() {
            Some(0) => Ok(()),
            status => Err(KeyboardError::UnexpectedResponse(format!(
                "{} {index} write: status {status:?}",
                T::KIND
            ))),
        }
    }

    pub async fn get_tap_dances(&self, count: u8) -> Result<Vec<TapDance>, KeyboardError> {
        self.get_entries(count).await
    }

    pub async fn get_combos(&self, count: u8) -> Result<Vec<Combo>, KeyboardError> {
        self.get_entries(count).await
    }

    pub async fn get_key_overrides(&self, count: u8) -> Result<Vec<KeyOverride>, KeyboardError> {
        self.get_entries(count).await
    }

    pub async fn set_tap_dance(&self, index: u8, td: &TapDance) -> Result<(), KeyboardError> {
        self.set_entry(index, td).await
    }

    pub async fn set_combo(&self, index: u8, combo: &Combo) -> Result<(), KeyboardError> {
        self.set_entry(index, combo).await
    }

    pub async fn set_key_override(&self, index: u8, ko: &KeyOverride) -> Result<(), KeyboardError> {
        self.set_entry(index, ko).await
    }

    // === QMK Settings ===

    /// Ids of every setting the firmware supports, in reply order
    pub async fn get_supported_settings(&self) -> Result<Vec<u16>, KeyboardError> {
        let mut supported = Vec::new();
        let mut cursor = 0u16;
        loop {
            let ids = self
                .transport
                .vial(
                    vial::QMK_SETTINGS_QUERY,
                    &cursor.to_le_bytes(),
                    &DecodeSpec::ints(Width::U16, false),
                )
                .await?
                .into_values();
            let (page, next) = settings::parse_settings_page(&ids);
            supported.extend(page);
            match next {
                Some(next) if next > cursor => cursor = next,
                _ => break,
            }
        }
        debug!("Supported settings: {supported:?}");
        Ok(supported)
    }

    /// Read the given settings. Ids missing from the schema are skipped.
    pub async fn get_settings(&self, ids: &[u16]) -> Result<SettingsMap, KeyboardError> {
        let mut values = SettingsMap::new();
        for &id in ids {
            let Some(setting) = settings::qmk_setting(id) else {
                debug!("Skipping setting {id}: not in schema");
                continue;
            };
            let reply = self
                .transport
                .vial(vial::QMK_SETTINGS_GET, &id.to_le_bytes(), &DecodeSpec::Raw)
                .await?
                .into_bytes();
            let value = match reply.split_first() {
                Some((0, rest)) => settings::decode_setting_value(rest, setting.width),
                _ => None,
            }
            .ok_or_else(|| {
                KeyboardError::UnexpectedResponse(format!("setting {} ({id})", setting.name))
            })?;
            values.insert(id, value);
        }
        Ok(values)
    }

    /// Write one setting
    pub async fn set_setting(&self, id: u16, value: u32) -> Result<(), KeyboardError> {
        let setting = settings::qmk_setting(id)
            .ok_or_else(|| KeyboardError::NotFound(format!("setting {id}")))?;
        if setting.width < 4 && value >> (setting.width * 8) != 0 {
            return Err(KeyboardError::InvalidParameter(format!(
                "{} = {value} does not fit {} byte(s)",
                setting.name, setting.width
            )));
        }
        let mut args = id.to_le_bytes().to_vec();
        args.extend_from_slice(&value.to_le_bytes());
        self.transport
            .vial(vial::QMK_SETTINGS_SET, &args, &DecodeSpec::Raw)
            .await?;
        Ok(())
    }

    /// Restore every setting to its firmware default
    pub async fn reset_settings(&self) -> Result<(), KeyboardError> {
        self.transport
            .vial(vial::QMK_SETTINGS_RESET, &[], &DecodeSpec::Raw)
            .await?;
        Ok(())
    }

    // === Security Lock ===

    pub async fn get_unlock_status(&self) -> Result<UnlockStatus, KeyboardError> {
        let reply = self
            .transport
            .vial(vial::GET_UNLOCK_STATUS, &[], &DecodeSpec::Raw)
            .await?;
        Ok(UnlockStatus::from_bytes(&reply.into_bytes()))
    }

    /// Start unlocking and poll until the user has held the unlock keys.
    ///
    /// Fails with a timeout if the firmware has not reported unlocked by
    /// `deadline`.
    pub async fn unlock(&self, deadline: Duration) -> Result<(), KeyboardError> {
        if self.get_unlock_status().await?.unlocked {
            return Ok(());
        }
        self.transport
            .vial(vial::UNLOCK_START, &[], &DecodeSpec::Raw)
            .await?;
        info!("Hold the unlock keys on the keyboard");

        let start = Instant::now();
        loop {
            tokio::time::sleep(UNLOCK_POLL_INTERVAL).await;
            let poll = self
                .transport
                .vial(vial::UNLOCK_POLL, &[], &DecodeSpec::Raw)
                .await?
                .into_bytes();
            if poll.first() == Some(&1) {
                info!("Keyboard unlocked");
                return Ok(());
            }
            if start.elapsed() >= deadline {
                warn!("Unlock not confirmed after {deadline:?}");
                return Err(KeyboardError::Transport(TransportError::Timeout));
            }
        }
    }

    pub async fn lock(&self) -> Result<(), KeyboardError> {
        self.transport
            .vial(vial::LOCK, &[], &DecodeSpec::Raw)
            .await?;
        Ok(())
    }

    // === Resets ===

    /// Restore the default keymap
    pub async fn reset_keymap(&self) -> Result<(), KeyboardError> {
        self.transport
            .send_echoed(cmd::DYNAMIC_KEYMAP_RESET, &[], &DecodeSpec::Raw)
            .await?;
        Ok(())
    }

    /// Clear all macros
    pub async fn reset_macros(&self) -> Result<(), KeyboardError> {
        self.transport
            .send_echoed(cmd::DYNAMIC_KEYMAP_MACRO_RESET, &[], &DecodeSpec::Raw)
            .await?;
        Ok(())
    }

    // === Bulk Load / Push ===

    /// Fetch the whole keyboard state
    pub async fn load(&mut self) -> Result<KeyboardModel, KeyboardError> {
        let identity = self.get_identity().await?;
        info!(
            "Connected: VIA protocol {}, Vial protocol {}, firmware {}",
            identity.via_protocol, identity.vial_protocol, identity.firmware
        );
        if !identity.is_vial() {
            return Err(KeyboardError::NotSupported(
                "keyboard does not speak the Vial protocol".into(),
            ));
        }

        let definition = self.load_definition().await?;
        let layout = Layout::from_kle(&definition.layouts.keymap)?;
        let (rows, cols) = (definition.matrix.rows, definition.matrix.cols);
        let layers = self.get_layer_count().await?;

        let flat = self.get_keymap(rows, cols, layers).await?;
        let keymap = KeyboardModel::keymap_from_flat(&flat, rows, cols);
        info!("Keymap: {layers} layers of {rows}x{cols}");

        let encoders = match layout.encoder_count() {
            0 => Vec::new(),
            n => self.get_encoders(layers, n).await?,
        };
        let layout_options = if definition.layouts.labels.is_empty() {
            0
        } else {
            self.get_layout_options().await?
        };

        let macro_count = self.get_macro_count().await? as usize;
        let macro_buffer_size = self.get_macro_buffer_size().await? as usize;
        let macros = self.get_macros(macro_count, macro_buffer_size).await?;

        let mut model = KeyboardModel {
            identity,
            rows,
            cols,
            layers,
            keymap,
            encoders,
            layout_options,
            macro_buffer_size,
            macros,
            layout,
            definition,
            ..Default::default()
        };

        if model.identity.vial_protocol >= MIN_DYNAMIC_PROTOCOL {
            let counts = self.get_dynamic_counts().await?;
            model.tap_dances = self.get_tap_dances(counts.tap_dance).await?;
            model.combos = self.get_combos(counts.combo).await?;
            model.key_overrides = self.get_key_overrides(counts.key_override).await?;
            model.dynamic_counts = counts;

            let supported = self.get_supported_settings().await?;
            model.settings = self.get_settings(&supported).await?;
        }

        info!(
            "Loaded {} macros, {} tap dances, {} combos, {} key overrides, {} settings",
            model.macros.len(),
            model.tap_dances.len(),
            model.combos.len(),
            model.key_overrides.len(),
            model.settings.len()
        );
        Ok(model)
    }

    /// Write a whole model back to the keyboard
    pub async fn push_model(&self, model: &KeyboardModel) -> Result<(), KeyboardError> {
        self.set_keymap(&model.flat_keymap()).await?;

        for (layer, bindings) in model.encoders.iter().enumerate() {
            for (index, &(ccw, cw)) in bindings.iter().enumerate() {
                self.set_encoder(layer as u8, index as u8, false, ccw).await?;
                self.set_encoder(layer as u8, index as u8, true, cw).await?;
            }
        }

        if !model.definition.layouts.labels.is_empty() {
            self.set_layout_options(model.layout_options).await?;
        }

        self.set_macros(&model.macros, model.macro_buffer_size).await?;

        for (i, td) in model.tap_dances.iter().enumerate() {
            self.set_tap_dance(i as u8, td).await?;
        }
        for (i, combo) in model.combos.iter().enumerate() {
            self.set_combo(i as u8, combo).await?;
        }
        for (i, ko) in model.key_overrides.iter().enumerate() {
            self.set_key_override(i as u8, ko).await?;
        }
        for (&id, &value) in &model.settings {
            self.set_setting(id, value).await?;
        }

        info!("Pushed model to {}", self.device_name());
        Ok(())
    }

    // === Device Info ===

    /// Get device VID
    pub fn vid(&self) -> u16 {
        self.transport.device_info().vid
    }

    /// Get device PID
    pub fn pid(&self) -> u16 {
        self.transport.device_info().pid
    }

    /// Get device name
    pub fn device_name(&self) -> String {
        self.transport
            .device_info()
            .product_name
            .clone()
            .unwrap_or_else(|| format!("{:04X}:{:04X}", self.vid(), self.pid()))
    }

    // === Connection ===

    /// Check if the keyboard is still connected
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Close the connection
    pub async fn close(&self) -> Result<(), KeyboardError> {
        self.transport.close().await?;
        Ok(())
    }
}
