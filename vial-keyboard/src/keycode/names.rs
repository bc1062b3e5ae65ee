//! Static keycode name tables (QMK keycode v6 numbering)

/// QMK keycode range starts
pub mod range {
    pub const QK_BASIC_MAX: u16 = 0x00FF;
    pub const QK_MODS: u16 = 0x0100;
    pub const QK_MODS_MAX: u16 = 0x1FFF;
    pub const QK_MOD_TAP: u16 = 0x2000;
    pub const QK_LAYER_TAP: u16 = 0x4000;
    pub const QK_TO: u16 = 0x5200;
    pub const QK_MOMENTARY: u16 = 0x5220;
    pub const QK_DEF_LAYER: u16 = 0x5240;
    pub const QK_TOGGLE_LAYER: u16 = 0x5260;
    pub const QK_ONE_SHOT_LAYER: u16 = 0x5280;
    pub const QK_ONE_SHOT_MOD: u16 = 0x52A0;
    pub const QK_LAYER_TAP_TOGGLE: u16 = 0x52C0;
    pub const QK_TAP_DANCE: u16 = 0x5700;
    pub const QK_MACRO: u16 = 0x7700;
    pub const QK_USER: u16 = 0x7E40;
}

/// Number of layers addressable by the layer-action ranges
pub const LAYER_ACTION_COUNT: u16 = 32;
/// Number of layers addressable by layer-tap
pub const LAYER_TAP_COUNT: u16 = 16;
pub const MACRO_COUNT: u16 = 128;
pub const TAP_DANCE_COUNT: u16 = 256;
pub const USER_KEYCODE_COUNT: u16 = 64;

/// Modifier bits as used in the high byte of modifier-wrapped keycodes
pub mod mods {
    pub const CTL: u8 = 0x01;
    pub const SFT: u8 = 0x02;
    pub const ALT: u8 = 0x04;
    pub const GUI: u8 = 0x08;
    /// All modifiers in the mask are right-hand ones
    pub const RIGHT: u8 = 0x10;
}

/// Single-modifier wrapper names, combined when no shorthand exists
pub const SINGLE_MODS: &[(u8, &str)] = &[
    (mods::CTL, "LCTL"),
    (mods::SFT, "LSFT"),
    (mods::ALT, "LALT"),
    (mods::GUI, "LGUI"),
    (mods::RIGHT | mods::CTL, "RCTL"),
    (mods::RIGHT | mods::SFT, "RSFT"),
    (mods::RIGHT | mods::ALT, "RALT"),
    (mods::RIGHT | mods::GUI, "RGUI"),
];

/// QMK shorthands for multi-modifier wrappers
pub const MOD_SHORTHANDS: &[(u8, &str)] = &[
    (0x03, "C_S"),
    (0x05, "LCA"),
    (0x06, "LSA"),
    (0x07, "MEH"),
    (0x09, "LCG"),
    (0x0A, "SGUI"),
    (0x0C, "LAG"),
    (0x0D, "LCAG"),
    (0x0F, "HYPR"),
    (0x13, "RCS"),
    (0x15, "RCA"),
    (0x16, "RSA"),
    (0x19, "RCG"),
    (0x1A, "RSG"),
    (0x1C, "RAG"),
    (0x1D, "RCAG"),
];

/// Mod-tap wrapper names (`MOD_T(kc)`), by modifier mask
pub const MOD_TAP: &[(u8, &str)] = &[
    (0x01, "LCTL_T"),
    (0x02, "LSFT_T"),
    (0x03, "C_S_T"),
    (0x04, "LALT_T"),
    (0x05, "LCA_T"),
    (0x06, "LSA_T"),
    (0x07, "MEH_T"),
    (0x08, "LGUI_T"),
    (0x09, "LCG_T"),
    (0x0A, "SGUI_T"),
    (0x0C, "LAG_T"),
    (0x0D, "LCAG_T"),
    (0x0F, "HYPR_T"),
    (0x11, "RCTL_T"),
    (0x12, "RSFT_T"),
    (0x14, "RALT_T"),
    (0x18, "RGUI_T"),
    (0x1D, "RCAG_T"),
];

/// One-shot modifier names, by modifier mask
pub const ONE_SHOT_MODS: &[(u8, &str)] = &[
    (0x01, "OSM(MOD_LCTL)"),
    (0x02, "OSM(MOD_LSFT)"),
    (0x03, "OSM(MOD_LCTL|MOD_LSFT)"),
    (0x04, "OSM(MOD_LALT)"),
    (0x07, "OSM(MOD_MEH)"),
    (0x08, "OSM(MOD_LGUI)"),
    (0x0F, "OSM(MOD_HYPR)"),
    (0x11, "OSM(MOD_RCTL)"),
    (0x12, "OSM(MOD_RSFT)"),
    (0x14, "OSM(MOD_RALT)"),
    (0x18, "OSM(MOD_RGUI)"),
];

/// Directly named keycodes: basic, media, mouse and modifier keys
pub const BASIC: &[(u16, &str)] = &[
    (0x0000, "KC_NO"),
    (0x0001, "KC_TRNS"),
    (0x0004, "KC_A"),
    (0x0005, "KC_B"),
    (0x0006, "KC_C"),
    (0x0007, "KC_D"),
    (0x0008, "KC_E"),
    (0x0009, "KC_F"),
    (0x000A, "KC_G"),
    (0x000B, "KC_H"),
    (0x000C, "KC_I"),
    (0x000D, "KC_J"),
    (0x000E, "KC_K"),
    (0x000F, "KC_L"),
    (0x0010, "KC_M"),
    (0x0011, "KC_N"),
    (0x0012, "KC_O"),
    (0x0013, "KC_P"),
    (0x0014, "KC_Q"),
    (0x0015, "KC_R"),
    (0x0016, "KC_S"),
    (0x0017, "KC_T"),
    (0x0018, "KC_U"),
    (0x0019, "KC_V"),
    (0x001A, "KC_W"),
    (0x001B, "KC_X"),
    (0x001C, "KC_Y"),
    (0x001D, "KC_Z"),
    (0x001E, "KC_1"),
    (0x001F, "KC_2"),
    (0x0020, "KC_3"),
    (0x0021, "KC_4"),
    (0x0022, "KC_5"),
    (0x0023, "KC_6"),
    (0x0024, "KC_7"),
    (0x0025, "KC_8"),
    (0x0026, "KC_9"),
    (0x0027, "KC_0"),
    (0x0028, "KC_ENTER"),
    (0x0029, "KC_ESCAPE"),
    (0x002A, "KC_BACKSPACE"),
    (0x002B, "KC_TAB"),
    (0x002C, "KC_SPACE"),
    (0x002D, "KC_MINUS"),
    (0x002E, "KC_EQUAL"),
    (0x002F, "KC_LBRACKET"),
    (0x0030, "KC_RBRACKET"),
    (0x0031, "KC_BSLASH"),
    (0x0032, "KC_NONUS_HASH"),
    (0x0033, "KC_SCOLON"),
    (0x0034, "KC_QUOTE"),
    (0x0035, "KC_GRAVE"),
    (0x0036, "KC_COMMA"),
    (0x0037, "KC_DOT"),
    (0x0038, "KC_SLASH"),
    (0x0039, "KC_CAPSLOCK"),
    (0x003A, "KC_F1"),
    (0x003B, "KC_F2"),
    (0x003C, "KC_F3"),
    (0x003D, "KC_F4"),
    (0x003E, "KC_F5"),
    (0x003F, "KC_F6"),
    (0x0040, "KC_F7"),
    (0x0041, "KC_F8"),
    (0x0042, "KC_F9"),
    (0x0043, "KC_F10"),
    (0x0044, "KC_F11"),
    (0x0045, "KC_F12"),
    (0x0046, "KC_PSCREEN"),
    (0x0047, "KC_SCROLLLOCK"),
    (0x0048, "KC_PAUSE"),
    (0x0049, "KC_INSERT"),
    (0x004A, "KC_HOME"),
    (0x004B, "KC_PGUP"),
    (0x004C, "KC_DELETE"),
    (0x004D, "KC_END"),
    (0x004E, "KC_PGDOWN"),
    (0x004F, "KC_RIGHT"),
    (0x0050, "KC_LEFT"),
    (0x0051, "KC_DOWN"),
    (0x0052, "KC_UP"),
    (0x0053, "KC_NUMLOCK"),
    (0x0054, "KC_KP_SLASH"),
    (0x0055, "KC_KP_ASTERISK"),
    (0x0056, "KC_KP_MINUS"),
    (0x0057, "KC_KP_PLUS"),
    (0x0058, "KC_KP_ENTER"),
    (0x0059, "KC_KP_1"),
    (0x005A, "KC_KP_2"),
    (0x005B, "KC_KP_3"),
    (0x005C, "KC_KP_4"),
    (0x005D, "KC_KP_5"),
    (0x005E, "KC_KP_6"),
    (0x005F, "KC_KP_7"),
    (0x0060, "KC_KP_8"),
    (0x0061, "KC_KP_9"),
    (0x0062, "KC_KP_0"),
    (0x0063, "KC_KP_DOT"),
    (0x0064, "KC_NONUS_BSLASH"),
    (0x0065, "KC_APPLICATION"),
    (0x0066, "KC_POWER"),
    (0x0067, "KC_KP_EQUAL"),
    (0x0068, "KC_F13"),
    (0x0069, "KC_F14"),
    (0x006A, "KC_F15"),
    (0x006B, "KC_F16"),
    (0x006C, "KC_F17"),
    (0x006D, "KC_F18"),
    (0x006E, "KC_F19"),
    (0x006F, "KC_F20"),
    (0x0070, "KC_F21"),
    (0x0071, "KC_F22"),
    (0x0072, "KC_F23"),
    (0x0073, "KC_F24"),
    (0x0074, "KC_EXECUTE"),
    (0x0075, "KC_HELP"),
    (0x0076, "KC_MENU"),
    (0x0077, "KC_SELECT"),
    (0x0078, "KC_STOP"),
    (0x0079, "KC_AGAIN"),
    (0x007A, "KC_UNDO"),
    (0x007B, "KC_CUT"),
    (0x007C, "KC_COPY"),
    (0x007D, "KC_PASTE"),
    (0x007E, "KC_FIND"),
    (0x007F, "KC_KB_MUTE"),
    (0x0080, "KC_KB_VOLUME_UP"),
    (0x0081, "KC_KB_VOLUME_DOWN"),
    (0x0082, "KC_LOCKING_CAPS"),
    (0x0083, "KC_LOCKING_NUM"),
    (0x0084, "KC_LOCKING_SCROLL"),
    (0x0085, "KC_KP_COMMA"),
    (0x0086, "KC_KP_EQUAL_AS400"),
    (0x0087, "KC_RO"),
    (0x0088, "KC_KANA"),
    (0x0089, "KC_JYEN"),
    (0x008A, "KC_HENK"),
    (0x008B, "KC_MHEN"),
    (0x008C, "KC_INT6"),
    (0x008D, "KC_INT7"),
    (0x008E, "KC_INT8"),
    (0x008F, "KC_INT9"),
    (0x0090, "KC_HAEN"),
    (0x0091, "KC_HANJ"),
    (0x0092, "KC_LANG3"),
    (0x0093, "KC_LANG4"),
    (0x0094, "KC_LANG5"),
    (0x0095, "KC_LANG6"),
    (0x0096, "KC_LANG7"),
    (0x0097, "KC_LANG8"),
    (0x0098, "KC_LANG9"),
    (0x0099, "KC_ALT_ERASE"),
    (0x009A, "KC_SYSREQ"),
    (0x009B, "KC_CANCEL"),
    (0x009C, "KC_CLEAR"),
    (0x009D, "KC_PRIOR"),
    (0x009E, "KC_RETURN"),
    (0x009F, "KC_SEPARATOR"),
    (0x00A0, "KC_OUT"),
    (0x00A1, "KC_OPER"),
    (0x00A2, "KC_CLEAR_AGAIN"),
    (0x00A3, "KC_CRSEL"),
    (0x00A4, "KC_EXSEL"),
    (0x00A5, "KC_SYSTEM_POWER"),
    (0x00A6, "KC_SYSTEM_SLEEP"),
    (0x00A7, "KC_SYSTEM_WAKE"),
    (0x00A8, "KC_AUDIO_MUTE"),
    (0x00A9, "KC_AUDIO_VOL_UP"),
    (0x00AA, "KC_AUDIO_VOL_DOWN"),
    (0x00AB, "KC_MEDIA_NEXT_TRACK"),
    (0x00AC, "KC_MEDIA_PREV_TRACK"),
    (0x00AD, "KC_MEDIA_STOP"),
    (0x00AE, "KC_MEDIA_PLAY_PAUSE"),
    (0x00AF, "KC_MEDIA_SELECT"),
    (0x00B0, "KC_MEDIA_EJECT"),
    (0x00B1, "KC_MAIL"),
    (0x00B2, "KC_CALCULATOR"),
    (0x00B3, "KC_MY_COMPUTER"),
    (0x00B4, "KC_WWW_SEARCH"),
    (0x00B5, "KC_WWW_HOME"),
    (0x00B6, "KC_WWW_BACK"),
    (0x00B7, "KC_WWW_FORWARD"),
    (0x00B8, "KC_WWW_STOP"),
    (0x00B9, "KC_WWW_REFRESH"),
    (0x00BA, "KC_WWW_FAVORITES"),
    (0x00BB, "KC_MEDIA_FAST_FORWARD"),
    (0x00BC, "KC_MEDIA_REWIND"),
    (0x00BD, "KC_BRIGHTNESS_UP"),
    (0x00BE, "KC_BRIGHTNESS_DOWN"),
    (0x00BF, "KC_CONTROL_PANEL"),
    (0x00C0, "KC_ASSISTANT"),
    (0x00C1, "KC_MISSION_CONTROL"),
    (0x00C2, "KC_LAUNCHPAD"),
    (0x00CD, "KC_MS_UP"),
    (0x00CE, "KC_MS_DOWN"),
    (0x00CF, "KC_MS_LEFT"),
    (0x00D0, "KC_MS_RIGHT"),
    (0x00D1, "KC_MS_BTN1"),
    (0x00D2, "KC_MS_BTN2"),
    (0x00D3, "KC_MS_BTN3"),
    (0x00D4, "KC_MS_BTN4"),
    (0x00D5, "KC_MS_BTN5"),
    (0x00D6, "KC_MS_BTN6"),
    (0x00D7, "KC_MS_BTN7"),
    (0x00D8, "KC_MS_BTN8"),
    (0x00D9, "KC_MS_WH_UP"),
    (0x00DA, "KC_MS_WH_DOWN"),
    (0x00DB, "KC_MS_WH_LEFT"),
    (0x00DC, "KC_MS_WH_RIGHT"),
    (0x00DD, "KC_MS_ACCEL0"),
    (0x00DE, "KC_MS_ACCEL1"),
    (0x00DF, "KC_MS_ACCEL2"),
    (0x00E0, "KC_LCTRL"),
    (0x00E1, "KC_LSHIFT"),
    (0x00E2, "KC_LALT"),
    (0x00E3, "KC_LGUI"),
    (0x00E4, "KC_RCTRL"),
    (0x00E5, "KC_RSHIFT"),
    (0x00E6, "KC_RALT"),
    (0x00E7, "KC_RGUI"),
];

/// Directly named keycodes outside the basic range
pub const QUANTUM: &[(u16, &str)] = &[
    (0x56F0, "SH_TG"),
    (0x56F1, "SH_TT"),
    (0x56F2, "SH_MON"),
    (0x56F3, "SH_MOFF"),
    (0x56F4, "SH_OFF"),
    (0x56F5, "SH_ON"),
    (0x56F6, "SH_OS"),
    (0x7000, "MAGIC_SWAP_CONTROL_CAPSLOCK"),
    (0x7001, "MAGIC_UNSWAP_CONTROL_CAPSLOCK"),
    (0x7002, "MAGIC_TOGGLE_CONTROL_CAPSLOCK"),
    (0x7003, "MAGIC_UNCAPSLOCK_TO_CONTROL"),
    (0x7004, "MAGIC_CAPSLOCK_TO_CONTROL"),
    (0x7005, "MAGIC_SWAP_LALT_LGUI"),
    (0x7006, "MAGIC_UNSWAP_LALT_LGUI"),
    (0x7007, "MAGIC_SWAP_RALT_RGUI"),
    (0x7008, "MAGIC_UNSWAP_RALT_RGUI"),
    (0x7009, "MAGIC_UNNO_GUI"),
    (0x700A, "MAGIC_NO_GUI"),
    (0x700B, "MAGIC_TOGGLE_GUI"),
    (0x700C, "MAGIC_SWAP_GRAVE_ESC"),
    (0x700D, "MAGIC_UNSWAP_GRAVE_ESC"),
    (0x700E, "MAGIC_SWAP_BACKSLASH_BACKSPACE"),
    (0x700F, "MAGIC_UNSWAP_BACKSLASH_BACKSPACE"),
    (0x7010, "MAGIC_TOGGLE_BACKSLASH_BACKSPACE"),
    (0x7011, "MAGIC_HOST_NKRO"),
    (0x7012, "MAGIC_UNHOST_NKRO"),
    (0x7013, "MAGIC_TOGGLE_NKRO"),
    (0x7014, "MAGIC_SWAP_ALT_GUI"),
    (0x7015, "MAGIC_UNSWAP_ALT_GUI"),
    (0x7016, "MAGIC_TOGGLE_ALT_GUI"),
    (0x7017, "MAGIC_SWAP_LCTL_LGUI"),
    (0x7018, "MAGIC_UNSWAP_LCTL_LGUI"),
    (0x7019, "MAGIC_SWAP_RCTL_RGUI"),
    (0x701A, "MAGIC_UNSWAP_RCTL_RGUI"),
    (0x701B, "MAGIC_SWAP_CTL_GUI"),
    (0x701C, "MAGIC_UNSWAP_CTL_GUI"),
    (0x701D, "MAGIC_TOGGLE_CTL_GUI"),
    (0x701E, "MAGIC_EE_HANDS_LEFT"),
    (0x701F, "MAGIC_EE_HANDS_RIGHT"),
    (0x7020, "MAGIC_SWAP_ESCAPE_CAPSLOCK"),
    (0x7021, "MAGIC_UNSWAP_ESCAPE_CAPSLOCK"),
    (0x7022, "MAGIC_TOGGLE_ESCAPE_CAPSLOCK"),
    (0x7800, "BL_ON"),
    (0x7801, "BL_OFF"),
    (0x7802, "BL_TOGG"),
    (0x7803, "BL_DEC"),
    (0x7804, "BL_INC"),
    (0x7805, "BL_STEP"),
    (0x7806, "BL_BRTG"),
    (0x7820, "RGB_TOG"),
    (0x7821, "RGB_MOD"),
    (0x7822, "RGB_RMOD"),
    (0x7823, "RGB_HUI"),
    (0x7824, "RGB_HUD"),
    (0x7825, "RGB_SAI"),
    (0x7826, "RGB_SAD"),
    (0x7827, "RGB_VAI"),
    (0x7828, "RGB_VAD"),
    (0x7829, "RGB_SPI"),
    (0x782A, "RGB_SPD"),
    (0x782B, "RGB_M_P"),
    (0x782C, "RGB_M_B"),
    (0x782D, "RGB_M_R"),
    (0x782E, "RGB_M_SW"),
    (0x782F, "RGB_M_SN"),
    (0x7830, "RGB_M_K"),
    (0x7831, "RGB_M_X"),
    (0x7832, "RGB_M_G"),
    (0x7833, "RGB_M_T"),
    (0x7834, "RGB_M_TW"),
    (0x7C00, "QK_BOOT"),
    (0x7C01, "QK_REBOOT"),
    (0x7C02, "DB_TOGG"),
    (0x7C03, "EE_CLR"),
    (0x7C10, "AS_DOWN"),
    (0x7C11, "AS_UP"),
    (0x7C12, "AS_RPT"),
    (0x7C13, "AS_ON"),
    (0x7C14, "AS_OFF"),
    (0x7C15, "AS_TOGG"),
    (0x7C16, "QK_GESC"),
    (0x7C18, "SC_LCPO"),
    (0x7C19, "SC_RCPC"),
    (0x7C1A, "SC_LSPO"),
    (0x7C1B, "SC_RSPC"),
    (0x7C1C, "SC_LAPO"),
    (0x7C1D, "SC_RAPC"),
    (0x7C1E, "SC_SENT"),
    (0x7C50, "CM_ON"),
    (0x7C51, "CM_OFF"),
    (0x7C52, "CM_TOGG"),
    (0x7C53, "DM_REC1"),
    (0x7C54, "DM_REC2"),
    (0x7C55, "DM_RSTP"),
    (0x7C56, "DM_PLY1"),
    (0x7C57, "DM_PLY2"),
    (0x7C5D, "QK_LEAD"),
    (0x7C5E, "OS_ON"),
    (0x7C5F, "OS_OFF"),
    (0x7C60, "OS_TOGG"),
    (0x7C73, "CW_TOGG"),
    (0x7C77, "FN_MO13"),
    (0x7C78, "FN_MO23"),
    (0x7C79, "QK_REP"),
    (0x7C7A, "QK_AREP"),
];

/// Alternative spellings accepted by `parse`, mapped to canonical names
pub const ALIASES: &[(&str, &str)] = &[
    ("XXXXXXX", "KC_NO"),
    ("_______", "KC_TRNS"),
    ("KC_TRANSPARENT", "KC_TRNS"),
    ("KC_ENT", "KC_ENTER"),
    ("KC_ESC", "KC_ESCAPE"),
    ("KC_BSPC", "KC_BACKSPACE"),
    ("KC_BSPACE", "KC_BACKSPACE"),
    ("KC_SPC", "KC_SPACE"),
    ("KC_MINS", "KC_MINUS"),
    ("KC_EQL", "KC_EQUAL"),
    ("KC_LBRC", "KC_LBRACKET"),
    ("KC_LEFT_BRACKET", "KC_LBRACKET"),
    ("KC_RBRC", "KC_RBRACKET"),
    ("KC_RIGHT_BRACKET", "KC_RBRACKET"),
    ("KC_BSLS", "KC_BSLASH"),
    ("KC_BACKSLASH", "KC_BSLASH"),
    ("KC_NUHS", "KC_NONUS_HASH"),
    ("KC_SCLN", "KC_SCOLON"),
    ("KC_SEMICOLON", "KC_SCOLON"),
    ("KC_QUOT", "KC_QUOTE"),
    ("KC_GRV", "KC_GRAVE"),
    ("KC_COMM", "KC_COMMA"),
    ("KC_SLSH", "KC_SLASH"),
    ("KC_CAPS", "KC_CAPSLOCK"),
    ("KC_CAPS_LOCK", "KC_CAPSLOCK"),
    ("KC_PSCR", "KC_PSCREEN"),
    ("KC_PRINT_SCREEN", "KC_PSCREEN"),
    ("KC_SLCK", "KC_SCROLLLOCK"),
    ("KC_SCRL", "KC_SCROLLLOCK"),
    ("KC_PAUS", "KC_PAUSE"),
    ("KC_INS", "KC_INSERT"),
    ("KC_PAGE_UP", "KC_PGUP"),
    ("KC_DEL", "KC_DELETE"),
    ("KC_PGDN", "KC_PGDOWN"),
    ("KC_PAGE_DOWN", "KC_PGDOWN"),
    ("KC_RGHT", "KC_RIGHT"),
    ("KC_NLCK", "KC_NUMLOCK"),
    ("KC_NUM", "KC_NUMLOCK"),
    ("KC_PSLS", "KC_KP_SLASH"),
    ("KC_PAST", "KC_KP_ASTERISK"),
    ("KC_PMNS", "KC_KP_MINUS"),
    ("KC_PPLS", "KC_KP_PLUS"),
    ("KC_PENT", "KC_KP_ENTER"),
    ("KC_P1", "KC_KP_1"),
    ("KC_P2", "KC_KP_2"),
    ("KC_P3", "KC_KP_3"),
    ("KC_P4", "KC_KP_4"),
    ("KC_P5", "KC_KP_5"),
    ("KC_P6", "KC_KP_6"),
    ("KC_P7", "KC_KP_7"),
    ("KC_P8", "KC_KP_8"),
    ("KC_P9", "KC_KP_9"),
    ("KC_P0", "KC_KP_0"),
    ("KC_PDOT", "KC_KP_DOT"),
    ("KC_NUBS", "KC_NONUS_BSLASH"),
    ("KC_APP", "KC_APPLICATION"),
    ("KC_PEQL", "KC_KP_EQUAL"),
    ("KC_MUTE", "KC_AUDIO_MUTE"),
    ("KC_VOLU", "KC_AUDIO_VOL_UP"),
    ("KC_VOLD", "KC_AUDIO_VOL_DOWN"),
    ("KC_MNXT", "KC_MEDIA_NEXT_TRACK"),
    ("KC_MPRV", "KC_MEDIA_PREV_TRACK"),
    ("KC_MSTP", "KC_MEDIA_STOP"),
    ("KC_MPLY", "KC_MEDIA_PLAY_PAUSE"),
    ("KC_MSEL", "KC_MEDIA_SELECT"),
    ("KC_EJCT", "KC_MEDIA_EJECT"),
    ("KC_CALC", "KC_CALCULATOR"),
    ("KC_MYCM", "KC_MY_COMPUTER"),
    ("KC_BRIU", "KC_BRIGHTNESS_UP"),
    ("KC_BRID", "KC_BRIGHTNESS_DOWN"),
    ("KC_PWR", "KC_SYSTEM_POWER"),
    ("KC_SLEP", "KC_SYSTEM_SLEEP"),
    ("KC_WAKE", "KC_SYSTEM_WAKE"),
    ("KC_LCTL", "KC_LCTRL"),
    ("KC_LEFT_CTRL", "KC_LCTRL"),
    ("KC_LSFT", "KC_LSHIFT"),
    ("KC_LEFT_SHIFT", "KC_LSHIFT"),
    ("KC_LOPT", "KC_LALT"),
    ("KC_LCMD", "KC_LGUI"),
    ("KC_LWIN", "KC_LGUI"),
    ("KC_RCTL", "KC_RCTRL"),
    ("KC_RIGHT_CTRL", "KC_RCTRL"),
    ("KC_RSFT", "KC_RSHIFT"),
    ("KC_RIGHT_SHIFT", "KC_RSHIFT"),
    ("KC_ROPT", "KC_RALT"),
    ("KC_ALGR", "KC_RALT"),
    ("KC_RCMD", "KC_RGUI"),
    ("KC_RWIN", "KC_RGUI"),
    ("KC_MS_U", "KC_MS_UP"),
    ("KC_MS_D", "KC_MS_DOWN"),
    ("KC_MS_L", "KC_MS_LEFT"),
    ("KC_MS_R", "KC_MS_RIGHT"),
    ("KC_BTN1", "KC_MS_BTN1"),
    ("KC_BTN2", "KC_MS_BTN2"),
    ("KC_BTN3", "KC_MS_BTN3"),
    ("KC_BTN4", "KC_MS_BTN4"),
    ("KC_BTN5", "KC_MS_BTN5"),
    ("KC_WH_U", "KC_MS_WH_UP"),
    ("KC_WH_D", "KC_MS_WH_DOWN"),
    ("KC_WH_L", "KC_MS_WH_LEFT"),
    ("KC_WH_R", "KC_MS_WH_RIGHT"),
    ("KC_ACL0", "KC_MS_ACCEL0"),
    ("KC_ACL1", "KC_MS_ACCEL1"),
    ("KC_ACL2", "KC_MS_ACCEL2"),
    ("RESET", "QK_BOOT"),
    ("QK_BOOTLOADER", "QK_BOOT"),
    ("KC_GESC", "QK_GESC"),
    ("QK_GRAVE_ESCAPE", "QK_GESC"),
    ("KC_LSPO", "SC_LSPO"),
    ("KC_RSPC", "SC_RSPC"),
    ("KC_LCPO", "SC_LCPO"),
    ("KC_RCPC", "SC_RCPC"),
    ("KC_LAPO", "SC_LAPO"),
    ("KC_RAPC", "SC_RAPC"),
    ("KC_SFTENT", "SC_SENT"),
    ("CAPS_WORD", "CW_TOGG"),
    ("ALL_T(kc)", "HYPR_T(kc)"),
    ("LCS(kc)", "C_S(kc)"),
    ("LSG(kc)", "SGUI(kc)"),
    ("LOPT(kc)", "LALT(kc)"),
    ("LCMD(kc)", "LGUI(kc)"),
    ("LWIN(kc)", "LGUI(kc)"),
    ("ALGR(kc)", "RALT(kc)"),
    ("ROPT(kc)", "RALT(kc)"),
    ("RCMD(kc)", "RGUI(kc)"),
    ("C(kc)", "LCTL(kc)"),
    ("S(kc)", "LSFT(kc)"),
    ("A(kc)", "LALT(kc)"),
    ("G(kc)", "LGUI(kc)"),
];
