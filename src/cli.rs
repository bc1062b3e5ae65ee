// CLI definitions using clap

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vialctl")]
#[command(author, version, about = "Configure VIA/Vial keyboards from the command line")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: ~/.config/vialctl/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Reply timeout per request in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// hidraw path of the keyboard to open
    #[arg(long, global = true, value_name = "PATH")]
    pub device: Option<String>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // === Query Commands ===
    /// List connected VIA/Vial keyboards
    #[command(visible_aliases = ["ls"])]
    List,

    /// Show protocol versions, keyboard id and firmware version
    #[command(visible_aliases = ["version", "ver"])]
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    // === Keymap Commands ===
    /// Show the keymap
    #[command(visible_aliases = ["km", "k"])]
    Keymap {
        /// Only this layer
        #[arg(short, long)]
        layer: Option<u8>,
    },

    /// Assign a keycode to one matrix position
    #[command(visible_aliases = ["set", "remap"])]
    SetKey {
        layer: u8,
        row: u8,
        col: u8,
        /// Keycode name (e.g. KC_A, LCTL(KC_C), MO(1)) or number (0x0004)
        keycode: String,
    },

    // === Macro Commands ===
    /// Show all macros
    #[command(visible_aliases = ["macro", "m"])]
    Macros,

    /// Replace one macro
    ///
    /// Steps are comma-separated: KC_A (tap), KC_LSFT:down, KC_LSFT:up,
    /// 100ms (delay), "text". An empty step list clears the macro.
    #[command(visible_aliases = ["sm"])]
    SetMacro {
        index: u8,
        /// Macro steps
        actions: Vec<String>,
    },

    // === Dynamic Entries ===
    /// Show tap dances, combos and key overrides
    #[command(visible_aliases = ["dyn", "td"])]
    Dynamic,

    // === Settings ===
    /// Show QMK settings supported by the firmware
    #[command(visible_aliases = ["qmk"])]
    Settings,

    /// Change one QMK setting
    #[command(visible_aliases = ["ss"])]
    SetSetting {
        /// Setting id or name (e.g. 7 or tapping_term)
        id: String,
        value: u32,
    },

    // === Security ===
    /// Unlock the keyboard (hold the highlighted keys when asked)
    Unlock {
        /// Give up after this many seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },

    /// Lock the keyboard again
    Lock,

    // === Profiles ===
    /// Save the whole keyboard configuration to a .vil file
    #[command(visible_aliases = ["save", "backup"])]
    Export { file: PathBuf },

    /// Load a .vil file and write it to the keyboard
    #[command(visible_aliases = ["load", "restore"])]
    Import {
        file: PathBuf,
        /// Check the file against the keyboard without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    // === Utility ===
    /// Translate a keycode name to its number or back (no device needed)
    #[command(visible_aliases = ["kc"])]
    Keycode { value: String },
}
