/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing or incomplete.
///
/// An explicitly empty `[[menu.entries]]` list is kept as-is so that the
/// menu rejects it at construction instead of silently showing defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::sim::controller::{MenuSettings, DEFAULT_GAMES};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct LauncherConfig {
    pub tick_rate_ms: u64,
    pub title: String,
    pub menu: MenuSettings,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub mute: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    menu: TomlMenu,
    #[serde(default)]
    audio: TomlAudio,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlMenu {
    #[serde(default = "default_idle_timeout")]
    idle_timeout_ticks: u32,
    #[serde(default = "default_debounce")]
    debounce_ms: u64,
    #[serde(default = "default_cursor_step")]
    cursor_step: i32,
    #[serde(default = "default_idle_scene")]
    idle_scene: String,
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_entries")]
    entries: Vec<TomlEntry>,
}

#[derive(Deserialize, Debug, Clone)]
struct TomlEntry {
    name: String,
    /// Defaults to `name`.
    scene: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_music")]
    music: bool,
    #[serde(default = "default_volume")]
    volume: f32,
    #[serde(default = "default_track")]
    track: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_mute")]
    mute: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }          // ~60 Hz, one menu tick per frame
fn default_idle_timeout() -> u32 { 1000 }     // ~16s at 60 Hz
fn default_debounce() -> u64 { 250 }
fn default_cursor_step() -> i32 { 2 }
fn default_idle_scene() -> String { "LeaderBoard".into() }
fn default_title() -> String { "Excella Game Dev Labs".into() }
fn default_music() -> bool { true }
fn default_volume() -> f32 { 0.6 }
fn default_track() -> String { "Main_Menu".into() }

fn default_entries() -> Vec<TomlEntry> {
    DEFAULT_GAMES
        .iter()
        .map(|g| TomlEntry { name: g.to_string(), scene: None })
        .collect()
}

fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_mute() -> Vec<String> { vec!["Y".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlMenu {
    fn default() -> Self {
        TomlMenu {
            idle_timeout_ticks: default_idle_timeout(),
            debounce_ms: default_debounce(),
            cursor_step: default_cursor_step(),
            idle_scene: default_idle_scene(),
            title: default_title(),
            entries: default_entries(),
        }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio {
            music: default_music(),
            volume: default_volume(),
            track: default_track(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            mute: default_mute(),
            quit: default_quit(),
        }
    }
}

// ── Loading ──

impl LauncherConfig {
    /// Load config from `config.toml`.
    /// Search order: exe directory, CWD, XDG data dir, system data dir.
    /// Missing file or missing keys fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = candidate_dirs()
            .iter()
            .map(|d| d.join("config.toml"))
            .find(|p| p.exists())
            .map(|p| read_toml(&p))
            .unwrap_or_default();
        Self::from_toml(toml_cfg)
    }

    /// Load from one specific file. Unreadable or malformed files fall back
    /// to defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        Self::from_toml(read_toml(path))
    }

    #[cfg(test)]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Self::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let entries = cfg
            .menu
            .entries
            .into_iter()
            .map(|e| {
                let scene = e.scene.unwrap_or_else(|| e.name.clone());
                (e.name, scene)
            })
            .collect();

        LauncherConfig {
            tick_rate_ms: cfg.general.tick_rate_ms.max(1),
            title: cfg.menu.title,
            menu: MenuSettings {
                entries,
                music_enabled: cfg.audio.music,
                idle_timeout_ticks: cfg.menu.idle_timeout_ticks,
                debounce: Duration::from_millis(cfg.menu.debounce_ms),
                cursor_step: cfg.menu.cursor_step,
                music_volume: cfg.audio.volume,
                idle_scene: cfg.menu.idle_scene,
                menu_track: cfg.audio.track,
            },
            gamepad: GamepadConfig {
                confirm: cfg.gamepad.confirm,
                mute: cfg.gamepad.mute,
                quit: cfg.gamepad.quit,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD + data dirs (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut found = vec![];

    // 1. Directory of the running executable (symlinks resolved)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            found.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !found.iter().any(|d| d == &cwd) {
            found.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/arcade-launcher)
    if let Some(data) = dirs::data_dir() {
        let xdg = data.join("arcade-launcher");
        if xdg.is_dir() && !found.iter().any(|d| d == &xdg) {
            found.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/arcade-launcher");
    if sys.is_dir() && !found.iter().any(|d| d == &sys) {
        found.push(sys);
    }

    if found.is_empty() {
        found.push(PathBuf::from("."));
    }

    found
}

fn read_toml(path: &Path) -> TomlConfig {
    match std::fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), "config parse error, using defaults: {e}");
                TomlConfig::default()
            }
        },
        Err(e) => {
            warn!(path = %path.display(), "could not read config: {e}");
            TomlConfig::default()
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
