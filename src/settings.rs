//! Presentation settings
//!
//! Persisted separately from gameplay tuning (LocalStorage on web, a JSON
//! file on native).

use serde::{Deserialize, Serialize};

/// Full-screen effect applied when compositing to the back buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PostEffectKind {
    /// Plain copy
    None,
    #[default]
    Grayscale,
    Invert,
}

impl PostEffectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostEffectKind::None => "None",
            PostEffectKind::Grayscale => "Grayscale",
            PostEffectKind::Invert => "Invert",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Some(PostEffectKind::None),
            "grayscale" | "greyscale" | "gray" | "grey" => Some(PostEffectKind::Grayscale),
            "invert" => Some(PostEffectKind::Invert),
            _ => None,
        }
    }

    /// `effect=<name>` from a URL query such as `?seed=3&effect=invert`
    pub fn from_query(query: &str) -> Option<Self> {
        query
            .trim_start_matches('?')
            .split('&')
            .find_map(|pair| pair.strip_prefix("effect="))
            .and_then(Self::from_str)
    }

    /// Next effect when cycling at runtime
    pub fn next(&self) -> Self {
        match self {
            PostEffectKind::None => PostEffectKind::Grayscale,
            PostEffectKind::Grayscale => PostEffectKind::Invert,
            PostEffectKind::Invert => PostEffectKind::None,
        }
    }

    /// Mode index understood by `post_effect.wgsl`
    pub fn shader_mode(&self) -> u32 {
        match self {
            PostEffectKind::None => 0,
            PostEffectKind::Grayscale => 1,
            PostEffectKind::Invert => 2,
        }
    }
}

/// Presentation preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Post effect used by the compositor
    pub post_effect: PostEffectKind,
    /// Wait for vblank when presenting
    pub vsync: bool,
    /// 3x3 PCF filtering of the shadow map
    pub soft_shadows: bool,
    /// Show the play-info overlay
    pub show_ui: bool,
    /// Lit pass clear color (RGBA)
    pub clear_color: [f32; 4],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            post_effect: PostEffectKind::Grayscale,
            vsync: true,
            soft_shadows: true,
            show_ui: true,
            clear_color: [0.05, 0.05, 0.08, 1.0],
        }
    }
}

impl Settings {
    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "dodge_room_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("Using default settings");
                return Self::default();
            }
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Bad settings file {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
