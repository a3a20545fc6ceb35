//! Editor settings

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::{Dimensions, Point, Viewport};

/// Viewport-driven rescale settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeSettings {
    /// Quiet period before a burst of viewport changes is applied
    pub debounce_ms: u64,
    /// Size changes smaller than this on both axes are ignored
    pub tolerance: f64,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            tolerance: 5.0,
        }
    }
}

impl ResizeSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Drawing surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Upper bound for the surface height
    pub max_height: f64,
    /// Share of the window height the surface may use
    pub height_ratio: f64,
    /// Background color RGB hex
    pub background: String,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            max_height: 450.0,
            height_ratio: 0.75,
            background: "#ffffff".to_string(),
        }
    }
}

impl CanvasSettings {
    /// Surface size for a viewport: full container width, height capped
    pub fn fit(&self, viewport: Viewport) -> Dimensions {
        Dimensions::new(
            viewport.container_width,
            self.max_height.min(viewport.window_height * self.height_ratio),
        )
    }
}

/// Formatting toolbar defaults and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattingSettings {
    pub default_size: u32,
    pub default_family: String,
    pub default_color: String,
    pub min_size: u32,
    pub max_size: u32,
    /// Increment used by the size buttons
    pub size_step: u32,
    /// Families offered by the font picker
    pub font_families: Vec<String>,
}

impl Default for FormattingSettings {
    fn default() -> Self {
        Self {
            default_size: 20,
            default_family: "Arial".to_string(),
            default_color: "#000000".to_string(),
            min_size: 8,
            max_size: 72,
            size_step: 2,
            font_families: ["Arial", "Times New Roman", "Courier New", "Georgia", "Verdana"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl FormattingSettings {
    pub fn clamp_size(&self, size: u32) -> u32 {
        size.clamp(self.min_size, self.max_size)
    }

    pub fn is_known_family(&self, family: &str) -> bool {
        self.font_families.iter().any(|f| f == family)
    }
}

/// New text object settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSettings {
    /// Content of a freshly added text object
    pub placeholder: String,
    /// Fraction of the surface center where new text is placed
    pub placement: f64,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            placeholder: "Click to edit".to_string(),
            placement: 0.95,
        }
    }
}

impl TextSettings {
    pub fn position(&self, surface: Dimensions) -> Point {
        surface.center().scaled(self.placement)
    }
}

/// All editor settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub resize: ResizeSettings,
    #[serde(default)]
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub formatting: FormattingSettings,
    #[serde(default)]
    pub text: TextSettings,
}

impl EditorSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "textcanvas", "textcanvas")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid settings in {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings; missing sections fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save settings to the user's config directory
    pub fn save(&self) -> Option<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path).then_some(path)
    }

    pub fn save_to(&self, path: &Path) -> bool {
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Failed to write settings to {}: {e}", path.display());
                    false
                }
            },
            Err(e) => {
                tracing::warn!("Failed to serialize settings: {e}");
                false
            }
        }
    }
}
