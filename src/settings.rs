//! Reader display settings, persisted locally and never synced.

use crate::error::Result;
use crate::store::{LocalStore, READER_SETTINGS_KEY};
use serde::{Deserialize, Serialize};

/// Smallest font size the reader accepts.
pub const MIN_FONT_SIZE: u32 = 14;
/// Largest font size the reader accepts.
pub const MAX_FONT_SIZE: u32 = 32;
/// Font size of a fresh install.
pub const DEFAULT_FONT_SIZE: u32 = 19;

/// Reader background theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Theme {
    /// White page, dark text.
    Light,
    /// Dark grey page.
    Dim,
    /// Black page.
    #[default]
    Black,
}

impl Theme {
    /// Background color as stored.
    pub fn background(&self) -> &'static str {
        match self {
            Theme::Light => "#fff",
            Theme::Dim => "#2d2d2d",
            Theme::Black => "#0a0a0a",
        }
    }

    /// Text color paired with the background.
    pub fn text_color(&self) -> &'static str {
        match self {
            Theme::Light => "#1a1a1a",
            _ => "#e0e0e0",
        }
    }

    fn from_background(color: &str) -> Option<Self> {
        [Theme::Light, Theme::Dim, Theme::Black]
            .into_iter()
            .find(|t| t.background() == color)
    }
}

/// Reader font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Font {
    /// Cairo sans.
    #[default]
    Cairo,
    /// Amiri serif.
    Amiri,
    /// Geeza Pro.
    Geeza,
    /// Noto Kufi Arabic.
    Noto,
    /// Arial.
    Arial,
    /// Times New Roman.
    Times,
}

impl Font {
    const ALL: [Font; 6] = [
        Font::Cairo,
        Font::Amiri,
        Font::Geeza,
        Font::Noto,
        Font::Arial,
        Font::Times,
    ];

    /// Stored identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Font::Cairo => "Cairo",
            Font::Amiri => "Amiri",
            Font::Geeza => "Geeza",
            Font::Noto => "Noto",
            Font::Arial => "Arial",
            Font::Times => "Times",
        }
    }

    /// CSS font-family stack.
    pub fn family(&self) -> &'static str {
        match self {
            Font::Cairo => "'Cairo', sans-serif",
            Font::Amiri => "'Amiri', serif",
            Font::Geeza => "'Geeza Pro', 'Segoe UI', Tahoma, sans-serif",
            Font::Noto => "'Noto Kufi Arabic', sans-serif",
            Font::Arial => "Arial, sans-serif",
            Font::Times => "'Times New Roman', serif",
        }
    }

    fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }
}

/// On-disk shape. Every field is optional so partial writes merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_id: Option<String>,
}

impl StoredSettings {
    fn merge(&mut self, other: StoredSettings) {
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
        if other.bg_color.is_some() {
            self.bg_color = other.bg_color;
        }
        if other.font_id.is_some() {
            self.font_id = other.font_id;
        }
    }
}

/// Active reader settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderSettings {
    /// Font size in points, always within `MIN_FONT_SIZE..=MAX_FONT_SIZE`.
    pub font_size: u32,
    /// Background theme.
    pub theme: Theme,
    /// Font family.
    pub font: Font,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            theme: Theme::default(),
            font: Font::default(),
        }
    }
}

/// Clamp a requested font size into the supported range.
pub fn clamp_font_size(size: i64) -> u32 {
    size.clamp(MIN_FONT_SIZE as i64, MAX_FONT_SIZE as i64) as u32
}

impl ReaderSettings {
    /// Load saved settings, falling back to defaults field by field.
    pub fn load(store: &LocalStore) -> Result<Self> {
        let mut settings = Self::default();
        let Some(saved) = store.get_json::<StoredSettings>(READER_SETTINGS_KEY)? else {
            return Ok(settings);
        };

        if let Some(size) = saved.font_size {
            settings.font_size = clamp_font_size(size);
        }
        if let Some(theme) = saved.bg_color.as_deref().and_then(Theme::from_background) {
            settings.theme = theme;
        }
        if let Some(font) = saved.font_id.as_deref().and_then(Font::from_id) {
            settings.font = font;
        }

        Ok(settings)
    }

    /// Set the font size (clamped) and persist it.
    pub fn set_font_size(&mut self, store: &LocalStore, size: i64) -> Result<u32> {
        self.font_size = clamp_font_size(size);
        save_partial(
            store,
            StoredSettings {
                font_size: Some(self.font_size as i64),
                ..Default::default()
            },
        )?;
        Ok(self.font_size)
    }

    /// Step the font size by `delta` (clamped) and persist it.
    pub fn adjust_font_size(&mut self, store: &LocalStore, delta: i64) -> Result<u32> {
        self.set_font_size(store, self.font_size as i64 + delta)
    }

    /// Switch theme and persist it.
    pub fn set_theme(&mut self, store: &LocalStore, theme: Theme) -> Result<()> {
        self.theme = theme;
        save_partial(
            store,
            StoredSettings {
                bg_color: Some(theme.background().to_string()),
                ..Default::default()
            },
        )
    }

    /// Switch font and persist it.
    pub fn set_font(&mut self, store: &LocalStore, font: Font) -> Result<()> {
        self.font = font;
        save_partial(
            store,
            StoredSettings {
                font_id: Some(font.id().to_string()),
                ..Default::default()
            },
        )
    }
}

fn save_partial(store: &LocalStore, update: StoredSettings) -> Result<()> {
    let mut current: StoredSettings = store.get_json(READER_SETTINGS_KEY)?.unwrap_or_default();
    current.merge(update);
    store.set_json(READER_SETTINGS_KEY, &current)?;
    tracing::debug!(?current, "Saved reader settings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_saved() {
        let store = LocalStore::open_memory().unwrap();
        let settings = ReaderSettings::load(&store).unwrap();
        assert_eq!(settings, ReaderSettings::default());
        assert_eq!(settings.font_size, 19);
        assert_eq!(settings.theme.text_color(), "#e0e0e0");
    }

    #[test]
    fn test_font_size_is_clamped() {
        let store = LocalStore::open_memory().unwrap();
        let mut settings = ReaderSettings::load(&store).unwrap();

        assert_eq!(settings.set_font_size(&store, 100).unwrap(), MAX_FONT_SIZE);
        assert_eq!(settings.adjust_font_size(&store, 2).unwrap(), MAX_FONT_SIZE);
        assert_eq!(settings.set_font_size(&store, 3).unwrap(), MIN_FONT_SIZE);
        assert_eq!(settings.adjust_font_size(&store, -1).unwrap(), MIN_FONT_SIZE);
        assert_eq!(settings.adjust_font_size(&store, 4).unwrap(), 18);
    }

    #[test]
    fn test_partial_saves_merge() {
        let store = LocalStore::open_memory().unwrap();
        let mut settings = ReaderSettings::load(&store).unwrap();

        settings.set_font_size(&store, 24).unwrap();
        settings.set_theme(&store, Theme::Light).unwrap();
        settings.set_font(&store, Font::Amiri).unwrap();

        let reloaded = ReaderSettings::load(&store).unwrap();
        assert_eq!(reloaded.font_size, 24);
        assert_eq!(reloaded.theme, Theme::Light);
        assert_eq!(reloaded.theme.text_color(), "#1a1a1a");
        assert_eq!(reloaded.font, Font::Amiri);
    }

    #[test]
    fn test_out_of_range_saved_size_is_clamped_on_load() {
        let store = LocalStore::open_memory().unwrap();
        store
            .set_raw(READER_SETTINGS_KEY, r##"{"fontSize":60,"bgColor":"#123456"}"##)
            .unwrap();

        let settings = ReaderSettings::load(&store).unwrap();
        assert_eq!(settings.font_size, MAX_FONT_SIZE);
        // Unknown colors keep the default theme.
        assert_eq!(settings.theme, Theme::Black);
    }

    #[test]
    fn test_settings_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");

        {
            let store = LocalStore::open(&path).unwrap();
            let mut settings = ReaderSettings::load(&store).unwrap();
            settings.set_font_size(&store, 28).unwrap();
        }

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(ReaderSettings::load(&store).unwrap().font_size, 28);
    }
}
