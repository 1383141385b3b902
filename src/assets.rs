use eframe::egui;
use rust_embed::RustEmbed;
use thiserror::Error;

#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Asset;

pub const APP_ICON: &str = "icon.png";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("embedded asset '{0}' is missing")]
    Missing(String),

    #[error("failed to decode '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
}

/// Decoded RGBA8 image, the shape both the window and the tray want.
#[derive(Debug, Clone)]
pub struct RgbaIcon {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Loads an embedded image and converts it to RGBA8.
pub fn load_icon(name: &str) -> Result<RgbaIcon, AssetError> {
    let file = Asset::get(name).ok_or_else(|| AssetError::Missing(name.to_string()))?;
    let img = image::load_from_memory(&file.data)
        .map_err(|source| AssetError::Decode {
            name: name.to_string(),
            source,
        })?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(RgbaIcon {
        rgba: img.into_raw(),
        width,
        height,
    })
}

impl From<RgbaIcon> for egui::IconData {
    fn from(icon: RgbaIcon) -> Self {
        egui::IconData {
            rgba: icon.rgba,
            width: icon.width,
            height: icon.height,
        }
    }
}
