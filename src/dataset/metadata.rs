use std::path::Path;

use image::{ImageDecoder, ImageReader};
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub size_bytes: u64,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub num_channels: u8,
}

impl ImageMetadata {
    /// Read file size and image header. Pixel data is not decoded.
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let size_bytes = std::fs::metadata(path)
            .map_err(|e| DatasetError::io(path, e))?
            .len();

        let header_err = |e: image::ImageError| {
            DatasetError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
        };

        let decoder = ImageReader::open(path)
            .map_err(|e| DatasetError::io(path, e))?
            .with_guessed_format()
            .map_err(|e| DatasetError::io(path, e))?
            .into_decoder()
            .map_err(header_err)?;

        let (width, height) = decoder.dimensions();
        let num_channels = decoder.color_type().channel_count();

        Ok(Self {
            size_bytes,
            mime_type: mime_type(path).to_string(),
            width,
            height,
            num_channels,
        })
    }
}

pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
