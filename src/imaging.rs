//! 画像ファイルとdata URIの変換・縮小

use crate::error::{Result, WardrobeError};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::path::Path;
use wardrobe_ai_common::media::{mime_type_for_extension, InlineImage, DEFAULT_MIME_TYPE};

/// 画像ファイルをdata URIとして読み込む（MIMEタイプは拡張子から判定）
pub fn load_image_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(WardrobeError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let mime_type = path
        .extension()
        .and_then(|ext| mime_type_for_extension(&ext.to_string_lossy()))
        .unwrap_or(DEFAULT_MIME_TYPE);

    Ok(InlineImage::new(mime_type, STANDARD.encode(bytes)).to_data_uri())
}

/// data URIの画像をファイルに書き出す
pub fn write_image_file(path: &Path, data_uri: &str) -> Result<()> {
    let inline = InlineImage::parse(data_uri);
    let bytes = STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|e| WardrobeError::ImageLoad(format!("Base64デコード失敗: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// 画像を長辺 `max_side` 以内に縮小してJPEG化
///
/// デコードやエンコードに失敗した場合は元の画像をそのまま返す。
pub fn compress_image(data_uri: &str, max_side: u32, quality: u8) -> String {
    match try_compress(data_uri, max_side, quality) {
        Ok(compressed) => compressed,
        Err(e) => {
            tracing::warn!(error = %e, "画像の縮小に失敗したため元画像を使用します");
            data_uri.to_string()
        }
    }
}

fn try_compress(data_uri: &str, max_side: u32, quality: u8) -> Result<String> {
    let inline = InlineImage::parse(data_uri);
    let bytes = STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|e| WardrobeError::ImageLoad(format!("Base64デコード失敗: {}", e)))?;

    let img = image::load_from_memory(&bytes)
        .map_err(|e| WardrobeError::ImageLoad(e.to_string()))?;

    let (width, height) = fit_within(img.width(), img.height(), max_side);
    let resized = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Triangle)
    };

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    resized
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| WardrobeError::ImageLoad(e.to_string()))?;

    Ok(InlineImage::new("image/jpeg", STANDARD.encode(out)).to_data_uri())
}

/// 長辺を `max_side` に収めた寸法（アスペクト比維持、拡大はしない）
fn fit_within(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let scale = |short: u32, long: u32| -> u32 {
        let scaled = (short as f64 * max_side as f64 / long as f64).round() as u32;
        scaled.max(1)
    };

    if width > height {
        if width > max_side {
            return (max_side, scale(height, width));
        }
    } else if height > max_side {
        return (scale(width, height), max_side);
    }
    (width, height)
}
