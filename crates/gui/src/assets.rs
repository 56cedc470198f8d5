//! Particle sprite loading.
//!
//! Sprites are single-channel alpha maps read from PNG files. A missing or
//! broken file is never fatal: the caller gets a procedural soft disc instead.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Single-channel 8-bit texture used as the alpha of a point sprite
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaMap {
    pub width: u32,
    pub height: u32,
    /// Row-major, one byte per texel
    pub texels: Vec<u8>,
}

impl AlphaMap {
    /// Radial falloff: opaque in the middle, transparent at the edge.
    pub fn soft_disc(size: u32) -> Self {
        let size = size.max(2);
        let half = size as f32 * 0.5;
        let mut texels = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 + 0.5 - half) / half;
                let dy = (y as f32 + 0.5 - half) / half;
                let d = (dx * dx + dy * dy).sqrt();
                let a = (1.0 - d).clamp(0.0, 1.0);
                texels.push((a * a * 255.0).round() as u8);
            }
        }
        Self {
            width: size,
            height: size,
            texels,
        }
    }

    pub fn texel(&self, x: u32, y: u32) -> u8 {
        self.texels[(y * self.width + x) as usize]
    }
}

/// Decode a PNG in memory. The green channel becomes the alpha,
/// matching how GL alpha maps are sampled.
pub fn alpha_map_from_memory(bytes: &[u8]) -> Result<AlphaMap, AssetError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let texels = rgba.pixels().map(|p| p.0[1]).collect();
    Ok(AlphaMap {
        width,
        height,
        texels,
    })
}

pub fn load_alpha_map(path: &Path) -> Result<AlphaMap, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    alpha_map_from_memory(&bytes)
}

/// `<dir>/textures/particles/<theme>.png`
pub fn theme_path(asset_dir: &Path, theme: u8) -> PathBuf {
    asset_dir
        .join("textures")
        .join("particles")
        .join(format!("{theme}.png"))
}

/// Load a particle theme, degrading to the procedural sprite on failure.
pub fn load_theme_or_fallback(asset_dir: &Path, theme: u8) -> AlphaMap {
    let path = theme_path(asset_dir, theme);
    match load_alpha_map(&path) {
        Ok(map) => {
            tracing::info!("Loaded particle theme {theme} ({}x{})", map.width, map.height);
            map
        }
        Err(e) => {
            tracing::warn!("Particle theme {theme} unavailable, using fallback sprite: {e}");
            AlphaMap::soft_disc(32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(img: &image::RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_soft_disc_shape() {
        let map = AlphaMap::soft_disc(32);
        assert_eq!(map.texels.len(), 32 * 32);
        assert!(map.texel(16, 16) > 200);
        assert_eq!(map.texel(0, 0), 0);
        assert_eq!(map.texel(31, 31), 0);
    }

    #[test]
    fn test_decode_takes_green_channel() {
        let img = image::RgbaImage::from_fn(4, 2, |x, _| image::Rgba([0, (x * 60) as u8, 255, 255]));
        let map = alpha_map_from_memory(&encode_png(&img)).unwrap();
        assert_eq!((map.width, map.height), (4, 2));
        assert_eq!(map.texel(3, 1), 180);
        assert_eq!(map.texel(0, 0), 0);
    }

    #[test]
    fn test_corrupt_bytes_rejected() {
        let err = alpha_map_from_memory(b"definitely not a png").unwrap_err();
        assert!(matches!(err, AssetError::Decode(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = Path::new("/nonexistent/scene-demos-assets");
        let err = load_alpha_map(&theme_path(dir, 3)).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));

        let map = load_theme_or_fallback(dir, 3);
        assert_eq!(map, AlphaMap::soft_disc(32));
    }

    #[test]
    fn test_theme_path_layout() {
        let p = theme_path(Path::new("assets"), 7);
        assert!(p.ends_with("textures/particles/7.png"));
    }
}
