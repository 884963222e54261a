// src/raster/load.rs
//! Загрузка растров с диска
//!
//! Любой формат, который декодирует `image` (на практике BMP и PNG), приводится
//! к RGB: альфа-канал отбрасывается, поэтому 3- и 4-канальные файлы дают
//! одинаковые цвета. Размеры карт сверяются до любой обработки провинций.

use crate::error::{ReconcileError, Result};
use crate::raster::{Color, RasterPair};
use image::RgbImage;
use log::{debug, info};
use std::path::Path;

impl RasterPair {
    /// Строит пару из двух декодированных изображений.
    ///
    /// # Ошибки
    /// [`ReconcileError::RasterSizeMismatch`], если размеры изображений различаются.
    pub fn from_images(provinces: &RgbImage, terrain: &RgbImage) -> Result<Self> {
        if provinces.dimensions() != terrain.dimensions() {
            return Err(ReconcileError::RasterSizeMismatch {
                provinces_width: provinces.width(),
                provinces_height: provinces.height(),
                terrain_width: terrain.width(),
                terrain_height: terrain.height(),
            });
        }

        Self::new(
            provinces.width(),
            provinces.height(),
            flatten(provinces),
            flatten(terrain),
        )
    }

    /// Открывает `provinces.bmp` и `terrain.bmp`.
    ///
    /// # Ошибки
    /// - файл не найден или не декодируется;
    /// - размеры карт различаются.
    pub fn open(provinces_path: &Path, terrain_path: &Path) -> Result<Self> {
        let provinces = load_rgb(provinces_path)?;
        let terrain = load_rgb(terrain_path)?;
        let pair = Self::from_images(&provinces, &terrain)?;
        info!(
            "🗺  Растры загружены: {}×{} ({} пикселей)",
            pair.width,
            pair.height,
            pair.len()
        );
        Ok(pair)
    }
}

fn flatten(img: &RgbImage) -> Vec<Color> {
    img.pixels().map(|&p| Color::from(p)).collect()
}

fn load_rgb(path: &Path) -> Result<RgbImage> {
    debug!("Чтение изображения {}", path.display());
    Ok(image::open(path)?.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn images_flatten_row_major() {
        let mut provinces = RgbImage::new(2, 2);
        provinces.put_pixel(1, 0, Rgb([1, 2, 3]));
        provinces.put_pixel(0, 1, Rgb([4, 5, 6]));
        let terrain = RgbImage::from_pixel(2, 2, Rgb([255, 129, 66]));

        let pair = RasterPair::from_images(&provinces, &terrain).unwrap();
        assert_eq!(pair.provinces[1], Color::new(1, 2, 3));
        assert_eq!(pair.provinces[2], Color::new(4, 5, 6));
        assert_eq!(pair.terrain.len(), 4);
    }

    #[test]
    fn different_dimensions_are_fatal() {
        let provinces = RgbImage::new(4, 2);
        let terrain = RgbImage::new(2, 4);
        let err = RasterPair::from_images(&provinces, &terrain).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::RasterSizeMismatch {
                provinces_width: 4,
                terrain_width: 2,
                ..
            }
        ));
    }
}
