// src/raster/mod.rs
//! Пара выровненных растров: `provinces.bmp` и `terrain.bmp`
//!
//! Оба изображения разворачиваются в плоские векторы цветов одинаковой длины:
//! пиксель `k` карты провинций соответствует пикселю `k` карты рельефа
//! (индекс `y * width + x`).
//!
//! ## Запросы
//!
//! - [`RasterPair::matched_terrain`] — цвета рельефа во всех точках, где карта
//!   провинций совпадает с ключом (порядок растра сохраняется)
//! - [`RasterPair::terrain_counts`] — тот же проход, но сразу с подсчётом
//! - [`RegionIndex`] — однопроходный индекс по всем цветам провинций сразу
//!
//! Сравнение цветов строгое, без допусков: цвета провинций и палитры точные.

pub mod index;
pub mod load;

pub use index::RegionIndex;

use crate::error::{ReconcileError, Result};
use image::{Rgb, Rgba};
use std::collections::HashMap;
use std::fmt;

/// Цвет пикселя, всегда 3 канала (альфа отбрасывается при загрузке)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<Rgb<u8>> for Color {
    fn from(Rgb([r, g, b]): Rgb<u8>) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgba<u8>> for Color {
    fn from(Rgba([r, g, b, _]): Rgba<u8>) -> Self {
        Self { r, g, b }
    }
}

/// Частоты цветов рельефа внутри одной провинции
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerrainCounts {
    counts: HashMap<Color, usize>,
}

impl TerrainCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, color: Color) {
        *self.counts.entry(color).or_insert(0) += 1;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Color, usize)> + '_ {
        self.counts.iter().map(|(&c, &n)| (c, n))
    }
}

impl FromIterator<Color> for TerrainCounts {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut counts = Self::new();
        for color in iter {
            counts.add(color);
        }
        counts
    }
}

/// Источник частот рельефа по цвету провинции.
///
/// `None` означает, что цвет провинции на карте не встречается вовсе.
pub trait TerrainSampler {
    fn terrain_counts(&self, key: Color) -> Option<TerrainCounts>;
}

/// Карта провинций и карта рельефа одного размера
#[derive(Debug, Clone)]
pub struct RasterPair {
    /// Ширина обеих карт в пикселях
    pub width: u32,

    /// Высота обеих карт в пикселях
    pub height: u32,

    /// Цвета `provinces.bmp`, длина `width × height`
    pub provinces: Vec<Color>,

    /// Цвета `terrain.bmp`, длина `width × height`
    pub terrain: Vec<Color>,
}

impl RasterPair {
    /// Собирает пару из готовых плоских векторов.
    ///
    /// # Ошибки
    /// [`ReconcileError::RasterLength`], если любой из векторов не равен `width × height`.
    pub fn new(
        width: u32,
        height: u32,
        provinces: Vec<Color>,
        terrain: Vec<Color>,
    ) -> Result<Self> {
        let expected = width as usize * height as usize;
        for actual in [provinces.len(), terrain.len()] {
            if actual != expected {
                return Err(ReconcileError::RasterLength { expected, actual });
            }
        }
        Ok(Self {
            width,
            height,
            provinces,
            terrain,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.provinces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    /// Цвета рельефа во всех пикселях провинции `key`, в порядке растра.
    ///
    /// Пустой результат — провинции нет на карте.
    #[must_use]
    pub fn matched_terrain(&self, key: Color) -> Vec<Color> {
        self.matching(key).collect()
    }

    fn matching(&self, key: Color) -> impl Iterator<Item = Color> + '_ {
        self.provinces
            .iter()
            .zip(&self.terrain)
            .filter(move |&(&p, _)| p == key)
            .map(|(_, &t)| t)
    }
}

impl TerrainSampler for RasterPair {
    fn terrain_counts(&self, key: Color) -> Option<TerrainCounts> {
        let counts: TerrainCounts = self.matching(key).collect();
        (!counts.is_empty()).then_some(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Color = Color::new(10, 20, 30);
    const B: Color = Color::new(40, 50, 60);
    const PLAINS: Color = Color::new(255, 129, 66);
    const FOREST: Color = Color::new(89, 199, 85);

    fn pair() -> RasterPair {
        RasterPair::new(
            3,
            2,
            vec![A, A, B, B, A, B],
            vec![PLAINS, FOREST, FOREST, FOREST, PLAINS, PLAINS],
        )
        .unwrap()
    }

    #[test]
    fn matched_terrain_keeps_raster_order() {
        assert_eq!(pair().matched_terrain(A), vec![PLAINS, FOREST, PLAINS]);
        assert_eq!(pair().matched_terrain(B), vec![FOREST, FOREST, PLAINS]);
    }

    #[test]
    fn missing_color_yields_nothing() {
        let pair = pair();
        assert!(pair.matched_terrain(Color::new(1, 2, 3)).is_empty());
        assert_eq!(pair.terrain_counts(Color::new(1, 2, 3)), None);
    }

    #[test]
    fn comparison_is_exact() {
        assert!(pair().matched_terrain(Color::new(10, 20, 31)).is_empty());
    }

    #[test]
    fn counts_tally_matches() {
        let counts = pair().terrain_counts(A).unwrap();
        let mut tally: Vec<_> = counts.iter().collect();
        tally.sort_unstable();
        assert_eq!(tally, vec![(FOREST, 1), (PLAINS, 2)]);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = RasterPair::new(2, 2, vec![A; 4], vec![A; 3]).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::RasterLength {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn alpha_is_dropped() {
        assert_eq!(Color::from(Rgba([1, 2, 3, 0])), Color::new(1, 2, 3));
        assert_eq!(Color::from(Rgb([1, 2, 3])), Color::new(1, 2, 3));
    }
}
