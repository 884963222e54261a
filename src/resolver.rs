// src/resolver.rs
//! Определение рельефа провинции голосованием большинства
//!
//! ## Алгоритм
//!
//! 1. Берём частоты цветов `terrain.bmp` внутри провинции ([`TerrainSampler`])
//! 2. Провинции нет на карте → [`Resolution::RegionNotFound`]
//! 3. Находим максимальную частоту и все цвета, которые её достигают
//! 4. Один цвет — победитель; несколько — случайный выбор среди равных
//! 5. Победивший цвет переводим в рельеф по палитре; вне палитры →
//!    [`Resolution::UnmappedColor`]
//!
//! Ничья разыгрывается по сырым цветам растра, до перевода в метки: ничья
//! между цветом палитры и посторонним цветом решается так же, как между
//! двумя цветами палитры.
//!
//! Генератор случайных чисел передаётся снаружи. Кандидаты сортируются перед
//! выбором, так что при одинаковом сиде результат не зависит от порядка обхода
//! `HashMap`.

use crate::raster::{Color, TerrainCounts, TerrainSampler};
use crate::terrain::Terrain;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

/// Итог определения рельефа одной провинции
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Рельеф определён
    Resolved(Terrain),
    /// Цвет провинции не встречается на карте провинций
    RegionNotFound,
    /// Преобладающий цвет рельефа отсутствует в палитре
    UnmappedColor(Color),
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Resolved(terrain) => write!(f, "{terrain}"),
            Resolution::RegionNotFound => f.write_str("undetermined: region not found"),
            Resolution::UnmappedColor(color) => {
                write!(f, "undetermined: unmapped terrain color {color}")
            }
        }
    }
}

/// Определяет рельеф провинции цвета `key`.
pub fn resolve_terrain<S, R>(sampler: &S, key: Color, rng: &mut R) -> Resolution
where
    S: TerrainSampler + ?Sized,
    R: Rng + ?Sized,
{
    match sampler.terrain_counts(key) {
        Some(counts) => resolve_counts(&counts, rng),
        None => Resolution::RegionNotFound,
    }
}

/// Голосование и перевод по палитре для готовых частот.
///
/// Пустые частоты трактуются как отсутствие провинции.
pub fn resolve_counts<R: Rng + ?Sized>(counts: &TerrainCounts, rng: &mut R) -> Resolution {
    match majority_color(counts, rng) {
        None => Resolution::RegionNotFound,
        Some(color) => Terrain::from_color(color).map_or(
            Resolution::UnmappedColor(color),
            Resolution::Resolved,
        ),
    }
}

/// Самый частый цвет; при равенстве — случайный из лидеров.
pub fn majority_color<R: Rng + ?Sized>(counts: &TerrainCounts, rng: &mut R) -> Option<Color> {
    let max = counts.iter().map(|(_, n)| n).max()?;
    let mut leaders: Vec<Color> = counts
        .iter()
        .filter(|&(_, n)| n == max)
        .map(|(c, _)| c)
        .collect();

    if leaders.len() == 1 {
        return leaders.pop();
    }
    leaders.sort_unstable();
    leaders.choose(rng).copied()
}
