// src/terrain.rs
//! Палитра рельефа `terrain.bmp`
//!
//! Восемь типов сухопутного рельефа и их фиксированные цвета на растре.
//! Таблица неизменяемая: это часть формата карты, а не настройка.

use crate::raster::Color;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    Plains,
    Forest,
    Hills,
    Jungle,
    Marsh,
    Mountain,
    Desert,
    Urban,
}

/// Палитра `цвет → рельеф`, ровно 8 записей.
pub const PALETTE: [(Color, Terrain); 8] = [
    (Color::new(255, 129, 66), Terrain::Plains),
    (Color::new(89, 199, 85), Terrain::Forest),
    (Color::new(248, 255, 153), Terrain::Hills),
    (Color::new(127, 191, 0), Terrain::Jungle),
    (Color::new(76, 96, 35), Terrain::Marsh),
    (Color::new(124, 135, 125), Terrain::Mountain),
    (Color::new(255, 63, 0), Terrain::Desert),
    (Color::new(155, 0, 255), Terrain::Urban),
];

impl Terrain {
    /// Обратный поиск по палитре. `None` — цвет не принадлежит палитре.
    #[must_use]
    pub fn from_color(color: Color) -> Option<Self> {
        PALETTE
            .iter()
            .find(|(c, _)| *c == color)
            .map(|&(_, terrain)| terrain)
    }

    /// Метка в том виде, в котором она записана в `definition.csv`
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Terrain::Plains => "plains",
            Terrain::Forest => "forest",
            Terrain::Hills => "hills",
            Terrain::Jungle => "jungle",
            Terrain::Marsh => "marsh",
            Terrain::Mountain => "mountain",
            Terrain::Desert => "desert",
            Terrain::Urban => "urban",
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn palette_covers_each_terrain_once() {
        let colors: HashSet<Color> = PALETTE.iter().map(|&(c, _)| c).collect();
        let terrains: HashSet<Terrain> = PALETTE.iter().map(|&(_, t)| t).collect();
        assert_eq!(colors.len(), 8);
        assert_eq!(terrains.len(), 8);
    }

    #[test]
    fn palette_colors_map_back() {
        for (color, terrain) in PALETTE {
            assert_eq!(Terrain::from_color(color), Some(terrain));
        }
        assert_eq!(
            Terrain::from_color(Color::new(89, 199, 85)),
            Some(Terrain::Forest)
        );
    }

    #[test]
    fn unknown_color_is_unmapped() {
        assert_eq!(Terrain::from_color(Color::new(0, 0, 0)), None);
        assert_eq!(Terrain::from_color(Color::new(255, 129, 67)), None);
    }

    #[test]
    fn labels_match_definition_format() {
        assert_eq!(Terrain::Plains.as_str(), "plains");
        assert_eq!(Terrain::Mountain.to_string(), "mountain");
    }
}
