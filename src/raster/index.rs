// src/raster/index.rs
use crate::raster::{Color, RasterPair, TerrainCounts, TerrainSampler};
use std::collections::HashMap;

/// Предрассчитанные частоты рельефа для всех цветов провинций.
///
/// Строится за один проход по растрам вместо прохода на каждую провинцию.
/// Ответы совпадают с [`RasterPair::terrain_counts`].
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    regions: HashMap<Color, TerrainCounts>,
}

impl RegionIndex {
    #[must_use]
    pub fn build(rasters: &RasterPair) -> Self {
        let mut regions: HashMap<Color, TerrainCounts> = HashMap::new();
        for (&province, &terrain) in rasters.provinces.iter().zip(&rasters.terrain) {
            regions.entry(province).or_default().add(terrain);
        }
        Self { regions }
    }

    /// Число различных цветов провинций на карте
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl TerrainSampler for RegionIndex {
    fn terrain_counts(&self, key: Color) -> Option<TerrainCounts> {
        self.regions.get(&key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_agrees_with_scan() {
        let a = Color::new(1, 1, 1);
        let b = Color::new(2, 2, 2);
        let c = Color::new(3, 3, 3);
        let t1 = Color::new(255, 129, 66);
        let t2 = Color::new(0, 0, 0);
        let rasters = RasterPair::new(
            4,
            2,
            vec![a, b, a, c, c, a, b, a],
            vec![t1, t2, t2, t1, t1, t1, t2, t2],
        )
        .unwrap();

        let index = RegionIndex::build(&rasters);
        assert_eq!(index.len(), 3);
        for key in [a, b, c, Color::new(9, 9, 9)] {
            assert_eq!(index.terrain_counts(key), rasters.terrain_counts(key));
        }
    }

    #[test]
    fn empty_rasters_give_empty_index() {
        let rasters = RasterPair::new(0, 0, Vec::new(), Vec::new()).unwrap();
        assert!(RegionIndex::build(&rasters).is_empty());
    }
}
