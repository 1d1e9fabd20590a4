//! Partitioning detected regions into typed block groups.

use crate::domain::{Region, RegionType};

/// Detected regions of one page, partitioned by type.
///
/// Each group preserves the relative order of the detector's output.
/// Regions of type `Other` are dropped during partitioning; the partition is
/// exhaustive over the three recognized types only. Derived per page and
/// never mutated after creation.
#[derive(Debug, Clone, Default)]
pub struct BlockGroups {
    /// Body text regions, in detection order.
    pub text: Vec<Region>,
    /// Figure regions, in detection order.
    pub figures: Vec<Region>,
    /// Title regions, in detection order.
    pub titles: Vec<Region>,
}

impl BlockGroups {
    /// Partitions a region set into text, figure, and title groups.
    ///
    /// Single pass: each region is appended to exactly one group keyed by
    /// its type tag, in input order. Unrecognized types are dropped, which
    /// is documented behavior rather than an error.
    pub fn partition(regions: impl IntoIterator<Item = Region>) -> Self {
        let mut groups = Self::default();
        for region in regions {
            match region.region_type {
                RegionType::Text => groups.text.push(region),
                RegionType::Figure => groups.figures.push(region),
                RegionType::Title => groups.titles.push(region),
                RegionType::Other => {}
            }
        }
        groups
    }

    /// Total number of regions across the three groups.
    pub fn len(&self) -> usize {
        self.text.len() + self.figures.len() + self.titles.len()
    }

    /// Whether all three groups are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoundingBox;

    fn region(region_type: RegionType, x1: f32) -> Region {
        Region::new(
            region_type,
            BoundingBox::new(x1, 0.0, x1 + 10.0, 10.0).unwrap(),
            0.9,
        )
    }

    #[test]
    fn test_partition_is_exhaustive_over_recognized_types() {
        let regions = vec![
            region(RegionType::Text, 0.0),
            region(RegionType::Figure, 10.0),
            region(RegionType::Title, 20.0),
            region(RegionType::Text, 30.0),
        ];
        let groups = BlockGroups::partition(regions);
        assert_eq!(groups.text.len(), 2);
        assert_eq!(groups.figures.len(), 1);
        assert_eq!(groups.titles.len(), 1);
        assert_eq!(groups.len(), 4);
    }

    #[test]
    fn test_partition_preserves_input_order() {
        let regions = vec![
            region(RegionType::Title, 300.0),
            region(RegionType::Title, 100.0),
            region(RegionType::Title, 200.0),
        ];
        let groups = BlockGroups::partition(regions);
        let xs: Vec<f32> = groups.titles.iter().map(|r| r.bbox.x1).collect();
        assert_eq!(xs, vec![300.0, 100.0, 200.0]);
    }

    #[test]
    fn test_partition_drops_unrecognized_types() {
        let regions = vec![
            region(RegionType::Other, 0.0),
            region(RegionType::Figure, 10.0),
            region(RegionType::Other, 20.0),
        ];
        let groups = BlockGroups::partition(regions);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.figures.len(), 1);
    }

    #[test]
    fn test_partition_of_empty_input() {
        let groups = BlockGroups::partition(Vec::new());
        assert!(groups.is_empty());
    }
}
