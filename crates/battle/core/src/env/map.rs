use crate::state::{FloorItemId, MapSize, TilePos, UnitId};

/// Result of a budget-capped shortest-path search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathResult {
    /// Tiles from the start (possibly included) to the furthest reachable step.
    pub steps: Vec<TilePos>,
    /// Accumulated movement cost of `steps` before the mode multiplier.
    pub cost: f32,
}

impl PathResult {
    pub fn reaches(&self, target: TilePos) -> bool {
        self.steps.last() == Some(&target)
    }
}

/// Tile queries and path search.
pub trait MapOracle {
    fn size(&self) -> MapSize;

    /// Whether a unit of the given footprint and height fits through the tile.
    fn is_passable(&self, tile: TilePos, large: bool, max_height: i32) -> bool;

    /// Whether a unit of the given footprint can stand on the tile.
    fn can_stand(&self, tile: TilePos, large: bool) -> bool;

    /// Whether the tile lets units leave the battle.
    fn has_exit(&self, tile: TilePos) -> bool;

    /// Units whose body occupies the tile.
    fn units_occupying(&self, tile: TilePos) -> Vec<UnitId>;

    /// Units with any presence on the tile, including large units overlapping it.
    fn units_present(&self, tile: TilePos) -> Vec<UnitId>;

    fn floor_items(&self, tile: TilePos) -> Vec<FloorItemId>;

    /// Shortest path for `unit` from `from` towards `to`, stopping when
    /// accumulated cost would exceed `max_cost`.
    fn find_path(&self, unit: UnitId, from: TilePos, to: TilePos, max_cost: f32) -> PathResult;

    fn contains(&self, tile: TilePos) -> bool {
        self.size().contains(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_reaches_only_when_last_step_matches() {
        let target = TilePos::new(2, 0, 0);
        let path = PathResult {
            steps: vec![TilePos::new(1, 0, 0), target],
            cost: 8.0,
        };
        assert!(path.reaches(target));
        assert!(!PathResult::default().reaches(target));
    }
}
