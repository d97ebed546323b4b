use crate::state::{Hand, ItemView, OrgId, Relation, ScannerView, TilePos, UnitId, UnitView};

/// Unit and equipment queries.
pub trait UnitOracle {
    fn unit(&self, id: UnitId) -> Option<UnitView>;

    /// Every unit on the field, in a stable order.
    fn unit_ids(&self) -> Vec<UnitId>;

    fn hand_item(&self, unit: UnitId, hand: Hand) -> Option<ItemView>;

    /// Whether the item in `hand` can reach `target` at all.
    fn can_fire_at(&self, unit: UnitId, hand: Hand, target: TilePos) -> bool;

    /// Time units an attack with `hand` at `target` would cost.
    fn attack_cost(&self, unit: UnitId, hand: Hand, target: TilePos) -> i32;

    /// Whether `unit` has an unobstructed line of fire to `target`.
    fn has_line_to_unit(&self, unit: UnitId, target: UnitId) -> bool;

    /// Visibility set lookup keyed by (observer organisation, unit).
    fn is_visible_to(&self, observer: OrgId, unit: UnitId) -> bool;

    fn relation(&self, from: OrgId, to: OrgId) -> Relation;

    /// Real-time scanner state for an in-use scanner item.
    fn scanner(&self, unit: UnitId, hand: Hand) -> Option<ScannerView>;
}
