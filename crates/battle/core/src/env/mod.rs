//! Oracle and command surfaces the interaction layer requires from the simulation.
//!
//! Queries are split by concern the same way the simulation splits its state:
//! units, map, turn control. Commands go through [`CommandSink`]; cheat hooks
//! live on the separate [`DebugCommands`] trait so production builds of a
//! simulation may implement them as no-ops.
mod commands;
mod map;
mod turn;
mod units;

pub use commands::{CommandError, CommandSink, DebugCommands, KillScope, MoveOrder, Priming};
pub use map::{MapOracle, PathResult};
pub use turn::TurnOracle;
pub use units::UnitOracle;

use crate::state::{OrgId, UnitId, UnitView};

/// Everything the battle view needs from a running battle.
///
/// Blanket-implemented for any type providing all the parts.
pub trait Simulation: UnitOracle + MapOracle + TurnOracle + CommandSink + DebugCommands {
    /// Units of `org` in the simulation's stable order.
    fn units_of(&self, org: OrgId) -> Vec<UnitView> {
        self.unit_ids()
            .into_iter()
            .filter_map(|id| self.unit(id))
            .filter(|unit| unit.owner == org)
            .collect()
    }

    /// Snapshot of a unit if the local player may still give it orders.
    fn controllable_unit(&self, id: UnitId) -> Option<UnitView> {
        let player = self.current_player();
        self.unit(id)
            .filter(|unit| unit.is_controllable_by(player))
    }
}

impl<T> Simulation for T where T: UnitOracle + MapOracle + TurnOracle + CommandSink + DebugCommands
{}
