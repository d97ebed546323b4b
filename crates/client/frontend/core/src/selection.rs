//! Ordered selection of player units.
//!
//! The front entry is the primary actor for every single-target order. The
//! set never holds more than [`MAX_SELECTION`] units and keeps insertion order:
//! the most recently touched unit moves to the front.

use arrayvec::ArrayVec;
use battle_core::UnitId;

pub const MAX_SELECTION: usize = 6;

/// How a select order treats the existing selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectFlags {
    /// Remove the unit instead of adding it.
    pub inverse: bool,
    /// Keep the other selected units.
    pub additive: bool,
}

impl SelectFlags {
    pub const REPLACE: Self = Self {
        inverse: false,
        additive: false,
    };
    pub const ADD: Self = Self {
        inverse: false,
        additive: true,
    };
    pub const REMOVE: Self = Self {
        inverse: true,
        additive: false,
    };
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    units: ArrayVec<UnitId, MAX_SELECTION>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(unit: UnitId) -> Self {
        let mut set = Self::new();
        set.units.push(unit);
        set
    }

    #[inline]
    pub fn front(&self) -> Option<UnitId> {
        self.units.first().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.units.contains(&unit)
    }

    pub fn as_slice(&self) -> &[UnitId] {
        &self.units
    }

    pub fn iter(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.iter().copied()
    }

    pub fn clear(&mut self) {
        self.units.clear();
    }

    /// Applies a select order for `unit`.
    pub fn select(&mut self, unit: UnitId, flags: SelectFlags) {
        let position = self.units.iter().position(|u| *u == unit);

        if flags.inverse {
            if let Some(index) = position {
                self.units.remove(index);
            }
            return;
        }

        match (position, flags.additive) {
            (None, true) => {
                if !self.units.is_full() {
                    self.units.insert(0, unit);
                }
            }
            (None, false) => {
                self.units.clear();
                self.units.push(unit);
            }
            (Some(index), true) => {
                self.units.remove(index);
                self.units.insert(0, unit);
            }
            (Some(_), false) => {
                let was_sole = self.units.len() == 1;
                self.units.clear();
                if !was_sole {
                    self.units.push(unit);
                }
            }
        }
    }

    /// Drops every member for which `keep` returns false. Returns the number removed.
    pub fn retain(&mut self, mut keep: impl FnMut(UnitId) -> bool) -> usize {
        let before = self.units.len();
        self.units.retain(|unit| keep(*unit));
        before - self.units.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(set: &SelectionSet) -> Vec<u32> {
        set.iter().map(|u| u.0).collect()
    }

    #[test]
    fn additive_select_pushes_to_front_until_full() {
        let mut set = SelectionSet::new();
        for id in 1..=7 {
            set.select(UnitId(id), SelectFlags::ADD);
        }
        assert_eq!(set.len(), MAX_SELECTION);
        assert_eq!(ids(&set), [6, 5, 4, 3, 2, 1]);
        assert!(!set.contains(UnitId(7)));
    }

    #[test]
    fn additive_select_of_member_moves_it_to_front() {
        let mut set = SelectionSet::single(UnitId(1));
        set.select(UnitId(2), SelectFlags::ADD);
        set.select(UnitId(3), SelectFlags::ADD);
        set.select(UnitId(1), SelectFlags::ADD);
        assert_eq!(ids(&set), [1, 3, 2]);
    }

    #[test]
    fn replacing_select_narrows_or_clears() {
        let mut set = SelectionSet::single(UnitId(1));
        set.select(UnitId(2), SelectFlags::ADD);

        set.select(UnitId(1), SelectFlags::REPLACE);
        assert_eq!(ids(&set), [1]);

        set.select(UnitId(1), SelectFlags::REPLACE);
        assert!(set.is_empty(), "sole member deselects");

        set.select(UnitId(4), SelectFlags::REPLACE);
        assert_eq!(set.front(), Some(UnitId(4)));
    }

    #[test]
    fn inverse_select_removes_only_that_unit() {
        let mut set = SelectionSet::single(UnitId(1));
        set.select(UnitId(2), SelectFlags::ADD);
        set.select(UnitId(1), SelectFlags::REMOVE);
        assert_eq!(ids(&set), [2]);
        set.select(UnitId(9), SelectFlags::REMOVE);
        assert_eq!(ids(&set), [2]);
    }

    #[test]
    fn retain_reports_removed_count() {
        let mut set = SelectionSet::single(UnitId(1));
        set.select(UnitId(2), SelectFlags::ADD);
        set.select(UnitId(3), SelectFlags::ADD);
        assert_eq!(set.retain(|u| u.0 != 2), 1);
        assert_eq!(ids(&set), [3, 1]);
    }
}
