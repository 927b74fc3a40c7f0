// SPDX-License-Identifier: Apache-2.0
//! The still itself: slots, facing, and port addressing.
use crate::stock::Stock;

/// Indices of the three cradle slots holding phials.
pub const CRADLE_SLOTS: [usize; 3] = [0, 1, 2];
/// Index of the perch slot holding the next reagent.
pub const PERCH_SLOT: usize = 3;
/// Index of the firebox slot feeding the burner. Never exposed on a port.
pub const FIREBOX_SLOT: usize = 4;
/// Port slot order: the perch first, then the cradles left to right.
pub const PORT_SLOTS: [usize; 4] = [PERCH_SLOT, 0, 1, 2];

/// Cardinal facing of a placed still.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heading {
    /// The default placement.
    #[default]
    North,
    /// A quarter turn clockwise from north.
    East,
    /// Opposite the default placement.
    South,
    /// A quarter turn anticlockwise from north.
    West,
}

impl Heading {
    /// The facing after a quarter turn clockwise.
    #[must_use]
    pub fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// The face the device front points out of.
    #[must_use]
    pub fn face(self) -> Face {
        match self {
            Self::North => Face::North,
            Self::East => Face::East,
            Self::South => Face::South,
            Self::West => Face::West,
        }
    }
}

/// The six faces a port can sit behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Face {
    /// The north side.
    North,
    /// The east side.
    East,
    /// The south side.
    South,
    /// The west side.
    West,
    /// The top.
    Up,
    /// The bottom.
    Down,
}

/// One addressable slot behind a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StillTarget {
    /// The face the port sits behind.
    pub face: Face,
    /// The slot the port addresses.
    pub slot: usize,
}

/// A five-slot still.
///
/// Three cradles hold phials, the perch holds the next reagent, and the
/// firebox feeds the burner. The firebox is internal; port addressing never
/// reaches it.
#[derive(Clone, Debug, Default)]
pub struct Still {
    slots: [Stock; 5],
    facing: Heading,
}

impl Still {
    /// An empty still facing north.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current facing.
    #[must_use]
    pub fn facing(&self) -> Heading {
        self.facing
    }

    /// Turns the still a quarter turn clockwise.
    pub fn rotate(&mut self) {
        self.facing = self.facing.clockwise();
    }

    /// The stock in `index`, or `None` for an index the still does not have.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&Stock> {
        self.slots.get(index)
    }

    /// Puts `stock` into `index` and returns what it displaced, or `None`
    /// for an index the still does not have.
    pub fn load(&mut self, index: usize, stock: Stock) -> Option<Stock> {
        let slot = self.slots.get_mut(index)?;
        Some(std::mem::replace(slot, stock))
    }

    /// Empties `index` and returns its stock, or `None` for an index the
    /// still does not have.
    pub fn take(&mut self, index: usize) -> Option<Stock> {
        let slot = self.slots.get_mut(index)?;
        Some(std::mem::take(slot))
    }
}
