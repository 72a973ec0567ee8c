//! Slot - one physical material position.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::color::Color;

/// Position of a slot: 1-based unit number and 1-based index within the unit.
///
/// Ordering is by unit, then index, which is the stable order slots are
/// filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId {
    pub unit: u8,
    pub index: u8,
}

impl SlotId {
    pub const fn new(unit: u8, index: u8) -> Self {
        Self { unit, index }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.unit, self.index)
    }
}

/// A material slot and the colors loaded into it over the print.
///
/// A permanent slot holds exactly one color for the whole print. A shared
/// slot holds several colors that must be swapped by hand; normally its
/// colors are pairwise non-overlapping, see [`Slot::is_valid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    id: SlotId,
    permanent: bool,
    colors: Vec<Color>,
}

impl Slot {
    pub fn new(id: SlotId) -> Self {
        Self {
            id,
            permanent: false,
            colors: Vec::new(),
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn unit(&self) -> u8 {
        self.id.unit
    }

    pub fn index(&self) -> u8 {
        self.id.index
    }

    pub fn is_permanent(&self) -> bool {
        self.permanent
    }

    /// True when the slot holds more than one color.
    pub fn is_shared(&self) -> bool {
        self.colors.len() > 1
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn assign(&mut self, color: Color) {
        self.colors.push(color);
    }

    pub fn clear(&mut self) {
        self.colors.clear();
        self.permanent = false;
    }

    /// Marks the slot permanent if it holds exactly one color, shared otherwise.
    pub fn settle(&mut self) {
        self.permanent = self.colors.len() == 1;
    }

    /// True when no two colors in the slot overlap.
    pub fn is_valid(&self) -> bool {
        self.overlapping_pairs().next().is_none()
    }

    /// Every pair of colors in the slot whose layer spans overlap.
    pub fn overlapping_pairs(&self) -> impl Iterator<Item = (&Color, &Color)> {
        self.colors.iter().enumerate().flat_map(move |(i, a)| {
            self.colors[i + 1..]
                .iter()
                .filter(move |b| a.overlaps(b))
                .map(move |b| (a, b))
        })
    }
}
