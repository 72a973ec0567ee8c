//! Neighbor moves over a color-to-slot assignment.

use rand::Rng;
use smallvec::{smallvec, SmallVec};

/// Chance of proposing a change move rather than a swap move.
const CHANGE_MOVE_PROBABILITY: f64 = 0.7;

/// Attempts at drawing a slot different from the current one.
const CHANGE_MOVE_RETRIES: usize = 10;

/// A neighbor of the current assignment.
///
/// Slot numbers are 1-based, color indices refer to the optimizer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnealingMove {
    /// Move one color to another slot.
    Change { color: usize, from: usize, to: usize },
    /// Exchange the slots of two colors.
    Swap { first: usize, second: usize },
    /// No neighbor could be drawn; the assignment stays as is.
    Unchanged,
}

impl AnnealingMove {
    /// Draws a random neighbor of `assignment`.
    ///
    /// With probability 0.7 a random color is moved to a random other slot
    /// (giving up after 10 draws that hit its current slot). Otherwise two
    /// distinct random colors exchange slots.
    pub fn propose<R: Rng + ?Sized>(assignment: &[usize], max_slots: usize, rng: &mut R) -> Self {
        let n = assignment.len();
        if n == 0 {
            return Self::Unchanged;
        }

        if rng.random_bool(CHANGE_MOVE_PROBABILITY) {
            let color = rng.random_range(0..n);
            let from = assignment[color];
            for _ in 0..CHANGE_MOVE_RETRIES {
                let to = rng.random_range(1..=max_slots);
                if to != from {
                    return Self::Change { color, from, to };
                }
            }
            Self::Unchanged
        } else {
            if n < 2 {
                return Self::Unchanged;
            }
            let first = rng.random_range(0..n);
            let mut second = rng.random_range(0..n - 1);
            if second >= first {
                second += 1;
            }
            Self::Swap { first, second }
        }
    }

    /// Slots whose contents change, 1-based.
    pub fn touched_slots(&self, assignment: &[usize]) -> SmallVec<[usize; 2]> {
        match *self {
            Self::Change { from, to, .. } => smallvec![from, to],
            Self::Swap { first, second } if assignment[first] != assignment[second] => {
                smallvec![assignment[first], assignment[second]]
            }
            _ => SmallVec::new(),
        }
    }

    /// Applies the move to `assignment`.
    pub fn apply(&self, assignment: &mut [usize]) {
        match *self {
            Self::Change { color, to, .. } => assignment[color] = to,
            Self::Swap { first, second } => assignment.swap(first, second),
            Self::Unchanged => {}
        }
    }

    /// Reverts a previously applied move.
    pub fn undo(&self, assignment: &mut [usize]) {
        match *self {
            Self::Change { color, from, .. } => assignment[color] = from,
            Self::Swap { first, second } => assignment.swap(first, second),
            Self::Unchanged => {}
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Change { .. } => "change",
            Self::Swap { .. } => "swap",
            Self::Unchanged => "unchanged",
        }
    }
}
