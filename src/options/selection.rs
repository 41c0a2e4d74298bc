//! Per-group selection state machines.

use std::collections::BTreeSet;

use super::tags::{Direction, VolumeStep};

/// None or exactly one member selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusive<T> {
    None,
    One(T),
}

impl<T> Default for Exclusive<T> {
    fn default() -> Self {
        Exclusive::None
    }
}

impl<T: Copy + PartialEq> Exclusive<T> {
    /// Clicking the selected member clears the group, any other member replaces it.
    pub fn toggle(&mut self, member: T) {
        *self = match *self {
            Exclusive::One(current) if current == member => Exclusive::None,
            _ => Exclusive::One(member),
        };
    }

    pub fn select(&mut self, member: T) {
        *self = Exclusive::One(member);
    }

    pub fn clear(&mut self) {
        *self = Exclusive::None;
    }

    pub fn current(&self) -> Option<T> {
        match *self {
            Exclusive::None => None,
            Exclusive::One(member) => Some(member),
        }
    }

    pub fn is(&self, member: T) -> bool {
        self.current() == Some(member)
    }
}

/// Volume steps that all share one direction.
///
/// `Stacked` never holds an empty set; removing the last step returns to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Directional {
    #[default]
    Idle,
    Stacked {
        direction: Direction,
        steps: BTreeSet<VolumeStep>,
    },
}

impl Directional {
    pub fn toggle(&mut self, step: VolumeStep) {
        let direction = step.direction();
        match self {
            Directional::Stacked { direction: current, steps } if *current == direction => {
                if !steps.remove(&step) {
                    steps.insert(step);
                } else if steps.is_empty() {
                    *self = Directional::Idle;
                }
            }
            // Idle, or the opposite direction is active: start over with this step alone.
            _ => {
                *self = Directional::Stacked {
                    direction,
                    steps: BTreeSet::from([step]),
                };
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Directional::Idle;
    }

    pub fn steps(&self) -> impl Iterator<Item = VolumeStep> + '_ {
        let steps = match self {
            Directional::Idle => None,
            Directional::Stacked { steps, .. } => Some(steps.iter().copied()),
        };
        steps.into_iter().flatten()
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Directional::Idle => None,
            Directional::Stacked { direction, .. } => Some(*direction),
        }
    }

    pub fn contains(&self, step: VolumeStep) -> bool {
        self.steps().any(|s| s == step)
    }
}

/// Independent flip toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flips {
    pub horizontal: bool,
    pub vertical: bool,
}
