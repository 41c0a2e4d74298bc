//! Option State Model
//!
//! Tracks which transform options are active and keeps the group rules intact:
//! one rotation at most, one of mono/mute at most, volume steps stacking in a
//! single direction, and mute clearing the volume group.

mod selection;
mod state;
mod tags;

pub use selection::{Directional, Exclusive, Flips};
pub use state::{parse_angle, OptionSnapshot, OptionState};
pub use tags::{
    AudioMode, Direction, Group, OptionRole, OptionTag, RotationKind, UnknownTag, VolumeStep,
};
