//! Option tags and their group membership.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One user-toggleable transform.
///
/// The declaration order is the canonical order used by active-option sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionTag {
    Rotate90,
    Rotate180,
    Rotate270,
    RotateCustom,
    FlipHorizontal,
    FlipVertical,
    VolumeUp50,
    VolumeUp25,
    VolumeDown25,
    VolumeDown50,
    StereoToMono,
    Mute,
}

/// Exclusivity class over a subset of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Group {
    /// At most one rotation at a time
    Rotation,
    /// Independent horizontal / vertical toggles
    Flip,
    /// Stackable gain steps sharing one direction
    VolumeDirection,
    /// Stereo-to-mono or mute, never both
    BigAudio,
}

impl Group {
    /// Members of this group, in canonical order.
    pub fn members(&self) -> &'static [OptionTag] {
        use OptionTag::*;
        match self {
            Group::Rotation => &[Rotate90, Rotate180, Rotate270, RotateCustom],
            Group::Flip => &[FlipHorizontal, FlipVertical],
            Group::VolumeDirection => &[VolumeUp50, VolumeUp25, VolumeDown25, VolumeDown50],
            Group::BigAudio => &[StereoToMono, Mute],
        }
    }

    /// All groups.
    pub fn all() -> &'static [Group] {
        &[Group::Rotation, Group::Flip, Group::VolumeDirection, Group::BigAudio]
    }
}

/// Sign of a volume step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Fixed rotations plus the parametric one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationKind {
    Quarter,
    Half,
    ThreeQuarter,
    Custom,
}

/// Mutually exclusive audio modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMode {
    StereoToMono,
    Mute,
}

/// A single gain step within the volume-direction group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VolumeStep {
    Up50,
    Up25,
    Down25,
    Down50,
}

impl VolumeStep {
    pub fn direction(&self) -> Direction {
        match self {
            VolumeStep::Up50 | VolumeStep::Up25 => Direction::Up,
            VolumeStep::Down25 | VolumeStep::Down50 => Direction::Down,
        }
    }

    /// Gain contribution in decibels.
    pub fn gain_db(&self) -> i32 {
        match self {
            VolumeStep::Up50 => 12,
            VolumeStep::Up25 => 6,
            VolumeStep::Down25 => -6,
            VolumeStep::Down50 => -12,
        }
    }

    pub fn tag(&self) -> OptionTag {
        match self {
            VolumeStep::Up50 => OptionTag::VolumeUp50,
            VolumeStep::Up25 => OptionTag::VolumeUp25,
            VolumeStep::Down25 => OptionTag::VolumeDown25,
            VolumeStep::Down50 => OptionTag::VolumeDown50,
        }
    }
}

impl RotationKind {
    pub fn tag(&self) -> OptionTag {
        match self {
            RotationKind::Quarter => OptionTag::Rotate90,
            RotationKind::Half => OptionTag::Rotate180,
            RotationKind::ThreeQuarter => OptionTag::Rotate270,
            RotationKind::Custom => OptionTag::RotateCustom,
        }
    }
}

impl AudioMode {
    pub fn tag(&self) -> OptionTag {
        match self {
            AudioMode::StereoToMono => OptionTag::StereoToMono,
            AudioMode::Mute => OptionTag::Mute,
        }
    }
}

/// Role of an option, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionRole {
    Rotation(RotationKind),
    FlipHorizontal,
    FlipVertical,
    Volume(VolumeStep),
    Audio(AudioMode),
}

impl OptionTag {
    /// All tags in canonical order.
    pub fn all() -> &'static [OptionTag] {
        use OptionTag::*;
        &[
            Rotate90,
            Rotate180,
            Rotate270,
            RotateCustom,
            FlipHorizontal,
            FlipVertical,
            VolumeUp50,
            VolumeUp25,
            VolumeDown25,
            VolumeDown50,
            StereoToMono,
            Mute,
        ]
    }

    /// Stable tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionTag::Rotate90 => "rotate90",
            OptionTag::Rotate180 => "rotate180",
            OptionTag::Rotate270 => "rotate270",
            OptionTag::RotateCustom => "rotateCustom",
            OptionTag::FlipHorizontal => "flipHorizontal",
            OptionTag::FlipVertical => "flipVertical",
            OptionTag::VolumeUp50 => "volumeUp50",
            OptionTag::VolumeUp25 => "volumeUp25",
            OptionTag::VolumeDown25 => "volumeDown25",
            OptionTag::VolumeDown50 => "volumeDown50",
            OptionTag::StereoToMono => "stereoToMono",
            OptionTag::Mute => "mute",
        }
    }

    pub fn role(&self) -> OptionRole {
        match self {
            OptionTag::Rotate90 => OptionRole::Rotation(RotationKind::Quarter),
            OptionTag::Rotate180 => OptionRole::Rotation(RotationKind::Half),
            OptionTag::Rotate270 => OptionRole::Rotation(RotationKind::ThreeQuarter),
            OptionTag::RotateCustom => OptionRole::Rotation(RotationKind::Custom),
            OptionTag::FlipHorizontal => OptionRole::FlipHorizontal,
            OptionTag::FlipVertical => OptionRole::FlipVertical,
            OptionTag::VolumeUp50 => OptionRole::Volume(VolumeStep::Up50),
            OptionTag::VolumeUp25 => OptionRole::Volume(VolumeStep::Up25),
            OptionTag::VolumeDown25 => OptionRole::Volume(VolumeStep::Down25),
            OptionTag::VolumeDown50 => OptionRole::Volume(VolumeStep::Down50),
            OptionTag::StereoToMono => OptionRole::Audio(AudioMode::StereoToMono),
            OptionTag::Mute => OptionRole::Audio(AudioMode::Mute),
        }
    }

    pub fn group(&self) -> Group {
        match self.role() {
            OptionRole::Rotation(_) => Group::Rotation,
            OptionRole::FlipHorizontal | OptionRole::FlipVertical => Group::Flip,
            OptionRole::Volume(_) => Group::VolumeDirection,
            OptionRole::Audio(_) => Group::BigAudio,
        }
    }

    /// Short label shown on the option's button.
    pub fn display_name(&self) -> &'static str {
        match self {
            OptionTag::Rotate90 => "Rotate 90°",
            OptionTag::Rotate180 => "Rotate 180°",
            OptionTag::Rotate270 => "Rotate 270°",
            OptionTag::RotateCustom => "Rotate custom",
            OptionTag::FlipHorizontal => "Flip horizontal",
            OptionTag::FlipVertical => "Flip vertical",
            OptionTag::VolumeUp50 => "Volume +50%",
            OptionTag::VolumeUp25 => "Volume +25%",
            OptionTag::VolumeDown25 => "Volume −25%",
            OptionTag::VolumeDown50 => "Volume −50%",
            OptionTag::StereoToMono => "Stereo → Mono",
            OptionTag::Mute => "Mute",
        }
    }
}

impl fmt::Display for OptionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a tag string names no option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown option tag: {0}")]
pub struct UnknownTag(pub String);

impl FromStr for OptionTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionTag::all()
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_string_round_trip() {
        for tag in OptionTag::all() {
            assert_eq!(tag.as_str().parse::<OptionTag>(), Ok(*tag));
        }
        assert!("rotate45".parse::<OptionTag>().is_err());
    }

    #[test]
    fn test_every_tag_belongs_to_exactly_one_group() {
        for tag in OptionTag::all() {
            let owners: Vec<_> = Group::all()
                .iter()
                .filter(|g| g.members().contains(tag))
                .collect();
            assert_eq!(owners, vec![&tag.group()]);
        }
    }

    #[test]
    fn test_volume_gain_table() {
        assert_eq!(VolumeStep::Up50.gain_db(), 12);
        assert_eq!(VolumeStep::Up25.gain_db(), 6);
        assert_eq!(VolumeStep::Down25.gain_db(), -6);
        assert_eq!(VolumeStep::Down50.gain_db(), -12);
        assert_eq!(VolumeStep::Up25.direction().opposite(), Direction::Down);
    }
}
