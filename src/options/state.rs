//! The session's option state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::selection::{Directional, Exclusive, Flips};
use super::tags::{AudioMode, Group, OptionRole, OptionTag, RotationKind};
use crate::error::OptionError;

/// Immutable copy of the active options, taken when a render starts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionSnapshot {
    /// Active tags in canonical order
    pub active: BTreeSet<OptionTag>,
    /// Custom angle in degrees, present only while `rotateCustom` is active
    pub custom_angle: Option<f64>,
}

impl OptionSnapshot {
    pub fn is_active(&self, tag: OptionTag) -> bool {
        self.active.contains(&tag)
    }

    /// Active tags within one group.
    pub fn active_in(&self, group: Group) -> BTreeSet<OptionTag> {
        group
            .members()
            .iter()
            .copied()
            .filter(|tag| self.active.contains(tag))
            .collect()
    }
}

/// Toggle state for every option, with the group rules enforced after each change.
///
/// Created once per session and only ever mutated.
#[derive(Debug, Clone, Default)]
pub struct OptionState {
    rotation: Exclusive<RotationKind>,
    flips: Flips,
    volume: Directional,
    audio: Exclusive<AudioMode>,
    /// Survives toggling `rotateCustom` off and on again
    custom_angle: f64,
}

impl OptionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle an option by its tag string. Unknown tags are ignored.
    pub fn toggle(&mut self, tag: &str) -> BTreeSet<OptionTag> {
        match tag.parse::<OptionTag>() {
            Ok(tag) => self.toggle_option(tag),
            Err(e) => {
                log::debug!("{}", e);
                self.active_set()
            }
        }
    }

    /// Toggle an option and restore the group invariants.
    pub fn toggle_option(&mut self, tag: OptionTag) -> BTreeSet<OptionTag> {
        match tag.role() {
            OptionRole::Rotation(kind) => self.rotation.toggle(kind),
            OptionRole::FlipHorizontal => self.flips.horizontal = !self.flips.horizontal,
            OptionRole::FlipVertical => self.flips.vertical = !self.flips.vertical,
            // The whole volume group is disabled while muted.
            OptionRole::Volume(_) if self.is_muted() => {}
            OptionRole::Volume(step) => self.volume.toggle(step),
            OptionRole::Audio(mode) => self.audio.toggle(mode),
        }
        self.restore_invariants();
        self.active_set()
    }

    /// Validate `value` as degrees, store it and make custom rotation the active rotation.
    ///
    /// On failure the stored angle is untouched and `rotateCustom` is left inactive.
    pub fn arm_custom_rotation(&mut self, value: &str) -> Result<BTreeSet<OptionTag>, OptionError> {
        let degrees = match parse_angle(value) {
            Ok(degrees) => degrees,
            Err(e) => {
                self.cancel_custom_rotation();
                return Err(e);
            }
        };

        self.custom_angle = degrees;
        self.rotation.select(RotationKind::Custom);
        self.restore_invariants();
        Ok(self.active_set())
    }

    /// The angle dialog was dismissed: `rotateCustom` ends up inactive.
    pub fn cancel_custom_rotation(&mut self) -> BTreeSet<OptionTag> {
        if self.rotation.is(RotationKind::Custom) {
            self.rotation.clear();
        }
        self.active_set()
    }

    pub fn custom_angle(&self) -> f64 {
        self.custom_angle
    }

    /// Label for the custom rotation button, showing the stored angle.
    pub fn custom_rotation_label(&self) -> String {
        let rounded = (self.custom_angle * 10.0).round() / 10.0;
        format!("{} ({}°)", OptionTag::RotateCustom.display_name(), rounded)
    }

    pub fn is_active(&self, tag: OptionTag) -> bool {
        match tag.role() {
            OptionRole::Rotation(kind) => self.rotation.is(kind),
            OptionRole::FlipHorizontal => self.flips.horizontal,
            OptionRole::FlipVertical => self.flips.vertical,
            OptionRole::Volume(step) => self.volume.contains(step),
            OptionRole::Audio(mode) => self.audio.is(mode),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.audio.is(AudioMode::Mute)
    }

    /// Active tags within one group.
    pub fn active_options(&self, group: Group) -> BTreeSet<OptionTag> {
        group
            .members()
            .iter()
            .copied()
            .filter(|tag| self.is_active(*tag))
            .collect()
    }

    /// Every active tag.
    pub fn active_set(&self) -> BTreeSet<OptionTag> {
        OptionTag::all()
            .iter()
            .copied()
            .filter(|tag| self.is_active(*tag))
            .collect()
    }

    pub fn snapshot(&self) -> OptionSnapshot {
        OptionSnapshot {
            active: self.active_set(),
            custom_angle: self
                .rotation
                .is(RotationKind::Custom)
                .then_some(self.custom_angle),
        }
    }

    fn restore_invariants(&mut self) {
        if self.is_muted() {
            self.volume.clear();
        }
    }
}

/// Parse a finite signed decimal number of degrees.
pub fn parse_angle(value: &str) -> Result<f64, OptionError> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(degrees) if degrees.is_finite() => Ok(degrees),
        _ => Err(OptionError::InvalidAngle(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::tags::OptionTag::*;

    fn tags(list: &[OptionTag]) -> BTreeSet<OptionTag> {
        list.iter().copied().collect()
    }

    fn assert_invariants(state: &OptionState) {
        assert!(state.active_options(Group::Rotation).len() <= 1);
        assert!(state.active_options(Group::BigAudio).len() <= 1);
        let volume = state.active_options(Group::VolumeDirection);
        if state.is_active(Mute) {
            assert!(volume.is_empty());
        }
        let up = volume.contains(&VolumeUp50) || volume.contains(&VolumeUp25);
        let down = volume.contains(&VolumeDown25) || volume.contains(&VolumeDown50);
        assert!(!(up && down));
    }

    #[test]
    fn test_rotation_is_exclusive() {
        let mut state = OptionState::new();
        state.toggle("rotate90");
        let active = state.toggle("rotate270");
        assert_eq!(active, tags(&[Rotate270]));
    }

    #[test]
    fn test_active_rotation_toggles_off() {
        let mut state = OptionState::new();
        state.toggle("rotate180");
        let active = state.toggle("rotate180");
        assert!(active.is_empty());
    }

    #[test]
    fn test_unknown_tag_is_noop() {
        let mut state = OptionState::new();
        state.toggle("flipVertical");
        let active = state.toggle("sepia");
        assert_eq!(active, tags(&[FlipVertical]));
    }

    #[test]
    fn test_flips_are_independent() {
        let mut state = OptionState::new();
        state.toggle("rotate90");
        state.toggle("flipHorizontal");
        state.toggle("flipVertical");
        state.toggle("mute");
        assert_eq!(state.active_options(Group::Flip), tags(&[FlipHorizontal, FlipVertical]));
        state.toggle("flipHorizontal");
        assert_eq!(state.active_options(Group::Flip), tags(&[FlipVertical]));
    }

    #[test]
    fn test_volume_stacks_within_direction() {
        let mut state = OptionState::new();
        state.toggle("volumeUp50");
        let active = state.toggle("volumeUp25");
        assert_eq!(active, tags(&[VolumeUp50, VolumeUp25]));

        // Toggling one off keeps its sibling.
        let active = state.toggle("volumeUp50");
        assert_eq!(active, tags(&[VolumeUp25]));
    }

    #[test]
    fn test_opposite_volume_direction_clears_group() {
        let mut state = OptionState::new();
        state.toggle("volumeUp50");
        state.toggle("volumeUp25");
        let active = state.toggle("volumeDown50");
        assert_eq!(active, tags(&[VolumeDown50]));
    }

    #[test]
    fn test_mute_clears_volume() {
        let mut state = OptionState::new();
        state.toggle("volumeDown25");
        state.toggle("volumeDown50");
        let active = state.toggle("mute");
        assert_eq!(active, tags(&[Mute]));
        assert!(state.active_options(Group::VolumeDirection).is_empty());
    }

    #[test]
    fn test_volume_disabled_while_muted() {
        let mut state = OptionState::new();
        state.toggle("mute");
        let active = state.toggle("volumeUp25");
        assert_eq!(active, tags(&[Mute]));

        state.toggle("mute");
        let active = state.toggle("volumeUp25");
        assert_eq!(active, tags(&[VolumeUp25]));
    }

    #[test]
    fn test_big_audio_is_exclusive() {
        let mut state = OptionState::new();
        state.toggle("stereoToMono");
        let active = state.toggle("mute");
        assert_eq!(active, tags(&[Mute]));
        let active = state.toggle("stereoToMono");
        assert_eq!(active, tags(&[StereoToMono]));
        let active = state.toggle("stereoToMono");
        assert!(active.is_empty());
    }

    #[test]
    fn test_arm_custom_rotation_replaces_rotation() {
        let mut state = OptionState::new();
        state.toggle("rotate90");
        let active = state.arm_custom_rotation("-12.5").unwrap();
        assert_eq!(active, tags(&[RotateCustom]));
        assert_eq!(state.custom_angle(), -12.5);
        assert_eq!(state.snapshot().custom_angle, Some(-12.5));
    }

    #[test]
    fn test_arm_custom_rotation_rejects_bad_input() {
        let mut state = OptionState::new();
        state.arm_custom_rotation("30").unwrap();
        for bad in ["", "abc", "12°", "NaN", "inf", "1,5"] {
            let err = state.arm_custom_rotation(bad).unwrap_err();
            assert!(matches!(err, OptionError::InvalidAngle(_)));
            assert!(!state.is_active(RotateCustom));
        }
        // The previously armed value is kept.
        assert_eq!(state.custom_angle(), 30.0);
    }

    #[test]
    fn test_custom_angle_persists_across_toggle() {
        let mut state = OptionState::new();
        state.arm_custom_rotation(" 45 ").unwrap();
        state.toggle("rotateCustom");
        assert_eq!(state.snapshot().custom_angle, None);
        state.toggle("rotateCustom");
        assert_eq!(state.snapshot().custom_angle, Some(45.0));
    }

    #[test]
    fn test_cancel_custom_rotation_deactivates() {
        let mut state = OptionState::new();
        state.arm_custom_rotation("10").unwrap();
        let active = state.cancel_custom_rotation();
        assert!(active.is_empty());

        // Cancelling leaves a fixed rotation alone.
        state.toggle("rotate180");
        let active = state.cancel_custom_rotation();
        assert_eq!(active, tags(&[Rotate180]));
    }

    #[test]
    fn test_custom_rotation_label() {
        let mut state = OptionState::new();
        state.arm_custom_rotation("22.25").unwrap();
        assert_eq!(state.custom_rotation_label(), "Rotate custom (22.3°)");
        state.arm_custom_rotation("45").unwrap();
        assert_eq!(state.custom_rotation_label(), "Rotate custom (45°)");
    }

    #[test]
    fn test_invariants_hold_for_all_toggle_sequences() {
        // Every sequence of three toggles over all tags.
        let all = OptionTag::all();
        for a in all {
            for b in all {
                for c in all {
                    let mut state = OptionState::new();
                    for tag in [a, b, c] {
                        state.toggle_option(*tag);
                        assert_invariants(&state);
                    }
                }
            }
        }
    }

    #[test]
    fn test_snapshot_matches_state() {
        let mut state = OptionState::new();
        state.toggle("rotate90");
        state.toggle("volumeUp25");
        state.toggle("stereoToMono");
        let snapshot = state.snapshot();
        assert_eq!(snapshot.active, tags(&[Rotate90, VolumeUp25, StereoToMono]));
        assert_eq!(snapshot.custom_angle, None);
        assert_eq!(snapshot.active_in(Group::BigAudio), tags(&[StereoToMono]));
    }
}
