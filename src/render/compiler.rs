//! Option snapshot to transcoder command compiler.
//!
//! Rules run in a fixed order: rotation, horizontal flip, vertical flip, then the
//! audio path (mute, else summed gain), then the stereo downmix. Each applied rule
//! records one decision line for the execution log.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::plan::{AudioDirective, CommandPlan, VideoDirective};
use super::request::RenderRequest;
use crate::config::EncodeSettings;
use crate::options::{Group, OptionRole, OptionTag, RotationKind, VolumeStep};

/// Downmix averaging both input channels equally.
pub const MONO_DOWNMIX_FILTER: &str = "pan=mono|c0=.5*c0+.5*c1";

/// Compiles render requests into command plans. Pure: no I/O, no clock.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    settings: EncodeSettings,
}

impl Compiler {
    pub fn new(settings: EncodeSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EncodeSettings {
        &self.settings
    }

    pub fn compile(&self, request: &RenderRequest) -> CommandPlan {
        let options = &request.options;
        let mut video_filters = Vec::new();
        let mut audio_filters = Vec::new();
        let mut decisions = Vec::new();

        // Visual chain: rotation, then horizontal flip, then vertical flip.
        let rotation = options
            .active_in(Group::Rotation)
            .into_iter()
            .find_map(|tag| match tag.role() {
                OptionRole::Rotation(kind) => Some(kind),
                _ => None,
            });
        match rotation {
            Some(RotationKind::Quarter) => {
                video_filters.push("transpose=clock".to_string());
                decisions.push("Rotate 90°".to_string());
            }
            Some(RotationKind::Half) => {
                video_filters.push("transpose=clock,transpose=clock".to_string());
                decisions.push("Rotate 180°".to_string());
            }
            Some(RotationKind::ThreeQuarter) => {
                video_filters.push("transpose=cclock".to_string());
                decisions.push("Rotate 270°".to_string());
            }
            Some(RotationKind::Custom) => {
                let degrees = options.custom_angle.unwrap_or_default();
                let radians = degrees * PI / 180.0;
                // c=none leaves the uncovered corners transparent instead of filled.
                video_filters.push(format!("rotate={:.4}:c=none", radians));
                decisions.push(format!("Custom rotate: {}° ({:.4} rad)", degrees, radians));
            }
            None => {}
        }

        if options.is_active(OptionTag::FlipHorizontal) {
            video_filters.push("hflip".to_string());
            decisions.push("Flip horizontal".to_string());
        }
        if options.is_active(OptionTag::FlipVertical) {
            video_filters.push("vflip".to_string());
            decisions.push("Flip vertical".to_string());
        }

        // Audio path: mute wins over everything else.
        let muted = options.is_active(OptionTag::Mute);
        let audio = if muted {
            decisions.push("Audio stripped (mute button active)".to_string());
            AudioDirective::Strip
        } else {
            let mut gain_db = 0;
            for tag in options.active_in(Group::VolumeDirection) {
                if let OptionRole::Volume(step) = tag.role() {
                    gain_db += step.gain_db();
                    decisions.push(volume_decision(step).to_string());
                }
            }
            if gain_db != 0 {
                audio_filters.push(format!("volume={}dB", gain_db));
            }

            if options.is_active(OptionTag::StereoToMono) {
                audio_filters.push(MONO_DOWNMIX_FILTER.to_string());
                decisions.push("Stereo to mono".to_string());
            }

            AudioDirective::Encode {
                codec: self.settings.audio_codec.clone(),
                bitrate: self.settings.audio_bitrate.clone(),
            }
        };

        CommandPlan {
            input: request.input.clone(),
            output: self.output_path(&request.input, &request.requested_at),
            video_filters,
            audio_filters,
            video: VideoDirective {
                codec: self.settings.video_codec.clone(),
                preset: self.settings.video_preset.clone(),
                crf: self.settings.video_crf,
            },
            audio,
            decisions,
        }
    }

    /// `<dir>/<stem>_<marker>_<timestamp><.ext>` next to the input.
    pub fn output_path(&self, input: &Path, at: &NaiveDateTime) -> PathBuf {
        self.numbered_output_path(input, at, 1)
    }

    /// Output path for the `n`th attempt on the same input within one second.
    /// The first attempt has no number; later ones end in `_<n>` before the extension.
    pub fn numbered_output_path(&self, input: &Path, at: &NaiveDateTime, n: u32) -> PathBuf {
        let dir = input.parent().unwrap_or_else(|| Path::new(""));
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        let ext = input
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let timestamp = self.settings.format_timestamp(at);
        let number = if n > 1 { format!("_{}", n) } else { String::new() };

        dir.join(format!(
            "{}_{}_{}{}{}",
            stem, self.settings.output_marker, timestamp, number, ext
        ))
    }
}

fn volume_decision(step: VolumeStep) -> &'static str {
    match step {
        VolumeStep::Up50 => "Volume +50% (+12dB)",
        VolumeStep::Up25 => "Volume +25% (+6dB)",
        VolumeStep::Down25 => "Volume −25% (−6dB)",
        VolumeStep::Down50 => "Volume −50% (−12dB)",
    }
}
