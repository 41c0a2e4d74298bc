//! Compiled transcoder invocation.

use std::ffi::OsString;
use std::path::PathBuf;

/// Video re-encode directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDirective {
    pub codec: String,
    pub preset: String,
    pub crf: u8,
}

/// Audio handling: re-encode, or drop the audio stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioDirective {
    Encode { codec: String, bitrate: String },
    Strip,
}

/// Ordered filter and codec directives for one transcoder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub video_filters: Vec<String>,
    pub audio_filters: Vec<String>,
    pub video: VideoDirective,
    pub audio: AudioDirective,
    /// One line per applied rule, in evaluation order
    pub decisions: Vec<String>,
}

impl CommandPlan {
    /// Video filter graph, if any filters were applied.
    pub fn video_filter_graph(&self) -> Option<String> {
        join_filters(&self.video_filters)
    }

    /// Audio filter graph, if any filters were applied.
    pub fn audio_filter_graph(&self) -> Option<String> {
        join_filters(&self.audio_filters)
    }

    pub fn strips_audio(&self) -> bool {
        self.audio == AudioDirective::Strip
    }

    /// Full argument list for the transcoder.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-i".into()];
        args.push(self.input.clone().into_os_string());

        // Video always mapped, audio only if the input has it.
        args.extend(["-map", "0:v?", "-map", "0:a?"].map(OsString::from));

        if let Some(vf) = self.video_filter_graph() {
            args.push("-vf".into());
            args.push(vf.into());
        }
        if let Some(af) = self.audio_filter_graph() {
            args.push("-af".into());
            args.push(af.into());
        }

        args.push("-c:v".into());
        args.push(self.video.codec.clone().into());
        args.push("-preset".into());
        args.push(self.video.preset.clone().into());
        args.push("-crf".into());
        args.push(self.video.crf.to_string().into());

        match &self.audio {
            AudioDirective::Encode { codec, bitrate } => {
                args.push("-c:a".into());
                args.push(codec.clone().into());
                args.push("-b:a".into());
                args.push(bitrate.clone().into());
            }
            AudioDirective::Strip => args.push("-an".into()),
        }

        args.push(self.output.clone().into_os_string());
        args
    }

    /// Printable command line, quoting arguments that need it.
    pub fn command_line(&self) -> String {
        self.args()
            .iter()
            .map(|arg| quote(&arg.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn join_filters(filters: &[String]) -> Option<String> {
    if filters.is_empty() {
        None
    } else {
        Some(filters.join(","))
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.contains([' ', '"', '|', '\t']) {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}
