//! Command Compiler & Process Supervisor
//!
//! Turns an option snapshot into a transcoder invocation and runs it.
//!
//! # Architecture
//!
//! * `compiler`: Pure mapping from a [`RenderRequest`] to a [`CommandPlan`].
//! * `plan`: The compiled filters and codec directives, and their argument list.
//! * `supervisor`: Input checks, transcoder launch, output capture and outcome.
//! * `tool`: Locating and extracting the bundled transcoder.
//! * `execution_log`: The per-attempt execution log.
//! * `request`: Request and result types.

mod compiler;
mod execution_log;
mod plan;
mod request;
mod supervisor;
mod tool;

pub use compiler::{Compiler, MONO_DOWNMIX_FILTER};
pub use execution_log::ExecutionLog;
pub use plan::{AudioDirective, CommandPlan, VideoDirective};
pub use request::{RenderRequest, RenderResult};
pub use supervisor::Supervisor;
pub use tool::ToolLocator;
