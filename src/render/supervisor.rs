//! Transcoder process supervision.
//!
//! Runs one compiled plan at a time: checks the input, resolves the transcoder,
//! writes the plan's decisions and command line to the execution log, then streams
//! the child's stdout and stderr into the same log until it exits.

use std::ffi::OsString;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};

use super::compiler::Compiler;
use super::execution_log::ExecutionLog;
use super::plan::CommandPlan;
use super::request::{RenderRequest, RenderResult};
use super::tool::ToolLocator;
use crate::config::AppConfig;
use crate::error::RenderError;
use crate::options::OptionSnapshot;

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// What an attempt got as far as, for the result.
#[derive(Debug, Default)]
struct Attempt {
    output: Option<PathBuf>,
    exit_code: Option<i32>,
}

/// Drives the compiler and the transcoder for render requests.
///
/// Callers serialize renders; one attempt runs to completion before the next.
#[derive(Debug, Clone)]
pub struct Supervisor {
    compiler: Compiler,
    tool: ToolLocator,
    log_dir: PathBuf,
    log_prefix: String,
}

impl Supervisor {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            compiler: Compiler::new(config.encode.clone()),
            tool: ToolLocator::new(&config.tool),
            log_dir: config.logging.log_dir(),
            log_prefix: config.logging.prefix.clone(),
        }
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn tool(&self) -> &ToolLocator {
        &self.tool
    }

    /// Compile without running anything.
    pub fn plan(&self, request: &RenderRequest) -> CommandPlan {
        self.compiler.compile(request)
    }

    /// Render one request. Never fails: every error ends up in the log and the result.
    pub async fn render(&self, request: RenderRequest) -> RenderResult {
        let timestamp = self
            .compiler
            .settings()
            .format_timestamp(&request.requested_at);
        let log = match ExecutionLog::create(&self.log_dir, &self.log_prefix, &timestamp) {
            Ok(log) => log,
            Err(e) => {
                let path = ExecutionLog::path_for(&self.log_dir, &self.log_prefix, &timestamp);
                log::error!("Failed to create execution log {:?}: {}", path, e);
                return RenderResult::failed(&path, None, None);
            }
        };

        let mut attempt = Attempt::default();
        let outcome = self.execute(&request, &log, &mut attempt).await;

        let terminal = match &outcome {
            Ok(output) => format!("Done ✅  Output: {}", output.display()),
            Err(e) => e.to_string(),
        };
        if let Err(e) = log.append(&terminal) {
            log::error!("Failed to write to execution log {:?}: {}", log.path(), e);
        }

        match outcome {
            Ok(output) => {
                log::info!("Rendered {} -> {:?}", request.input_filename(), output);
                RenderResult {
                    exit_code: attempt.exit_code,
                    output_path: Some(output),
                    success: true,
                    log_path: log.path().to_path_buf(),
                }
            }
            Err(e) => {
                log::warn!("Render of {} failed: {}", request.input_filename(), e);
                RenderResult::failed(log.path(), attempt.output, attempt.exit_code)
            }
        }
    }

    /// Render each input in turn with the same options.
    pub async fn render_all(&self, options: &OptionSnapshot, inputs: &[PathBuf]) -> Vec<RenderResult> {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let request = RenderRequest::new(input.clone(), options.clone());
            results.push(self.render(request).await);
        }
        results
    }

    async fn execute(
        &self,
        request: &RenderRequest,
        log: &ExecutionLog,
        attempt: &mut Attempt,
    ) -> Result<PathBuf, RenderError> {
        if !request.input.exists() {
            return Err(RenderError::InputMissing(request.input.clone()));
        }

        let tool = self.tool.resolve()?;

        let mut plan = self.compiler.compile(request);
        plan.output = self.unused_output_path(request, plan.output);
        attempt.output = Some(plan.output.clone());
        log::debug!("Compiled plan for {}: {:?}", request.input_filename(), plan.decisions);

        log.append_all(&plan.decisions)?;
        let tool_name = tool
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "ffmpeg".to_string());
        log.append(&format!("> {} {}", tool_name, plan.command_line()))?;

        let args = plan.args();
        let child_log = log.clone();
        let status = tokio::task::spawn_blocking(move || run_tool(&tool, &args, &child_log))
            .await
            .map_err(|e| RenderError::Unhandled(e.to_string()))??;

        attempt.exit_code = status.code();
        log::info!("Transcoder exited with {}", status);

        if status.success() && plan.output.exists() {
            Ok(plan.output)
        } else {
            Err(RenderError::ProcessFailure {
                code: status.code(),
            })
        }
    }

    /// The transcoder runs with `-y`, so never hand it a path an earlier attempt produced.
    fn unused_output_path(&self, request: &RenderRequest, planned: PathBuf) -> PathBuf {
        let mut output = planned;
        let mut n = 1;
        while output.exists() {
            n += 1;
            output = self
                .compiler
                .numbered_output_path(&request.input, &request.requested_at, n);
        }
        output
    }
}

/// Run the transcoder, appending its output lines to the log in arrival order.
fn run_tool(tool: &Path, args: &[OsString], log: &ExecutionLog) -> io::Result<ExitStatus> {
    let mut command = Command::new(tool);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    let mut child = command.spawn()?;

    let (tx, rx) = unbounded::<String>();
    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(spawn_reader(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_reader(stderr, tx.clone()));
    }
    drop(tx);

    // Keep draining after a write error so the child never stalls on a full pipe.
    let mut written = Ok(());
    for line in rx {
        if written.is_ok() {
            written = log.append(&line);
        }
    }

    join_readers(readers);
    let status = child.wait()?;
    written?;
    Ok(status)
}

/// Wait for the output readers. Returns how many of them panicked.
fn join_readers(readers: Vec<JoinHandle<()>>) -> usize {
    let mut panicked = 0;
    for reader in readers {
        if reader.join().is_err() {
            log::warn!("Transcoder output reader panicked; some output lines may be missing");
            panicked += 1;
        }
    }
    panicked
}

fn spawn_reader<R: Read + Send + 'static>(stream: R, tx: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(e) = for_each_line(BufReader::new(stream), |line| tx.send(line).is_ok()) {
            log::warn!("Error reading transcoder output: {}", e);
        }
    })
}

/// Split a stream on `\n` and `\r`, skipping blank lines. Stops early when `emit` returns false.
fn for_each_line<R: Read>(reader: R, mut emit: impl FnMut(String) -> bool) -> io::Result<()> {
    let mut line = Vec::new();
    for byte in reader.bytes() {
        match byte? {
            b'\n' | b'\r' => {
                if !flush_line(&mut line, &mut emit) {
                    return Ok(());
                }
            }
            b => line.push(b),
        }
    }
    flush_line(&mut line, &mut emit);
    Ok(())
}

fn flush_line(line: &mut Vec<u8>, emit: &mut impl FnMut(String) -> bool) -> bool {
    let text = String::from_utf8_lossy(line).into_owned();
    line.clear();
    if text.trim().is_empty() {
        true
    } else {
        emit(text)
    }
}
