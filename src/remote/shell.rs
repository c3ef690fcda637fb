//! Command channel gateway.
//!
//! Runs one free-text command on the attached device via `<binary> shell`
//! and reports whatever came back. Nothing at this layer is an `Err`: bad
//! exits, timeouts, and spawn failures are all ordinary [`ShellOutput`]
//! values so the resolver can keep walking its fallback chain. The only
//! fallible operation is the up-front availability probe.

use std::env;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::core::errors::{Result, SweepError};

/// Exit code reported when a command exceeds its deadline.
pub const TIMEOUT_EXIT_CODE: i32 = 124;
/// Exit code reported when the channel binary cannot be spawned.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Outcome of one channel invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// Raw exit code; [`TIMEOUT_EXIT_CODE`] and [`SPAWN_FAILURE_EXIT_CODE`]
    /// are synthesized locally.
    pub exit_code: i32,
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
}

impl ShellOutput {
    /// Builds a zero-exit output, mostly useful for scripted channels in
    /// tests.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// True when the command reported a zero exit status.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// True when the command was killed at its deadline.
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        self.exit_code == TIMEOUT_EXIT_CODE
    }

    /// True when stdout holds anything beyond whitespace.
    #[must_use]
    pub fn has_stdout(&self) -> bool {
        !self.stdout.trim().is_empty()
    }
}

/// Minimal channel surface the resolver and dispatcher depend on, kept as a
/// trait so tests can script device responses.
pub trait CommandChannel {
    /// Runs one command string on the device, blocking up to `timeout`.
    fn run(&self, command: &str, timeout: Duration) -> ShellOutput;
}

/// The production channel: spawns `<binary> shell <command>` per invocation.
#[derive(Debug, Clone)]
pub struct AdbShell {
    binary: String,
}

impl AdbShell {
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Name or path of the channel binary this shell spawns.
    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Hard precondition check: the channel binary must exist before any
    /// remote work starts.
    pub fn ensure_available(&self) -> Result<()> {
        if binary_available(&self.binary) {
            Ok(())
        } else {
            Err(SweepError::DeviceChannelMissing {
                details: format!(
                    "`{}` not found on PATH; install Android platform-tools or set remote.channel_binary",
                    self.binary
                ),
            })
        }
    }
}

impl CommandChannel for AdbShell {
    fn run(&self, command: &str, timeout: Duration) -> ShellOutput {
        debug!(
            binary = %self.binary,
            %command,
            timeout_secs = timeout.as_secs(),
            "running channel command"
        );
        let spawned = Command::new(&self.binary)
            .arg("shell")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(err) => {
                warn!(binary = %self.binary, %err, "channel binary failed to spawn");
                return ShellOutput::failure(SPAWN_FAILURE_EXIT_CODE, err.to_string());
            }
        };
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    return ShellOutput {
                        exit_code: status.code().unwrap_or(-1),
                        stdout: collect(stdout),
                        stderr: collect(stderr),
                    };
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        // Dropping the drain handles detaches them; joining
                        // could block on pipes still held by orphaned
                        // grandchildren of the killed command.
                        drop(stdout);
                        drop(stderr);
                        debug!(%command, "channel command hit its deadline");
                        return ShellOutput::failure(TIMEOUT_EXIT_CODE, "timeout");
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return ShellOutput::failure(1, err.to_string());
                }
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(handle: JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

/// Checks `PATH` for a bare binary name, or the filesystem for anything that
/// already looks like a path.
fn binary_available(name: &str) -> bool {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file();
    }
    let Some(path) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&path).any(|dir| dir.join(name).is_file())
}

/// Single-quote escaping for device paths embedded in channel command
/// strings, matching POSIX shell quoting rules.
#[must_use]
pub fn shell_quote(raw: &str) -> String {
    let safe = !raw.is_empty()
        && raw.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'/' | b'.' | b'_' | b'-' | b'+' | b'=' | b':' | b'@' | b'%' | b','
                )
        });
    if safe {
        raw.to_owned()
    } else {
        format!("'{}'", raw.replace('\'', "'\"'\"'"))
    }
}
