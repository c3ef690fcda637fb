//! Single-path device operations: stat and remove.

use std::time::Duration;

use tracing::debug;

use crate::remote::listing;
use crate::remote::shell::{CommandChannel, shell_quote};

const STAT_TIMEOUT: Duration = Duration::from_secs(15);
const STAT_FALLBACK_TIMEOUT: Duration = Duration::from_secs(10);
const DELETE_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-path outcome of one remove dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// True when the remove command exited zero.
    pub ok: bool,
    /// Command output worth showing the operator, usually empty on success.
    pub message: String,
}

/// Sizes one device path.
///
/// Prefers `stat -c %s`; when that exits non-zero or prints anything but a
/// bare integer, falls back to a long-form listing of the path itself parsed
/// against its parent directory. `None` when both shapes fail.
#[must_use]
pub fn stat_size(channel: &dyn CommandChannel, path: &str) -> Option<u64> {
    let output = channel.run(&format!("stat -c %s {}", shell_quote(path)), STAT_TIMEOUT);
    if output.success() {
        let body = output.stdout.trim();
        if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(size) = body.parse() {
                return Some(size);
            }
        }
    }

    let fallback = channel.run(
        &format!("ls -l {}", shell_quote(path)),
        STAT_FALLBACK_TIMEOUT,
    );
    if fallback.success() && fallback.has_stdout() {
        let parent = parent_directory(path);
        for line in fallback.stdout.lines() {
            if let Some(record) = listing::parse_long_line(line.trim(), parent) {
                return Some(record.size);
            }
        }
    }
    debug!(path, "could not size device path");
    None
}

fn parent_directory(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

/// Removes one device path. `ok` iff `rm -f` exited zero; on failure the
/// message carries stderr, or stdout when stderr is empty.
#[must_use]
pub fn delete_file(channel: &dyn CommandChannel, path: &str) -> DeleteOutcome {
    let output = channel.run(&format!("rm -f {}", shell_quote(path)), DELETE_TIMEOUT);
    if output.success() {
        DeleteOutcome {
            ok: true,
            message: output.stdout.trim().to_owned(),
        }
    } else {
        let stderr = output.stderr.trim();
        let message = if stderr.is_empty() {
            output.stdout.trim()
        } else {
            stderr
        };
        DeleteOutcome {
            ok: false,
            message: message.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::shell::ShellOutput;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct ScriptedChannel {
        responses: HashMap<String, ShellOutput>,
        issued: RefCell<Vec<String>>,
    }

    impl ScriptedChannel {
        fn new(responses: &[(&str, ShellOutput)]) -> Self {
            Self {
                responses: responses
                    .iter()
                    .map(|(cmd, out)| ((*cmd).to_owned(), out.clone()))
                    .collect(),
                issued: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandChannel for ScriptedChannel {
        fn run(&self, command: &str, _timeout: Duration) -> ShellOutput {
            self.issued.borrow_mut().push(command.to_owned());
            self.responses.get(command).cloned().unwrap_or(ShellOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: "not scripted".to_owned(),
            })
        }
    }

    #[test]
    fn stat_prefers_direct_size_output() {
        let channel = ScriptedChannel::new(&[(
            "stat -c %s /sdcard/a.mp4",
            ShellOutput::ok("123456\n"),
        )]);
        assert_eq!(stat_size(&channel, "/sdcard/a.mp4"), Some(123_456));
        assert_eq!(channel.issued.borrow().len(), 1);
    }

    #[test]
    fn stat_falls_back_to_listing_parse() {
        let channel = ScriptedChannel::new(&[(
            "ls -l /sdcard/Download/b.zip",
            ShellOutput::ok(
                "-rw-rw---- 1 root sdcard_rw 777777 2024-03-01 12:00 /sdcard/Download/b.zip\n",
            ),
        )]);
        assert_eq!(stat_size(&channel, "/sdcard/Download/b.zip"), Some(777_777));
    }

    #[test]
    fn stat_quotes_paths_with_spaces() {
        let channel = ScriptedChannel::new(&[(
            "stat -c %s '/sdcard/My Movies/c.mp4'",
            ShellOutput::ok("42\n"),
        )]);
        assert_eq!(stat_size(&channel, "/sdcard/My Movies/c.mp4"), Some(42));
    }

    #[test]
    fn stat_gives_up_when_both_shapes_fail() {
        let channel = ScriptedChannel::new(&[]);
        assert_eq!(stat_size(&channel, "/sdcard/none.bin"), None);
    }

    #[test]
    fn delete_reports_zero_exit_as_ok() {
        let channel = ScriptedChannel::new(&[("rm -f /sdcard/a.mp4", ShellOutput::ok(""))]);
        let outcome = delete_file(&channel, "/sdcard/a.mp4");
        assert!(outcome.ok);
    }

    #[test]
    fn delete_failure_carries_stderr_then_stdout() {
        let channel = ScriptedChannel::new(&[(
            "rm -f /sdcard/locked.bin",
            ShellOutput {
                exit_code: 1,
                stdout: "rm: some notice\n".to_owned(),
                stderr: "rm: /sdcard/locked.bin: Permission denied\n".to_owned(),
            },
        )]);
        let outcome = delete_file(&channel, "/sdcard/locked.bin");
        assert!(!outcome.ok);
        assert_eq!(outcome.message, "rm: /sdcard/locked.bin: Permission denied");

        let stdout_only = ScriptedChannel::new(&[(
            "rm -f /sdcard/other.bin",
            ShellOutput {
                exit_code: 1,
                stdout: "read-only filesystem\n".to_owned(),
                stderr: String::new(),
            },
        )]);
        let outcome = delete_file(&stdout_only, "/sdcard/other.bin");
        assert_eq!(outcome.message, "read-only filesystem");
    }

    #[test]
    fn parent_directory_mirrors_dirname() {
        assert_eq!(parent_directory("/sdcard/DCIM/x.mp4"), "/sdcard/DCIM");
        assert_eq!(parent_directory("/top.bin"), "/");
        assert_eq!(parent_directory("bare"), "/");
    }
}
