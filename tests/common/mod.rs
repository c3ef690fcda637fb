//! Shared helpers for the CLI integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// Builds a `ssw` invocation with color disabled and a pinned log filter so
/// output assertions see plain text regardless of the host environment.
pub fn ssw() -> Command {
    let mut cmd = Command::cargo_bin("ssw").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Writes a config file wiring the remote channel to `channel_binary` and
/// both persistence paths into `dir`, then returns the config path.
pub fn write_config(dir: &Path, channel_binary: &str) -> PathBuf {
    let config = dir.join("config.toml");
    let body = format!(
        "[remote]\n\
         channel_binary = \"{}\"\n\
         root = \"/sdcard\"\n\
         min_size_bytes = 1000000\n\
         top = 10\n\
         \n\
         [paths]\n\
         snapshot = \"{}\"\n\
         history = \"{}\"\n",
        channel_binary,
        dir.join("last_scan.json").display(),
        dir.join("history.jsonl").display(),
    );
    fs::write(&config, body).unwrap();
    config
}

/// Writes a minimal config that leaves every setting at its default.
pub fn write_default_config(dir: &Path) -> PathBuf {
    let config = dir.join("config.toml");
    fs::write(&config, "").unwrap();
    config
}

/// Installs an executable fake channel binary. The gateway invokes it as
/// `<binary> shell <command>`, so `$2` carries the remote command; `cases`
/// supplies the body of a `case` dispatch over it. Anything unscripted
/// exits 1.
#[cfg(unix)]
pub fn write_fake_channel(dir: &Path, cases: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-adb");
    let script = format!(
        "#!/bin/sh\n\
         cmd=\"$2\"\n\
         case \"$cmd\" in\n\
         {cases}\n\
         *) exit 1 ;;\n\
         esac\n"
    );
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}
