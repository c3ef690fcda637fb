//! Remote inventory resolution.
//!
//! Device shells disagree wildly about how to list files, so resolution is a
//! fallback ladder: for each candidate root, try the bulk strategies in
//! fixed order and return the first non-empty parse; when none of them
//! produce anything, walk the root one directory at a time. An empty
//! inventory is a valid outcome, not an error.

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::core::types::FileRecord;
use crate::remote::listing;
use crate::remote::shell::{CommandChannel, shell_quote};

/// Fallback roots tried after the preferred root, in order.
pub const FALLBACK_ROOTS: [&str; 2] = ["/storage/emulated/0", "/sdcard"];

/// Deadline for full-subtree enumeration commands.
const SUBTREE_TIMEOUT: Duration = Duration::from_secs(120);
/// Deadline for the non-recursive listing of a candidate root.
const ROOT_LISTING_TIMEOUT: Duration = Duration::from_secs(60);
/// Deadline for one non-recursive subdirectory listing.
const SUBDIR_LISTING_TIMEOUT: Duration = Duration::from_secs(30);
/// Deadline for the recursive rescue listing of a single subdirectory.
const SUBDIR_RESCUE_TIMEOUT: Duration = Duration::from_secs(60);
/// Pause between per-subdirectory requests; politeness toward the channel.
const PACING_DELAY: Duration = Duration::from_millis(20);

/// One bulk listing attempt: a command template paired with the parser for
/// the output shape that command produces.
struct Strategy {
    name: &'static str,
    command: fn(&str) -> String,
    parse: fn(&str, &str) -> Vec<FileRecord>,
}

const BULK_STRATEGIES: [Strategy; 3] = [
    Strategy {
        name: "find -ls",
        command: find_ls_command,
        parse: parse_find_ls,
    },
    Strategy {
        name: "find -exec stat",
        command: find_stat_command,
        parse: parse_stat_pairs,
    },
    Strategy {
        name: "ls -lR",
        command: ls_recursive_command,
        parse: listing::parse_ls_recursive,
    },
];

fn find_ls_command(root: &str) -> String {
    format!("find {} -type f -ls", shell_quote(root))
}

fn find_stat_command(root: &str) -> String {
    format!(
        "find {} -type f -exec stat -c '%s %n' {{}} \\;",
        shell_quote(root)
    )
}

fn ls_recursive_command(root: &str) -> String {
    format!("ls -lR {}", shell_quote(root))
}

fn parse_find_ls(output: &str, _root: &str) -> Vec<FileRecord> {
    listing::parse_find_ls(output)
}

fn parse_stat_pairs(output: &str, _root: &str) -> Vec<FileRecord> {
    listing::parse_stat_pairs(output)
}

/// Resolves the file inventory under `root`, falling back across
/// [`FALLBACK_ROOTS`] and across listing strategies per root. The first
/// strategy that parses to something wins; exhausting everything yields an
/// empty inventory.
///
/// Callers must check channel availability first; a dead channel simply
/// looks like every strategy failing.
#[must_use]
pub fn resolve_inventory(channel: &dyn CommandChannel, root: &str) -> Vec<FileRecord> {
    let mut roots: Vec<&str> = Vec::with_capacity(1 + FALLBACK_ROOTS.len());
    for candidate in std::iter::once(root).chain(FALLBACK_ROOTS) {
        if !roots.contains(&candidate) {
            roots.push(candidate);
        }
    }

    for candidate_root in roots {
        for strategy in &BULK_STRATEGIES {
            let command = (strategy.command)(candidate_root);
            let output = channel.run(&command, SUBTREE_TIMEOUT);
            if !output.success() || !output.has_stdout() {
                debug!(
                    strategy = strategy.name,
                    root = candidate_root,
                    exit_code = output.exit_code,
                    "strategy produced no usable output"
                );
                continue;
            }
            let records = (strategy.parse)(&output.stdout, candidate_root);
            if records.is_empty() {
                debug!(
                    strategy = strategy.name,
                    root = candidate_root,
                    "strategy output parsed to nothing"
                );
                continue;
            }
            debug!(
                strategy = strategy.name,
                root = candidate_root,
                records = records.len(),
                "strategy succeeded"
            );
            return records;
        }

        let records = iterative_scan(channel, candidate_root);
        if !records.is_empty() {
            debug!(
                root = candidate_root,
                records = records.len(),
                "iterative fallback succeeded"
            );
            return records;
        }
    }

    debug!(root, "every root and strategy combination came up empty");
    Vec::new()
}

/// Strategy of last resort: one `ls -l` of the root, then one listing per
/// collected subdirectory (with an `ls -lR` rescue scoped to a subdirectory
/// whose plain listing fails), all paced to avoid hammering the channel.
fn iterative_scan(channel: &dyn CommandChannel, root: &str) -> Vec<FileRecord> {
    let output = channel.run(
        &format!("ls -l {}", shell_quote(root)),
        ROOT_LISTING_TIMEOUT,
    );
    if !output.success() || !output.has_stdout() {
        debug!(
            root,
            exit_code = output.exit_code,
            "non-recursive root listing failed"
        );
        return Vec::new();
    }

    let listing::DirListing {
        files: mut records,
        subdirs,
    } = listing::parse_single_directory(&output.stdout, root);

    for subdir in subdirs {
        thread::sleep(PACING_DELAY);
        let listed = channel.run(
            &format!("ls -l {}", shell_quote(&subdir)),
            SUBDIR_LISTING_TIMEOUT,
        );
        if !listed.success() || !listed.has_stdout() {
            let rescued = channel.run(
                &format!("ls -lR {}", shell_quote(&subdir)),
                SUBDIR_RESCUE_TIMEOUT,
            );
            if rescued.success() && rescued.has_stdout() {
                let found = listing::parse_ls_recursive(&rescued.stdout, &subdir);
                debug!(%subdir, records = found.len(), "recursive rescue listing");
                records.extend(found);
            } else {
                debug!(%subdir, "subdirectory listing failed both ways");
            }
            continue;
        }
        for line in listed.stdout.lines() {
            if let Some(record) = listing::parse_long_line(line, &subdir) {
                records.push(record);
            }
        }
    }

    records
}
