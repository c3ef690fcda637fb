//! Parsers for the free-text listing shapes a device shell can produce.
//!
//! There is no structured listing protocol over the command channel, so each
//! supported command output shape gets its own parser. All of them share one
//! contract: consume the whole output, emit a `FileRecord` per recognizable
//! line, and skip anything malformed without failing the scan.

use crate::core::types::FileRecord;

/// Files found in one non-recursive directory listing, plus the
/// subdirectories that still need their own listing pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirListing {
    /// Records for the plain files in this directory.
    pub files: Vec<FileRecord>,
    /// Absolute paths of subdirectories queued for their own listing.
    pub subdirs: Vec<String>,
}

fn all_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Splits off the first whitespace-delimited token, trimming the remainder's
/// leading whitespace.
fn split_first_token(line: &str) -> Option<(&str, &str)> {
    let (token, rest) = line.split_once(char::is_whitespace)?;
    Some((token, rest.trim_start()))
}

/// Joins a listing name to its directory, keeping already-absolute names
/// as-is and never doubling the separator.
fn join_absolute(current_dir: &str, name: &str) -> String {
    if name.starts_with('/') {
        name.to_owned()
    } else {
        format!(
            "{}/{}",
            current_dir.trim_end_matches('/'),
            name.trim_start_matches('/')
        )
    }
}

/// Parses `find <root> -type f -ls` style output.
///
/// Two-token `<size> <abs-path>` lines are taken directly. Anything else is
/// tokenized and decided by the first purely-numeric token: when the rejoined
/// tail after it is absolute, that token is the size and the tail is the
/// path. The scan never looks past the first numeric token, so a line whose
/// leading number is not followed by an absolute path yields nothing. Header
/// and total lines fall out naturally because their tails are not absolute.
#[must_use]
pub fn parse_find_ls(output: &str) -> Vec<FileRecord> {
    let mut records = Vec::new();
    for raw in output.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((token, rest)) = split_first_token(line) {
            if all_digits(token) && rest.starts_with('/') {
                if let Ok(size) = token.parse() {
                    records.push(FileRecord::new(size, rest));
                }
                continue;
            }
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        for (i, token) in tokens.iter().enumerate() {
            if all_digits(token) {
                let tail = tokens[i + 1..].join(" ");
                if tail.starts_with('/') {
                    if let Ok(size) = token.parse() {
                        records.push(FileRecord::new(size, tail));
                    }
                }
                break;
            }
        }
    }
    records
}

/// Parses strict `<integer> <absolute-path>` pairs, one per line, as emitted
/// by `stat -c '%s %n'`. Lines of any other shape yield nothing.
#[must_use]
pub fn parse_stat_pairs(output: &str) -> Vec<FileRecord> {
    let mut records = Vec::new();
    for raw in output.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Some((token, rest)) = split_first_token(line) else {
            continue;
        };
        if all_digits(token) && rest.starts_with('/') {
            if let Ok(size) = token.parse() {
                records.push(FileRecord::new(size, rest));
            }
        }
    }
    records
}

/// Parses one long-form `ls -l` line relative to `current_dir`.
///
/// Toybox/coreutils long listings put the size at token index 4 and begin the
/// name at token index 8; when that holds the name is the rejoined tail from
/// index 8 (or the final token for shorter lines). Listings that deviate are
/// handled by falling back to the first purely-numeric token with everything
/// after it as the name. `total N` headers and lines with fewer than 6 tokens
/// yield nothing.
#[must_use]
pub fn parse_long_line(line: &str, current_dir: &str) -> Option<FileRecord> {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with("total ") {
        return None;
    }
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 6 {
        return None;
    }
    let (size_token, name) = if all_digits(parts[4]) {
        let name = if parts.len() > 8 {
            parts[8..].join(" ")
        } else {
            (*parts.last()?).to_owned()
        };
        (parts[4], name)
    } else {
        let mut found = None;
        for (i, token) in parts.iter().enumerate() {
            if all_digits(token) {
                if i + 1 < parts.len() {
                    found = Some((*token, parts[i + 1..].join(" ")));
                }
                break;
            }
        }
        found?
    };
    let size = size_token.parse().ok()?;
    Some(FileRecord::new(size, join_absolute(current_dir, &name)))
}

/// Parses `ls -lR <root>` style multi-section output.
///
/// A line ending in `:` that is absolute (or extends the assumed root) starts
/// a new section and becomes the current directory for the long-form lines
/// after it. A trailing fallback accepts bare `<int> <abs-path>` pairs
/// anywhere in the stream.
#[must_use]
pub fn parse_ls_recursive(output: &str, assumed_root: &str) -> Vec<FileRecord> {
    let mut files = Vec::new();
    let mut current_dir = assumed_root.trim_end_matches('/').to_owned();
    for raw in output.lines() {
        let line = raw.trim_end();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_suffix(':') {
            if line.starts_with('/') || line.starts_with(assumed_root) {
                current_dir = header.to_owned();
                continue;
            }
        }
        if let Some(record) = parse_long_line(line, &current_dir) {
            files.push(record);
            continue;
        }
        if let Some((token, rest)) = split_first_token(line.trim_start()) {
            if all_digits(token) && rest.starts_with('/') {
                if let Ok(size) = token.parse() {
                    files.push(FileRecord::new(size, rest));
                }
            }
        }
    }
    files
}

/// Parses a single non-recursive `ls -l <dir>` listing.
///
/// File lines become records resolved against `dir`; remaining lines whose
/// first character is the directory marker `d` contribute their final token
/// as a subdirectory to queue. Subdirectory names that already look absolute
/// are not queued.
#[must_use]
pub fn parse_single_directory(output: &str, dir: &str) -> DirListing {
    let mut listing = DirListing::default();
    let current_dir = dir.trim_end_matches('/');
    for raw in output.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(record) = parse_long_line(line, current_dir) {
            listing.files.push(record);
            continue;
        }
        if line.starts_with('d') {
            if let Some(name) = line.split_whitespace().last() {
                if !name.is_empty() && !name.starts_with('/') {
                    listing.subdirs.push(format!("{current_dir}/{name}"));
                }
            }
        }
    }
    listing
}
