//! Incremental, offset-based read-back of the overview stream.
//!
//! Each call is a pure function of the file content at that moment: seek to
//! a byte offset, read to end, split on newlines. Readers never hold a lock
//! shared with the writer, so they may observe a file mid-append; a trailing
//! line without its newline is excluded and the returned cursor stops before
//! it, so the next read picks the line up once the completing newline lands.

use std::path::Path;

use serde::Serialize;

/// One page of overview lines plus the cursor to resume from.
#[derive(Debug, Clone, Serialize)]
pub struct TailPage {
    pub lines: Vec<String>,
    /// Byte offset to pass back on the next call.
    pub offset: u64,
    /// Set when the target file does not exist; never raised as an error.
    pub error: Option<String>,
}

/// Read overview lines starting at `offset`.
///
/// With no offset — or a stale one pointing past the end of the file — the
/// call degrades to tail behavior: the last `max_entries` complete lines and
/// a cursor at the end of the last observed newline. A missing file yields
/// an empty page with offset `0` and a descriptive error string.
pub fn read_overview(path: &Path, offset: Option<u64>, max_entries: usize) -> TailPage {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => {
            return TailPage {
                lines: Vec::new(),
                offset: 0,
                error: Some(format!("overview log not found: {}", path.display())),
            }
        }
    };
    let size = bytes.len() as u64;

    // Stale or out-of-range cursors fall back to reading from the start.
    let start = match offset {
        Some(o) if o <= size => o,
        _ => 0,
    };

    let window = &bytes[start as usize..];
    let consumed = match window.iter().rposition(|&b| b == b'\n') {
        Some(pos) => pos + 1,
        None => 0,
    };

    let mut lines: Vec<String> = window[..consumed]
        .split(|&b| b == b'\n')
        .filter(|segment| !segment.is_empty())
        .map(|segment| String::from_utf8_lossy(segment).into_owned())
        .collect();

    if max_entries > 0 && lines.len() > max_entries {
        lines.drain(..lines.len() - max_entries);
    }

    TailPage {
        lines,
        offset: start + consumed as u64,
        error: None,
    }
}
