/// One entry from `git status --porcelain` (v1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// First status character (index state).
    pub index_status: char,
    /// Second status character (working tree state).
    pub worktree_status: char,
    /// Path shown (target path for rename/copy).
    pub path: String,
    /// Original path for rename/copy, absent otherwise.
    pub orig_path: Option<String>,
    /// The porcelain line as read, kept for diagnostics.
    pub raw_line: String,
}

/// Parse `git status --porcelain` output into entries.
///
/// Per line: two status characters, one space, then either a path or
/// `<from> -> <to>`. Parsing is total: a line shorter than three characters
/// degrades to an entry with an empty path and the raw line retained, and
/// never stops the rest of the listing from decoding. Entry order follows
/// the input; paths are not deduplicated.
pub fn parse_status_porcelain(out: &str) -> Vec<StatusEntry> {
    let mut entries = Vec::new();

    for line in out.replace("\r\n", "\n").lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.chars().count() < 3 {
            // malformed, still keep the raw line
            entries.push(StatusEntry {
                index_status: ' ',
                worktree_status: ' ',
                path: String::new(),
                orig_path: None,
                raw_line: line.to_string(),
            });
            continue;
        }

        let mut chars = line.chars();
        let (Some(index_status), Some(worktree_status)) = (chars.next(), chars.next()) else {
            continue; // unreachable after the length check
        };

        // Skip the two status characters and the single separating space.
        let rest_start = line
            .char_indices()
            .nth(3)
            .map_or(line.len(), |(idx, _)| idx);
        let rest = line[rest_start..].trim();

        let (path, orig_path) = match rest.split_once("->") {
            Some((from, to)) => (to.trim().to_string(), Some(from.trim().to_string())),
            None => (rest.to_string(), None),
        };

        entries.push(StatusEntry {
            index_status,
            worktree_status,
            path,
            orig_path,
            raw_line: line.to_string(),
        });
    }

    entries
}
