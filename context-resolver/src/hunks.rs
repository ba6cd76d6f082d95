//! Unified-diff hunk ranges.
//!
//! Turns a file patch into the new-file line ranges its hunks cover, which
//! is what callers feed to the resolver.
//!
//! Features:
//! - Works even if file headers (---/+++) are missing (hunks-only input).
//! - Ignores `\ No newline at end of file` marker lines.
//! - Omitted hunk counts default to 1, as in unified diff.
//! - A hunk ends once its header's old and new line counts are consumed, so
//!   file headers of a following patch section are never read as hunk lines.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

lazy_static! {
    static ref HUNK_HEADER: Regex =
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("valid hunk header regex");
}

/// Inclusive 1-based line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// New-file coverage of one hunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunkRange {
    /// The raw `@@ ... @@` header line.
    pub header: String,
    /// Every new-file line the hunk shows (context + added).
    pub lines: LineRange,
    /// First to last added line, `None` when the hunk only removes.
    pub added: Option<LineRange>,
}

struct OpenHunk {
    header: String,
    new_start: usize,
    new_len: usize,
    old_left: usize,
    new_left: usize,
    first_added: Option<usize>,
    last_added: Option<usize>,
}

impl OpenHunk {
    fn exhausted(&self) -> bool {
        self.old_left == 0 && self.new_left == 0
    }

    fn close(self) -> Option<HunkRange> {
        if self.new_len == 0 {
            return None;
        }
        let added = match (self.first_added, self.last_added) {
            (Some(a), Some(b)) => Some(LineRange::new(a, b)),
            _ => None,
        };
        Some(HunkRange {
            header: self.header,
            lines: LineRange::new(self.new_start, self.new_start + self.new_len - 1),
            added,
        })
    }
}

/// Parse a unified diff and return the new-file range of each hunk.
///
/// Pure deletions (new count 0) yield no range. Malformed headers are
/// skipped with a warning; the lines under them are ignored.
pub fn changed_line_ranges(diff: &str) -> Vec<HunkRange> {
    let mut out = Vec::new();
    let mut open: Option<OpenHunk> = None;
    let mut new_line = 0usize;

    for line in diff.lines() {
        if line.starts_with("@@") {
            if let Some(h) = open.take().and_then(OpenHunk::close) {
                out.push(h);
            }
            match parse_header(line) {
                Some(counts) => {
                    new_line = counts.new_start;
                    open = Some(OpenHunk {
                        header: line.to_string(),
                        new_start: counts.new_start,
                        new_len: counts.new_len,
                        old_left: counts.old_len,
                        new_left: counts.new_len,
                        first_added: None,
                        last_added: None,
                    });
                }
                None => warn!("skipping malformed hunk header: {line}"),
            }
            continue;
        }

        // A following file section ends the current hunk.
        if line.starts_with("diff --git ") {
            if let Some(h) = open.take().and_then(OpenHunk::close) {
                out.push(h);
            }
            continue;
        }

        let Some(hunk) = open.as_mut() else {
            // File headers and anything else between hunks.
            continue;
        };

        if line.starts_with("\\ ") {
            continue;
        }
        if line.starts_with('+') {
            hunk.first_added.get_or_insert(new_line);
            hunk.last_added = Some(new_line);
            hunk.new_left = hunk.new_left.saturating_sub(1);
            new_line += 1;
        } else if line.starts_with('-') {
            hunk.old_left = hunk.old_left.saturating_sub(1);
        } else {
            hunk.old_left = hunk.old_left.saturating_sub(1);
            hunk.new_left = hunk.new_left.saturating_sub(1);
            new_line += 1;
        }

        if hunk.exhausted() {
            if let Some(h) = open.take().and_then(OpenHunk::close) {
                out.push(h);
            }
        }
    }

    if let Some(h) = open.and_then(OpenHunk::close) {
        out.push(h);
    }
    out
}

/// Line counts announced by a hunk header.
struct HeaderCounts {
    old_len: usize,
    new_start: usize,
    new_len: usize,
}

fn parse_header(line: &str) -> Option<HeaderCounts> {
    let caps = HUNK_HEADER.captures(line)?;
    let count = |idx: usize| -> Option<usize> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(1),
        }
    };
    Some(HeaderCounts {
        old_len: count(2)?,
        new_start: caps.get(3)?.as_str().parse().ok()?,
        new_len: count(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PATCH: &str = "\
diff --git a/app.py b/app.py
--- a/app.py
+++ b/app.py
@@ -1,5 +1,6 @@ def a():
 def a():
-    x = 1
+    x = 2
+    y = 3
     return x


@@ -20,3 +21,0 @@ def b():
-    gone = True
-    also_gone = True
-    still_gone = True
@@ -30 +30 @@
-old
+new
\\ No newline at end of file
";

    #[test]
    fn ranges_follow_new_file_numbering() {
        let hunks = changed_line_ranges(PATCH);
        assert_eq!(hunks.len(), 2);

        assert_eq!(hunks[0].lines, LineRange::new(1, 6));
        assert_eq!(hunks[0].added, Some(LineRange::new(2, 3)));
        assert!(hunks[0].header.starts_with("@@ -1,5 +1,6 @@"));

        assert_eq!(hunks[1].lines, LineRange::new(30, 30));
        assert_eq!(hunks[1].added, Some(LineRange::new(30, 30)));
    }

    #[test]
    fn hunks_without_file_headers() {
        let hunks = changed_line_ranges("@@ -3,2 +3,2 @@\n a\n-b\n+c\n");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].lines, LineRange::new(3, 4));
        assert_eq!(hunks[0].added, Some(LineRange::new(4, 4)));
    }

    #[test]
    fn context_only_hunk_has_no_added_range() {
        let hunks = changed_line_ranges("@@ -3,2 +3,1 @@\n a\n-b\n");
        assert_eq!(hunks[0].added, None);
    }

    #[test]
    fn file_headers_after_a_hunk_are_not_hunk_lines() {
        let patch = "\
--- a/x.py
+++ b/x.py
@@ -1,1 +1,1 @@
-a
+b
--- a/y.py
+++ b/y.py
@@ -5,1 +5,1 @@
-c
+d
";
        let hunks = changed_line_ranges(patch);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].lines, LineRange::new(1, 1));
        assert_eq!(hunks[0].added, Some(LineRange::new(1, 1)));
        assert_eq!(hunks[1].lines, LineRange::new(5, 5));
        assert_eq!(hunks[1].added, Some(LineRange::new(5, 5)));
    }

    #[test]
    fn added_range_stays_inside_hunk() {
        let hunks = changed_line_ranges("@@ -1,1 +1,1 @@\n-a\n+b\n+++ b/next\n");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].added, Some(LineRange::new(1, 1)));
        let added = hunks[0].added.unwrap();
        assert!(added.end <= hunks[0].lines.end);
    }

    #[test]
    fn malformed_header_is_skipped() {
        assert!(changed_line_ranges("@@ nonsense @@\n+x\n").is_empty());
    }
}
