//! Template diff presentation.
//!
//! Inputs arrive already canonicalized (deep-stringified, pretty-printed)
//! so that encoding differences between sources do not show up as changes.
//! Line diffing is delegated to the `similar` crate; the unified headers
//! carry the caller's original locators instead of internal labels.

use owo_colors::OwoColorize;
use similar::TextDiff;

#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    /// Compare lines with whitespace runs collapsed (`diff -w` behavior).
    pub ignore_all_space: bool,
    pub color: bool,
}

/// Unified diff of two canonicalized template texts, labeled with the two
/// source locators. Equal inputs produce an empty string.
pub fn unified(old: &str, new: &str, old_label: &str, new_label: &str, opts: DiffOptions) -> String {
    let (old, new) = if opts.ignore_all_space {
        (collapse_whitespace(old), collapse_whitespace(new))
    } else {
        (old.to_string(), new.to_string())
    };

    let diff = TextDiff::from_lines(&old, &new);
    let unified = diff
        .unified_diff()
        .context_radius(3)
        .header(old_label, new_label)
        .to_string();

    if opts.color {
        colorize(&unified)
    } else {
        unified
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        out.push_str(&collapsed);
        out.push('\n');
    }
    out
}

fn colorize(unified: &str) -> String {
    let mut out = String::with_capacity(unified.len());
    for line in unified.lines() {
        if line.starts_with('-') {
            out.push_str(&line.red().to_string());
        } else if line.starts_with('+') {
            out.push_str(&line.green().to_string());
        } else if line.starts_with("@@") {
            out.push_str(&line.cyan().to_string());
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_inputs_yield_empty_diff() {
        let text = "{\n  \"a\": \"1\"\n}\n";
        assert_eq!(unified(text, text, "left", "right", DiffOptions::default()), "");
    }

    #[test]
    fn headers_carry_the_caller_labels() {
        let diff = unified(
            "a\n",
            "b\n",
            "template.json",
            "stack://my-stack",
            DiffOptions::default(),
        );
        assert!(diff.contains("--- template.json"));
        assert!(diff.contains("+++ stack://my-stack"));
        assert!(diff.contains("-a"));
        assert!(diff.contains("+b"));
    }

    #[test]
    fn whitespace_insensitive_mode_ignores_indentation() {
        let left = "{\n    \"a\": \"1\"\n}\n";
        let right = "{\n  \"a\":   \"1\"\n}\n";
        assert!(!unified(left, right, "l", "r", DiffOptions::default()).is_empty());
        assert_eq!(
            unified(
                left,
                right,
                "l",
                "r",
                DiffOptions {
                    ignore_all_space: true,
                    ..Default::default()
                }
            ),
            ""
        );
    }
}
