//! How `execute` script payloads are shown to the operator.

use std::borrow::Cow;

/// Characters kept by [`ScriptDisplay::truncated`].
pub const DEFAULT_MAX_SCRIPT_CHARS: usize = 100;

const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptDisplay {
    /// The whole script between `--- EXECUTE SCRIPT ---` banners.
    #[default]
    Full,
    /// The first `max_chars` characters on a single line.
    Truncated { max_chars: usize },
}

impl ScriptDisplay {
    #[must_use]
    pub const fn truncated() -> Self {
        Self::Truncated {
            max_chars: DEFAULT_MAX_SCRIPT_CHARS,
        }
    }

    /// Renders a received script. The result may span multiple lines.
    #[must_use]
    pub fn render(&self, script: &str) -> String {
        match self {
            Self::Full => format!("--- EXECUTE SCRIPT ---\n{script}\n--- END SCRIPT ---"),
            Self::Truncated { max_chars } => format!(
                "Received script to execute:\n{}",
                truncate_script(script, *max_chars)
            ),
        }
    }
}

/// Keeps the first `max_chars` characters of `script`, appending `...` if
/// anything was cut.
#[must_use]
pub fn truncate_script(script: &str, max_chars: usize) -> Cow<'_, str> {
    match script.char_indices().nth(max_chars) {
        Some((end, _)) => Cow::Owned(format!("{}{TRUNCATION_MARKER}", &script[..end])),
        None => Cow::Borrowed(script),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test_log::test]
    fn short_script_is_kept_whole() {
        assert_eq!(truncate_script("print('hi')", 100), "print('hi')");
    }

    #[test_log::test]
    fn script_of_exactly_max_chars_has_no_marker() {
        let script = "a".repeat(100);
        assert_eq!(truncate_script(&script, 100), script);
    }

    #[test_log::test]
    fn long_script_keeps_prefix_and_marker() {
        let script = format!("{}{}", "a".repeat(100), "b".repeat(50));
        assert_eq!(
            truncate_script(&script, 100),
            format!("{}...", "a".repeat(100))
        );
    }

    #[test_log::test]
    fn truncation_counts_chars_not_bytes() {
        let script = "é".repeat(101);
        let truncated = truncate_script(&script, 100);
        assert_eq!(truncated.chars().count(), 103);
        assert!(truncated.starts_with(&"é".repeat(100)));
        assert!(truncated.ends_with("..."));
    }

    #[test_log::test]
    fn full_render_wraps_script_in_banners() {
        assert_eq!(
            ScriptDisplay::Full.render("line1\nline2"),
            "--- EXECUTE SCRIPT ---\nline1\nline2\n--- END SCRIPT ---"
        );
    }

    #[test_log::test]
    fn truncated_render_has_header_line() {
        let rendered = ScriptDisplay::truncated().render(&"x".repeat(250));
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("Received script to execute:"));
        assert_eq!(lines.next(), Some(format!("{}...", "x".repeat(100)).as_str()));
        assert_eq!(lines.next(), None);
    }
}
