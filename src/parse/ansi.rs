//! ANSI escape sequence removal

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// ESC followed by a single Fe byte, or a CSI sequence
/// (`ESC [`, parameter bytes, intermediate bytes, final byte 0x40-0x7E)
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("ANSI pattern is valid")
});

/// Strip terminal escape sequences, leaving every other character untouched
///
/// Returns the input unchanged (borrowed) when it holds no escapes, so
/// normalizing clean text is free and `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> Cow<'_, str> {
    ANSI_ESCAPE.replace_all(text, "")
}
