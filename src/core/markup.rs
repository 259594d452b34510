//! `**bold**` markers in user-facing messages.

use regex::Regex;
use std::sync::OnceLock;

fn bold() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("static regex"))
}

/// Render `**x**` as `<strong>x</strong>` for HTML surfaces.
pub fn render_markup(message: &str) -> String {
    bold().replace_all(message, "<strong>$1</strong>").into_owned()
}

/// Drop `**` markers for plain-text surfaces.
pub fn strip_markup(message: &str) -> String {
    bold().replace_all(message, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_strong() {
        assert_eq!(
            render_markup("on **REGTEST**, not **MAINNET**"),
            "on <strong>REGTEST</strong>, not <strong>MAINNET</strong>"
        );
    }

    #[test]
    fn strips_markers() {
        assert_eq!(strip_markup("**0 balance** left"), "0 balance left");
        assert_eq!(strip_markup("plain"), "plain");
    }
}
