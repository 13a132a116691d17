//! Restricted character set coercion for the rendering surface.
//!
//! The built-in PDF fonts cover Latin-1 only. Free text from the
//! remote tables (descriptions, quarterly updates) may carry anything,
//! so every string is coerced once at the surface boundary: characters
//! outside Latin-1 become `?`, matching the legacy report's output.

/// Replace every character outside Latin-1 with `?`.
pub fn latin1(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(latin1("Quarterly update."), "Quarterly update.");
    }

    #[test]
    fn test_latin1_accents_are_kept() {
        assert_eq!(latin1("Café Zürich"), "Café Zürich");
    }

    #[test]
    fn test_unsupported_characters_become_question_marks() {
        assert_eq!(latin1("growth 📈 of 10×"), "growth ? of 10×");
        assert_eq!(latin1("日本"), "??");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(latin1(""), "");
    }
}
