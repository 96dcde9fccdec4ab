//! Discharge-summary preview derivation.
//!
//! The case list shows a short slice of each discharge summary so a case can
//! be recognised at a glance. The derivation is fixed: first 80 characters of
//! the source text, then whitespace runs collapsed to single spaces. It is a
//! display-only value and is never compared against the answer key's stored
//! preview.

/// Maximum number of source characters taken before whitespace collapsing.
pub const PREVIEW_CHARS: usize = 80;

/// Derive the display preview of a discharge-summary text.
///
/// Takes the first [`PREVIEW_CHARS`] characters, then collapses every
/// whitespace run (including newlines) to a single space and drops leading
/// and trailing whitespace. Applying the derivation to its own output yields
/// the same string.
pub fn dis_preview(text: &str) -> String {
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    head.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through() {
        assert_eq!(dis_preview("CHF patient admitted"), "CHF patient admitted");
    }

    #[test]
    fn caps_at_eighty_source_characters() {
        let text = "x".repeat(200);
        assert_eq!(dis_preview(&text).chars().count(), PREVIEW_CHARS);
    }

    #[test]
    fn collapses_whitespace_runs() {
        let preview = dis_preview("CHF  patient\n\nadmitted\twith   dyspnea");
        assert_eq!(preview, "CHF patient admitted with dyspnea");
        assert!(!preview.contains("  "));
    }

    #[test]
    fn drops_leading_and_trailing_whitespace() {
        assert_eq!(dis_preview("  CHF patient  "), "CHF patient");
    }

    #[test]
    fn derivation_is_idempotent() {
        let text = "  CHF   patient\nadmitted with worsening dyspnea over three days, \
                    bilateral crackles on exam,  elevated BNP";
        let once = dis_preview(text);
        let twice = dis_preview(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "心衰竭".repeat(50);
        assert_eq!(dis_preview(&text).chars().count(), PREVIEW_CHARS);
    }

    #[test]
    fn empty_text_yields_empty_preview() {
        assert_eq!(dis_preview(""), "");
        assert_eq!(dis_preview("   \n\t "), "");
    }
}
