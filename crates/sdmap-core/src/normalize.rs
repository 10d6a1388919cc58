//! Key normalization.
//!
//! Whitespace is removed entirely (not collapsed to a single space) and the
//! result is uppercased, so `"Ct  Head "` and `"CTHEAD"` compare equal. Both
//! sides of every comparison go through the same function.

/// Canonical form of a free-text key field.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// [`normalize`] for possibly absent values; absent is empty.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Remove all whitespace without case folding (Modality cleaning).
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_interior_whitespace() {
        assert_eq!(normalize("  CT   Head\tw/o "), "CTHEADW/O");
        assert_eq!(normalize("Ct Head"), normalize("CT HEAD"));
    }

    #[test]
    fn absent_is_empty() {
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some(" mr ")), "MR");
    }

    #[test]
    fn strip_keeps_case() {
        assert_eq!(strip_whitespace("NM, Pt"), "NM,Pt");
    }

    #[test]
    fn non_ascii_is_case_folded() {
        assert_eq!(normalize("tête irm"), "TÊTEIRM");
        assert_eq!(normalize(&normalize("straße")), normalize("straße"));
    }
}
