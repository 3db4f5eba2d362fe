//! Input normalization for targets and requested codes.

use crate::store::types::StoreError;

/// Trim the target and reject empty input.
pub(crate) fn sanitize_target(target: String) -> Result<String, StoreError> {
    let trimmed = target.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation("URL is required".to_string()));
    }
    if trimmed.len() == target.len() {
        Ok(target)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Characters that would end the path segment of a short URL.
const RESERVED_CODE_CHARS: [char; 3] = ['/', '?', '#'];

/// Normalize a requested code: trim, then collapse each whitespace run into a single `-`.
///
/// Returns `Ok(None)` when nothing usable remains, in which case a code is generated instead.
/// Codes containing `/`, `?` or `#` are rejected because their short URL would not route back.
pub(crate) fn normalize_code(requested: Option<String>) -> Result<Option<String>, StoreError> {
    let Some(requested) = requested else {
        return Ok(None);
    };
    let parts: Vec<&str> = requested.split_whitespace().collect();
    if parts.is_empty() {
        return Ok(None);
    }
    let code = parts.join("-");
    if code.contains(RESERVED_CODE_CHARS) {
        return Err(StoreError::Validation(format!(
            "Shortened code '{code}' must not contain '/', '?' or '#'"
        )));
    }
    Ok(Some(code))
}

/// Build the display URL for `code` under `base_url`.
pub(crate) fn short_url(base_url: &str, code: &str) -> String {
    format!("{base_url}/{code}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(requested: &str) -> Option<String> {
        normalize_code(Some(requested.to_string())).unwrap()
    }

    #[test]
    fn normalize_code_replaces_inner_whitespace_runs() {
        assert_eq!(normalized("my link").as_deref(), Some("my-link"));
        assert_eq!(
            normalized("  my \t\n  big link ").as_deref(),
            Some("my-big-link")
        );
    }

    #[test]
    fn normalize_code_keeps_case_and_punctuation() {
        assert_eq!(normalized("Ex_1.v2").as_deref(), Some("Ex_1.v2"));
    }

    #[test]
    fn normalize_code_treats_blank_as_absent() {
        assert!(normalize_code(None).unwrap().is_none());
        assert!(normalized("").is_none());
        assert!(normalized("   ").is_none());
    }

    #[test]
    fn normalize_code_rejects_url_delimiters() {
        for requested in ["a/b", "a?x", "a#top", "a/b?x"] {
            assert!(
                matches!(
                    normalize_code(Some(requested.into())),
                    Err(StoreError::Validation(_))
                ),
                "{requested} should be rejected"
            );
        }
    }

    #[test]
    fn sanitize_target_trims_and_rejects_empty() {
        assert_eq!(
            sanitize_target("  https://example.com ".into()).unwrap(),
            "https://example.com"
        );
        assert!(matches!(
            sanitize_target(String::new()),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            sanitize_target(" \t".into()),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn short_url_joins_base_and_code() {
        assert_eq!(
            short_url("http://localhost:3000", "ex1"),
            "http://localhost:3000/ex1"
        );
    }
}
