//! Parsing of the conditional request headers.

use axum::http::header::{HeaderName, IF_MATCH, IF_NONE_MATCH};
use axum::http::HeaderMap;

use precondition::Token;

use crate::error::ApiError;

/// Returns the version token presented in `If-Match`, if any.
///
/// A single entity tag is expected, quoted or bare. Anything else, weak tags
/// and `*` included, is passed through as-is and will never match a current
/// token, so the update fails its precondition.
///
/// A blank header, or an empty quoted tag, counts as no token at all.
pub(crate) fn if_match(headers: &HeaderMap) -> Result<Option<Token>, ApiError> {
    let Some(value) = header_str(headers, IF_MATCH)? else {
        return Ok(None);
    };

    match unquote(value.trim()).trim() {
        "" => Ok(None),
        tag => Ok(Some(Token::from(tag))),
    }
}

/// Returns whether `If-None-Match` matches `current`, using weak comparison.
pub(crate) fn if_none_match(headers: &HeaderMap, current: &Token) -> Result<bool, ApiError> {
    let Some(value) = header_str(headers, IF_NONE_MATCH)? else {
        return Ok(false);
    };

    Ok(value.split(',').map(str::trim).any(|tag| {
        tag == "*" || unquote(tag.strip_prefix("W/").unwrap_or(tag)) == current.as_str()
    }))
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Result<Option<&str>, ApiError> {
    headers
        .get(&name)
        .map(|value| value.to_str().map_err(|_| ApiError::InvalidHeader(name.clone())))
        .transpose()
}

fn unquote(tag: &str) -> &str {
    tag.strip_prefix('"')
        .and_then(|tag| tag.strip_suffix('"'))
        .unwrap_or(tag)
}

#[cfg(test)]
mod test {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(name: HeaderName, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn if_match_is_optional() {
        assert_eq!(None, if_match(&HeaderMap::new()).unwrap());
    }

    #[test]
    fn blank_if_match_counts_as_missing() {
        for blank in ["", "   ", "\"\"", " \" \" "] {
            assert_eq!(None, if_match(&headers(IF_MATCH, blank)).unwrap(), "{blank:?}");
        }
    }

    #[test]
    fn if_match_accepts_quoted_and_bare_tags() {
        assert_eq!(
            Some(Token::from("abc")),
            if_match(&headers(IF_MATCH, "\"abc\"")).unwrap()
        );
        assert_eq!(
            Some(Token::from("abc")),
            if_match(&headers(IF_MATCH, " abc ")).unwrap()
        );
    }

    #[test]
    fn if_match_keeps_weak_tags_verbatim() {
        assert_eq!(
            Some(Token::from("W/\"abc\"")),
            if_match(&headers(IF_MATCH, "W/\"abc\"")).unwrap()
        );
    }

    #[test]
    fn if_none_match_uses_weak_comparison_over_lists() {
        let current = Token::from("abc");

        assert!(!if_none_match(&HeaderMap::new(), &current).unwrap());
        assert!(if_none_match(&headers(IF_NONE_MATCH, "\"abc\""), &current).unwrap());
        assert!(if_none_match(&headers(IF_NONE_MATCH, "W/\"abc\""), &current).unwrap());
        assert!(if_none_match(&headers(IF_NONE_MATCH, "\"x\", \"abc\""), &current).unwrap());
        assert!(if_none_match(&headers(IF_NONE_MATCH, "*"), &current).unwrap());
        assert!(!if_none_match(&headers(IF_NONE_MATCH, "\"abd\""), &current).unwrap());
    }

    #[test]
    fn non_visible_header_values_are_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(IF_MATCH, HeaderValue::from_bytes(b"\xff").unwrap());

        assert!(matches!(
            if_match(&headers),
            Err(ApiError::InvalidHeader(_))
        ));
    }
}
