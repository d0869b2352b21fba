//! Bearer token parsing

use http::{HeaderMap, header};

/// Outcome of reading the `Authorization` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BearerHeader {
    /// No `Authorization` header
    Absent,
    /// Header present but not `Bearer <token>`
    Malformed,
    /// Well-formed bearer token
    Token(String),
}

/// Read `Authorization: Bearer <token>`
///
/// The scheme is matched case-insensitively; the token must be a single
/// non-empty word.
pub fn parse_bearer(headers: &HeaderMap) -> BearerHeader {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return BearerHeader::Absent;
    };

    let Ok(value) = value.to_str() else {
        return BearerHeader::Malformed;
    };

    let Some((scheme, token)) = value.trim().split_once(' ') else {
        return BearerHeader::Malformed;
    };

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(' ') {
        return BearerHeader::Malformed;
    }

    BearerHeader::Token(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn with_auth(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_absent() {
        assert_eq!(parse_bearer(&HeaderMap::new()), BearerHeader::Absent);
    }

    #[test]
    fn test_token() {
        assert_eq!(
            parse_bearer(&with_auth("Bearer a.b.c")),
            BearerHeader::Token("a.b.c".to_string())
        );
        assert_eq!(
            parse_bearer(&with_auth("bearer a.b.c")),
            BearerHeader::Token("a.b.c".to_string())
        );
    }

    #[test]
    fn test_malformed() {
        assert_eq!(parse_bearer(&with_auth("Basic dXNlcjpwdw==")), BearerHeader::Malformed);
        assert_eq!(parse_bearer(&with_auth("Bearer")), BearerHeader::Malformed);
        assert_eq!(parse_bearer(&with_auth("Bearer ")), BearerHeader::Malformed);
        assert_eq!(parse_bearer(&with_auth("Bearer a b")), BearerHeader::Malformed);
        assert_eq!(parse_bearer(&with_auth("a.b.c")), BearerHeader::Malformed);
    }
}
