//! Contains the types necessary for Optimistic Locking through
//! content-derived version tokens (entity tags).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Error returned by [`Token::compute`] when the resource content
/// cannot be serialized into its canonical form.
#[derive(Debug, thiserror::Error)]
#[error("failed to serialize resource content for token computation: {0}")]
pub struct TokenError(#[from] serde_json::Error);

/// An opaque version token used for Optimistic Locking.
///
/// A [`Token`] is the hex-encoded SHA-256 digest of the canonical serialization
/// of a resource. It is never persisted: it is recomputed from the resource
/// content every time it is needed, so it only identifies the content state
/// it was derived from.
///
/// Tokens can be compared for equality, never for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Length of the hex-encoded digest.
    pub const LEN: usize = 64;

    /// Computes the [`Token`] of the specified content.
    ///
    /// Every field participates, timestamps included. Object keys are emitted
    /// in sorted order, so the result does not depend on field declaration
    /// or map iteration order.
    pub fn compute<T>(content: &T) -> Result<Self, TokenError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(content)?;

        let mut canonical = Vec::new();
        write_canonical(&value, &mut canonical)?;

        Ok(Self(hex::encode(Sha256::digest(&canonical))))
    }

    /// Returns the token as a string slice, without quotes.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the token formatted as a strong entity-tag, i.e. `"<digest>"`.
    pub fn to_entity_tag(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

// Emits compact JSON with object keys sorted by name. `serde_json::Map`
// ordering depends on the `preserve_order` feature, which any crate in the
// dependency graph may turn on, so the order is enforced here.
fn write_canonical(value: &Value, out: &mut Vec<u8>) -> Result<(), serde_json::Error> {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

            out.push(b'{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, key)?;
                out.push(b':');
                write_canonical(value, out)?;
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical(item, out)?;
            }
            out.push(b']');
        }
        scalar => serde_json::to_writer(&mut *out, scalar)?,
    }

    Ok(())
}

/// This error is returned when the version token presented by a caller
/// does not match the current token of the resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("conflict error detected, expected version was: {expected}, found: {actual}")]
pub struct ConflictError {
    /// The [`Token`] presented by the caller.
    pub expected: Token,

    /// The actual [`Token`] of the resource at the time of the check.
    pub actual: Token,
}

#[cfg(test)]
mod test {
    use serde::Serialize;
    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    struct Forward {
        id: u64,
        name: &'static str,
        total: f64,
    }

    #[derive(Serialize)]
    struct Backward {
        total: f64,
        name: &'static str,
        id: u64,
    }

    #[test]
    fn compute_is_deterministic() {
        let content = json!({ "id": 1, "co2_total": 1500.5 });

        let first = Token::compute(&content).expect("token should be computed");
        let second = Token::compute(&content).expect("token should be computed");

        assert_eq!(first, second);
        assert_eq!(Token::LEN, first.as_str().len());
    }

    #[test]
    fn compute_ignores_field_declaration_order() {
        let forward = Forward {
            id: 7,
            name: "report",
            total: 12.5,
        };
        let backward = Backward {
            total: 12.5,
            name: "report",
            id: 7,
        };

        assert_eq!(
            Token::compute(&forward).unwrap(),
            Token::compute(&backward).unwrap()
        );
    }

    #[test]
    fn compute_is_sensitive_to_every_field() {
        let base = json!({
            "id": 1,
            "co2_total": 1500.5,
            "updated_at": "2023-12-20T14:30:00Z",
            "tags": ["a", "b"],
        });

        let variants = [
            json!({ "id": 2, "co2_total": 1500.5, "updated_at": "2023-12-20T14:30:00Z", "tags": ["a", "b"] }),
            json!({ "id": 1, "co2_total": 1500.6, "updated_at": "2023-12-20T14:30:00Z", "tags": ["a", "b"] }),
            json!({ "id": 1, "co2_total": 1500.5, "updated_at": "2023-12-20T14:30:01Z", "tags": ["a", "b"] }),
            json!({ "id": 1, "co2_total": 1500.5, "updated_at": "2023-12-20T14:30:00Z", "tags": ["b", "a"] }),
            json!({ "id": 1, "co2_total": 1500.5, "updated_at": "2023-12-20T14:30:00Z" }),
        ];

        let base_token = Token::compute(&base).unwrap();
        for variant in &variants {
            assert_ne!(base_token, Token::compute(variant).unwrap(), "{variant}");
        }
    }

    #[test]
    fn entity_tag_is_quoted() {
        let token = Token::from("abc");

        assert_eq!("\"abc\"", token.to_entity_tag());
        assert_eq!("abc", token.to_string());
    }
}
