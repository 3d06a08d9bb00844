//! Admission checks for conditional writes.
//!
//! A write is admitted only when the caller presents the [`Token`] of the
//! resource state it is about to replace. [`admit`] is a pure decision: it
//! holds no lock, so callers must run it inside the same critical section
//! that applies the mutation (see [`crate::store::InMemory`]).

use serde::Serialize;

use crate::version::{ConflictError, Token, TokenError};

/// All the reasons a conditional write can be rejected by [`admit`].
#[derive(Debug, thiserror::Error)]
pub enum PreconditionError {
    /// The caller did not present any version token.
    ///
    /// Recoverable by reading the resource and retrying with its token.
    #[error("a version token is required to update this resource")]
    Required,

    /// The caller presented a token that does not match the current state:
    /// the resource changed since the caller last read it.
    #[error("the resource was modified since it was last read: {0}")]
    Failed(#[from] ConflictError),

    /// The current token of the resource could not be computed.
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Decides whether a write presenting `client_token` may proceed against
/// the current state of `resource`.
///
/// The token of `resource` is recomputed on every call and returned when
/// the write is admitted.
pub fn admit<R>(resource: &R, client_token: Option<&Token>) -> Result<Token, PreconditionError>
where
    R: Serialize,
{
    let expected = client_token.ok_or(PreconditionError::Required)?;
    let actual = Token::compute(resource)?;

    if *expected != actual {
        return Err(PreconditionError::Failed(ConflictError {
            expected: expected.clone(),
            actual,
        }));
    }

    Ok(actual)
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn absent_token_is_always_required() {
        let resources = [json!({}), json!({ "id": 1 }), json!({ "id": 2, "co2_total": 10.0 })];

        for resource in &resources {
            let err = admit(resource, None).expect_err("admission should fail without token");
            assert!(matches!(err, PreconditionError::Required), "{err}");
        }
    }

    #[test]
    fn fresh_token_is_admitted() {
        let resource = json!({ "id": 1, "co2_total": 1500.5 });
        let token = Token::compute(&resource).unwrap();

        let admitted = admit(&resource, Some(&token)).expect("fresh token should be admitted");

        assert_eq!(token, admitted);
    }

    #[test]
    fn stale_token_fails_with_both_versions() {
        let before = json!({ "id": 1, "co2_total": 1500.5 });
        let after = json!({ "id": 1, "co2_total": 1650.0 });

        let stale = Token::compute(&before).unwrap();
        let current = Token::compute(&after).unwrap();

        match admit(&after, Some(&stale)) {
            Err(PreconditionError::Failed(err)) => assert_eq!(
                ConflictError {
                    expected: stale,
                    actual: current,
                },
                err
            ),
            other => panic!("expected precondition failure, received: {other:?}"),
        }
    }

    #[test]
    fn arbitrary_token_is_rejected() {
        let resource = json!({ "id": 1 });
        let err = admit(&resource, Some(&Token::from("v1"))).unwrap_err();

        assert!(matches!(err, PreconditionError::Failed(_)));
    }
}
