//! Patient-scope access control.
//!
//! [`ResourceAccessGuard`] decides whether a caller scoped to one patient may
//! act on a target patient identity. It runs before the service is called, so
//! a denied request has no side effects.

use crate::error::{RestError, RestResult};

/// The result of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The caller may proceed.
    Allow,
    /// The caller may not proceed, with a reason suitable for the client.
    Deny(String),
}

impl AccessDecision {
    /// Returns true if access is allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// Converts a denial into [`RestError::Unauthorized`].
    pub fn into_result(self) -> RestResult<()> {
        match self {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny(message) => Err(RestError::Unauthorized { message }),
        }
    }
}

/// Ownership guard for patient-scoped callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceAccessGuard;

impl ResourceAccessGuard {
    /// Decides whether `scope` may act on `target`.
    ///
    /// Denies only when both identities are present and differ. An unscoped
    /// caller, or a request naming no target, is always allowed.
    ///
    /// ```rust
    /// use patient_rest::guard::{AccessDecision, ResourceAccessGuard};
    ///
    /// assert!(ResourceAccessGuard::authorize(Some("a"), Some("a")).is_allowed());
    /// assert!(ResourceAccessGuard::authorize(None, Some("b")).is_allowed());
    /// assert!(!ResourceAccessGuard::authorize(Some("a"), Some("b")).is_allowed());
    /// ```
    pub fn authorize(scope: Option<&str>, target: Option<&str>) -> AccessDecision {
        match (scope, target) {
            (Some(scope), Some(target)) if scope != target => AccessDecision::Deny(format!(
                "You are not allowed to access patient {}.",
                target
            )),
            _ => AccessDecision::Allow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_only_when_both_present_and_different() {
        let cases = [
            (None, None, true),
            (Some("a"), None, true),
            (None, Some("b"), true),
            (Some("a"), Some("a"), true),
            (Some("a"), Some("b"), false),
        ];
        for (scope, target, allowed) in cases {
            assert_eq!(
                ResourceAccessGuard::authorize(scope, target).is_allowed(),
                allowed,
                "scope={:?} target={:?}",
                scope,
                target
            );
        }
    }

    #[test]
    fn test_deny_maps_to_unauthorized() {
        let err = ResourceAccessGuard::authorize(Some("a"), Some("b"))
            .into_result()
            .unwrap_err();
        match err {
            RestError::Unauthorized { message } => {
                assert_eq!(message, "You are not allowed to access patient b.")
            }
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }
}
