//! Request permission policy.
//!
//! The policy is a pure predicate of (operation, auth-state): anonymous
//! callers may read, mutation requires an authenticated caller. Role labels
//! carry no extra weight in the base contract.

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

/// Whether `auth` may perform `operation`.
pub fn is_permitted(operation: Operation, auth: AuthState) -> bool {
    match operation {
        Operation::List | Operation::Retrieve => true,
        Operation::Create | Operation::Update | Operation::Delete => {
            auth == AuthState::Authenticated
        }
    }
}

/// Guard used by handlers before any state is touched.
pub fn require(operation: Operation, auth: AuthState) -> Result<(), AppError> {
    if is_permitted(operation, auth) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(
            "Authentication credentials were not provided.".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_callers_are_read_only() {
        assert!(is_permitted(Operation::List, AuthState::Anonymous));
        assert!(is_permitted(Operation::Retrieve, AuthState::Anonymous));
        assert!(!is_permitted(Operation::Create, AuthState::Anonymous));
        assert!(!is_permitted(Operation::Update, AuthState::Anonymous));
        assert!(!is_permitted(Operation::Delete, AuthState::Anonymous));
    }

    #[test]
    fn authenticated_callers_may_do_everything() {
        for op in [
            Operation::List,
            Operation::Retrieve,
            Operation::Create,
            Operation::Update,
            Operation::Delete,
        ] {
            assert!(is_permitted(op, AuthState::Authenticated));
        }
    }

    #[test]
    fn require_maps_denial_to_permission_error() {
        let err = require(Operation::Delete, AuthState::Anonymous).unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
        assert!(require(Operation::Delete, AuthState::Authenticated).is_ok());
    }
}
