//! Entity scoping for roles and permissions.
//!
//! A scope narrows a grant to one external resource identified by an
//! `(entity_id, entity_type)` pair. Absence of a scope means global access.

use rolegate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// External resource a role or permission is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityScope {
    entity_id: String,
    entity_type: String,
}

impl EntityScope {
    /// Creates a scope for one external entity.
    pub fn new(entity_id: impl Into<String>, entity_type: impl Into<String>) -> AppResult<Self> {
        let entity_id = entity_id.into();
        let entity_type = entity_type.into();

        if entity_id.trim().is_empty() || entity_type.trim().is_empty() {
            return Err(AppError::Validation(
                "entity scope requires a non-empty entity id and entity type".to_owned(),
            ));
        }

        Ok(Self {
            entity_id,
            entity_type,
        })
    }

    /// Builds an optional scope from nullable storage or transport columns.
    ///
    /// Both parts must be present together or absent together.
    pub fn from_parts(
        entity_id: Option<String>,
        entity_type: Option<String>,
    ) -> AppResult<Option<Self>> {
        match (entity_id, entity_type) {
            (None, None) => Ok(None),
            (Some(entity_id), Some(entity_type)) => Self::new(entity_id, entity_type).map(Some),
            (Some(_), None) => Err(AppError::Validation(
                "entity id was given without an entity type".to_owned(),
            )),
            (None, Some(_)) => Err(AppError::Validation(
                "entity type was given without an entity id".to_owned(),
            )),
        }
    }

    /// Returns the external entity identifier.
    #[must_use]
    pub fn entity_id(&self) -> &str {
        self.entity_id.as_str()
    }

    /// Returns the external entity type.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        self.entity_type.as_str()
    }

    /// Decides whether a stored scope satisfies a requested scope.
    ///
    /// An unscoped request is a full-access check and only accepts unscoped
    /// grants. A scoped request accepts unscoped grants and grants bound to
    /// exactly the same entity.
    #[must_use]
    pub fn matches_request(stored: Option<&Self>, requested: Option<&Self>) -> bool {
        match (stored, requested) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(stored), Some(requested)) => stored == requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::EntityScope;

    fn scope(entity_id: &str, entity_type: &str) -> EntityScope {
        EntityScope::new(entity_id, entity_type).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn partial_scope_is_rejected() {
        assert!(EntityScope::from_parts(Some("42".to_owned()), None).is_err());
        assert!(EntityScope::from_parts(None, Some("doc".to_owned())).is_err());
    }

    #[test]
    fn absent_parts_build_no_scope() {
        assert!(matches!(EntityScope::from_parts(None, None), Ok(None)));
    }

    #[test]
    fn global_grant_satisfies_unscoped_request() {
        assert!(EntityScope::matches_request(None, None));
    }

    #[test]
    fn scoped_grant_never_satisfies_unscoped_request() {
        let stored = scope("42", "doc");
        assert!(!EntityScope::matches_request(Some(&stored), None));
    }

    #[test]
    fn scoped_grant_requires_identical_entity() {
        let stored = scope("42", "doc");
        assert!(EntityScope::matches_request(
            Some(&stored),
            Some(&scope("42", "doc"))
        ));
        assert!(!EntityScope::matches_request(
            Some(&stored),
            Some(&scope("42", "other"))
        ));
        assert!(!EntityScope::matches_request(
            Some(&stored),
            Some(&scope("43", "doc"))
        ));
    }

    fn part() -> impl Strategy<Value = String> {
        "[a-z0-9]{1,8}"
    }

    proptest! {
        #[test]
        fn global_grant_satisfies_any_request(entity_id in part(), entity_type in part()) {
            let requested = scope(&entity_id, &entity_type);
            prop_assert!(EntityScope::matches_request(None, Some(&requested)));
        }

        #[test]
        fn scoped_match_is_exact_equality(
            stored_id in part(),
            stored_type in part(),
            requested_id in part(),
            requested_type in part(),
        ) {
            let stored = scope(&stored_id, &stored_type);
            let requested = scope(&requested_id, &requested_type);
            let expected = stored_id == requested_id && stored_type == requested_type;
            prop_assert_eq!(
                EntityScope::matches_request(Some(&stored), Some(&requested)),
                expected
            );
        }
    }
}
