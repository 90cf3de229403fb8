use std::str::FromStr;

use rolegate_core::AppError;
use serde::{Deserialize, Serialize};

/// Combinator applied across the permission names of one access check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    /// Every named permission must be held.
    #[default]
    And,
    /// At least one named permission must be held.
    Or,
}

impl JoinType {
    /// Returns a stable transport value for this join type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Returns whether evaluation stops after a check with this outcome.
    #[must_use]
    pub fn short_circuits_on(&self, outcome: bool) -> bool {
        match self {
            Self::And => !outcome,
            Self::Or => outcome,
        }
    }
}

impl FromStr for JoinType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("and") {
            return Ok(Self::And);
        }
        if value.eq_ignore_ascii_case("or") {
            return Ok(Self::Or);
        }

        Err(AppError::Validation(format!(
            "join type must be either 'AND' or 'OR', got '{value}'"
        )))
    }
}
