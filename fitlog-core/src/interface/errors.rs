use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, FitError};

/// What a caller sees when an operation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: ErrorKind,
}

impl From<&FitError> for ErrorBody {
    fn from(e: &FitError) -> Self {
        ErrorBody {
            error: e.to_string(),
            kind: e.kind(),
        }
    }
}

impl From<FitError> for ErrorBody {
    fn from(e: FitError) -> Self {
        ErrorBody::from(&e)
    }
}

impl ErrorBody {
    pub fn with_display<D: std::fmt::Display>(kind: ErrorKind, d: D) -> Self {
        ErrorBody {
            error: d.to_string(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::EntityKind;

    #[test]
    fn body_carries_message_and_kind() {
        let body = ErrorBody::from(FitError::NotFound {
            entity: EntityKind::Workout,
            id: 9,
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "workout 9 not found", "kind": "not_found"})
        );
    }
}
