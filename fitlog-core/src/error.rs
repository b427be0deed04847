use serde::{Deserialize, Serialize};
use sqlx::error::ErrorKind as DbErrorKind;

use crate::db::models::EntityKind;

pub type Result<T, E = FitError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FitError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: i64 },

    #[error("workout {workout_id} or exercise {exercise_id} not found")]
    MissingParent { workout_id: i64, exercise_id: i64 },

    #[error("no {} recorded", .0.plural())]
    Empty(EntityKind),

    #[error("workout {0} has no exercises")]
    NoWorkoutExercises(i64),

    #[error("{entity} already exists: {detail}")]
    Duplicate { entity: EntityKind, detail: String },

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Coarse classification of a [`FitError`], stable across messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Empty,
    Duplicate,
    Storage,
}

impl FitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FitError::Validation(_) => ErrorKind::Validation,
            FitError::NotFound { .. } | FitError::MissingParent { .. } => ErrorKind::NotFound,
            FitError::Empty(_) | FitError::NoWorkoutExercises(_) => ErrorKind::Empty,
            FitError::Duplicate { .. } => ErrorKind::Duplicate,
            FitError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Maps constraint failures raised while writing `entity` rows.
    ///
    /// Unique violations become [`FitError::Duplicate`]; anything else stays a
    /// storage fault.
    pub fn from_write(entity: EntityKind, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.kind() == DbErrorKind::UniqueViolation {
                return FitError::Duplicate {
                    entity,
                    detail: db_err.message().to_string(),
                };
            }
        }
        FitError::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_related_variants() {
        let missing = FitError::MissingParent {
            workout_id: 999_999,
            exercise_id: 1,
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(FitError::NoWorkoutExercises(3).kind(), ErrorKind::Empty);
        assert_eq!(
            FitError::Storage(sqlx::Error::RowNotFound).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn messages_are_human_readable() {
        let err = FitError::NotFound {
            entity: EntityKind::Progress,
            id: 4,
        };
        assert_eq!(err.to_string(), "progress entry 4 not found");
        assert_eq!(
            FitError::Empty(EntityKind::Workout).to_string(),
            "no workouts recorded"
        );
    }

    #[test]
    fn non_database_errors_stay_storage() {
        let err = FitError::from_write(EntityKind::Exercise, sqlx::Error::PoolTimedOut);
        assert!(matches!(err, FitError::Storage(_)));
    }
}
