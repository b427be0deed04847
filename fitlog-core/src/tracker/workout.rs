//! Workout record operations.

use crate::db::models::{NewWorkout, Workout, WorkoutPatch};
use crate::db::operations;
use crate::error::Result;
use crate::tracker::Tracker;

impl Tracker {
    /// Create a workout and return its identifier.
    pub async fn create_workout(&self, new: &NewWorkout) -> Result<i64> {
        operations::create_workout(&self.db_pool, new).await
    }

    pub async fn get_workout(&self, workout_id: i64) -> Result<Workout> {
        operations::get_workout(&self.db_pool, workout_id).await
    }

    /// All workouts, most recent date first.
    pub async fn list_workouts(&self) -> Result<Vec<Workout>> {
        operations::get_all_workouts(&self.db_pool).await
    }

    /// Apply the fields present in `patch`; everything else is left as is.
    pub async fn update_workout(&self, workout_id: i64, patch: &WorkoutPatch) -> Result<()> {
        operations::update_workout(&self.db_pool, workout_id, patch).await
    }

    /// Delete a workout and its exercise links. Unknown ids are not an error.
    pub async fn delete_workout(&self, workout_id: i64) -> Result<u64> {
        operations::delete_workout(&self.db_pool, workout_id).await
    }
}
