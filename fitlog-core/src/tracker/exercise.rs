use crate::db::models::{Exercise, ExercisePatch, NewExercise};
use crate::db::operations;
use crate::error::Result;
use crate::tracker::Tracker;

impl Tracker {
    pub async fn create_exercise(&self, new: &NewExercise) -> Result<i64> {
        operations::create_exercise(&self.db_pool, new).await
    }

    pub async fn get_exercise(&self, exercise_id: i64) -> Result<Exercise> {
        operations::get_exercise(&self.db_pool, exercise_id).await
    }

    pub async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        operations::get_all_exercises(&self.db_pool).await
    }

    pub async fn update_exercise(&self, exercise_id: i64, patch: &ExercisePatch) -> Result<()> {
        operations::update_exercise(&self.db_pool, exercise_id, patch).await
    }

    /// Delete an exercise and remove it from every workout that used it.
    pub async fn delete_exercise(&self, exercise_id: i64) -> Result<u64> {
        operations::delete_exercise(&self.db_pool, exercise_id).await
    }
}
