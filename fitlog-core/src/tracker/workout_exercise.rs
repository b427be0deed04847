//! Operations on the exercises recorded inside a workout.

use crate::db::models::{
    NewWorkoutExercise, WorkoutExercise, WorkoutExerciseDetail, WorkoutExercisePatch,
};
use crate::db::operations;
use crate::error::Result;
use crate::tracker::Tracker;

impl Tracker {
    /// Add an exercise to a workout. Both must already exist.
    pub async fn add_exercise_to_workout(&self, new: &NewWorkoutExercise) -> Result<i64> {
        operations::create_workout_exercise(&self.db_pool, new).await
    }

    pub async fn get_workout_exercise(&self, workout_exercise_id: i64) -> Result<WorkoutExercise> {
        operations::get_workout_exercise(&self.db_pool, workout_exercise_id).await
    }

    pub async fn list_workout_exercises(&self) -> Result<Vec<WorkoutExercise>> {
        operations::get_all_workout_exercises(&self.db_pool).await
    }

    /// Exercises of one workout joined with their names and muscle groups.
    pub async fn get_workout_exercises(&self, workout_id: i64) -> Result<Vec<WorkoutExerciseDetail>> {
        operations::get_exercises_for_workout(&self.db_pool, workout_id).await
    }

    pub async fn update_workout_exercise(
        &self,
        workout_exercise_id: i64,
        patch: &WorkoutExercisePatch,
    ) -> Result<()> {
        operations::update_workout_exercise(&self.db_pool, workout_exercise_id, patch).await
    }

    pub async fn remove_exercise_from_workout(&self, workout_exercise_id: i64) -> Result<u64> {
        operations::delete_workout_exercise(&self.db_pool, workout_exercise_id).await
    }
}
