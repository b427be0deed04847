//! Read-only aggregate views.

use crate::db::models::{ProgressStats, WorkoutStats};
use crate::db::operations;
use crate::error::Result;
use crate::tracker::Tracker;

impl Tracker {
    /// Workout count, total minutes, total recorded calories and a count per type.
    pub async fn workout_stats(&self) -> Result<WorkoutStats> {
        operations::get_workout_stats(&self.db_pool).await
    }

    /// The latest weight and muscle-mass readings as two separate series.
    pub async fn progress_stats(&self) -> Result<ProgressStats> {
        operations::get_progress_stats(&self.db_pool).await
    }
}
