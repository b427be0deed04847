use crate::db::models::{NewProgress, Progress, ProgressPatch};
use crate::db::operations;
use crate::error::Result;
use crate::tracker::Tracker;

impl Tracker {
    pub async fn create_progress(&self, new: &NewProgress) -> Result<i64> {
        operations::create_progress(&self.db_pool, new).await
    }

    pub async fn get_progress(&self, progress_id: i64) -> Result<Progress> {
        operations::get_progress(&self.db_pool, progress_id).await
    }

    /// All measurements, most recent date first.
    pub async fn list_progress(&self) -> Result<Vec<Progress>> {
        operations::get_all_progress(&self.db_pool).await
    }

    pub async fn update_progress(&self, progress_id: i64, patch: &ProgressPatch) -> Result<()> {
        operations::update_progress(&self.db_pool, progress_id, patch).await
    }

    pub async fn delete_progress(&self, progress_id: i64) -> Result<u64> {
        operations::delete_progress(&self.db_pool, progress_id).await
    }
}
