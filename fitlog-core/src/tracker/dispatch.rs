use log::{debug, error, warn};

use crate::db::models::EntityKind;
use crate::error::{ErrorKind, FitError};
use crate::interface::{Ack, Created, ErrorBody, Payload, Reply, Request};
use crate::tracker::Tracker;

impl Tracker {
    /// Execute one request. Failures come back as an [`ErrorBody`]; nothing
    /// here panics or tears down the tracker.
    pub async fn handle(&self, request: Request) -> Reply {
        debug!("Handling request: {:?}", request);
        self.execute(request).await.map_err(|e| {
            match e.kind() {
                ErrorKind::Storage => error!("Request failed: {}", e),
                ErrorKind::Empty => debug!("{}", e),
                _ => warn!("Request rejected: {}", e),
            }
            ErrorBody::from(e)
        })
    }

    async fn execute(&self, request: Request) -> Result<Payload, FitError> {
        use EntityKind::*;

        let payload = match request {
            Request::CreateWorkout(new) => {
                Payload::Created(Created::new(Workout, self.create_workout(&new).await?))
            }
            Request::ListWorkouts => Payload::Workouts(self.list_workouts().await?),
            Request::GetWorkout { id } => Payload::Workout(self.get_workout(id).await?),
            Request::UpdateWorkout { id, patch } => {
                self.update_workout(id, &patch).await?;
                Payload::Ack(Ack::updated(Workout))
            }
            Request::DeleteWorkout { id } => {
                self.delete_workout(id).await?;
                Payload::Ack(Ack::deleted(Workout))
            }

            Request::CreateExercise(new) => {
                Payload::Created(Created::new(Exercise, self.create_exercise(&new).await?))
            }
            Request::ListExercises => Payload::Exercises(self.list_exercises().await?),
            Request::GetExercise { id } => Payload::Exercise(self.get_exercise(id).await?),
            Request::UpdateExercise { id, patch } => {
                self.update_exercise(id, &patch).await?;
                Payload::Ack(Ack::updated(Exercise))
            }
            Request::DeleteExercise { id } => {
                self.delete_exercise(id).await?;
                Payload::Ack(Ack::deleted(Exercise))
            }

            Request::CreateProgress(new) => {
                Payload::Created(Created::new(Progress, self.create_progress(&new).await?))
            }
            Request::ListProgress => Payload::ProgressEntries(self.list_progress().await?),
            Request::GetProgress { id } => Payload::Progress(self.get_progress(id).await?),
            Request::UpdateProgress { id, patch } => {
                self.update_progress(id, &patch).await?;
                Payload::Ack(Ack::updated(Progress))
            }
            Request::DeleteProgress { id } => {
                self.delete_progress(id).await?;
                Payload::Ack(Ack::deleted(Progress))
            }

            Request::CreateWorkoutExercise(new) => Payload::Created(Created::new(
                WorkoutExercise,
                self.add_exercise_to_workout(&new).await?,
            )),
            Request::ListWorkoutExercises => {
                Payload::WorkoutExercises(self.list_workout_exercises().await?)
            }
            Request::GetWorkoutExercise { id } => {
                Payload::WorkoutExercise(self.get_workout_exercise(id).await?)
            }
            Request::UpdateWorkoutExercise { id, patch } => {
                self.update_workout_exercise(id, &patch).await?;
                Payload::Ack(Ack::updated(WorkoutExercise))
            }
            Request::DeleteWorkoutExercise { id } => {
                self.remove_exercise_from_workout(id).await?;
                Payload::Ack(Ack::deleted(WorkoutExercise))
            }
            Request::GetWorkoutExercises { workout_id } => {
                Payload::WorkoutExerciseDetails(self.get_workout_exercises(workout_id).await?)
            }

            Request::WorkoutStats => Payload::WorkoutStats(self.workout_stats().await?),
            Request::ProgressStats => Payload::ProgressStats(self.progress_stats().await?),
        };
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{NewExercise, NewWorkout, NewWorkoutExercise, WorkoutPatch};
    use chrono::NaiveDate;
    use serde_json::json;

    fn run() -> NewWorkout {
        NewWorkout {
            title: "Tempo run".into(),
            workout_type: "cardio".into(),
            duration_minutes: 45,
            calories_burned: Some(400),
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_reply_names_the_new_id() {
        let tracker = Tracker::open_in_memory().await.unwrap();
        let reply = tracker.handle(Request::CreateWorkout(run())).await.unwrap();
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"workout_id": 1, "message": "Workout created"})
        );
    }

    #[tokio::test]
    async fn empty_list_is_an_empty_error_body() {
        let tracker = Tracker::open_in_memory().await.unwrap();
        let body = tracker.handle(Request::ListExercises).await.unwrap_err();
        assert_eq!(body.kind, ErrorKind::Empty);
        assert_eq!(body.error, "no exercises recorded");
    }

    #[tokio::test]
    async fn failures_leave_the_tracker_usable() {
        let tracker = Tracker::open_in_memory().await.unwrap();

        let missing = tracker
            .handle(Request::UpdateWorkout {
                id: 77,
                patch: WorkoutPatch {
                    title: Some("x".into()),
                    ..Default::default()
                },
            })
            .await
            .unwrap_err();
        assert_eq!(missing.kind, ErrorKind::NotFound);

        let dangling = tracker
            .handle(Request::CreateWorkoutExercise(NewWorkoutExercise {
                workout_id: 999_999,
                exercise_id: 1,
                sets: None,
                reps: None,
                weight_kg: None,
                duration_seconds: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(dangling.kind, ErrorKind::NotFound);

        tracker
            .handle(Request::CreateExercise(NewExercise {
                name: "Burpee".into(),
                description: None,
                muscle_group: None,
            }))
            .await
            .unwrap();
        let listed = tracker.handle(Request::ListExercises).await.unwrap();
        assert!(matches!(listed, Payload::Exercises(ref e) if e.len() == 1));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_acknowledges() {
        let tracker = Tracker::open_in_memory().await.unwrap();
        let reply = tracker
            .handle(Request::DeleteWorkout { id: 31337 })
            .await
            .unwrap();
        assert_eq!(reply, Payload::Ack(Ack::deleted(EntityKind::Workout)));
    }

    #[tokio::test]
    async fn stats_requests_return_stats_payloads() {
        let tracker = Tracker::open_in_memory().await.unwrap();
        tracker.handle(Request::CreateWorkout(run())).await.unwrap();

        let reply = tracker.handle(Request::WorkoutStats).await.unwrap();
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({
                "total_workouts": 1,
                "total_minutes": 45,
                "total_calories": 400,
                "workouts_by_type": [{"type": "cardio", "count": 1}]
            })
        );

        let reply = tracker.handle(Request::ProgressStats).await.unwrap();
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"weight_history": [], "muscle_mass_history": []})
        );
    }
}
