//! HTTP handlers. Each one turns path and body into a [`Request`] and maps
//! the [`Reply`](fitlog::interface::Reply) onto a status code.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use fitlog::db::models::{
    ExercisePatch, NewExercise, NewProgress, NewWorkout, NewWorkoutExercise, ProgressPatch,
    WorkoutExercisePatch, WorkoutPatch,
};
use fitlog::interface::{ErrorBody, Request};
use fitlog::{ErrorKind, Tracker};

/// Empty listings are answered with 200 and the error body.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Empty => StatusCode::OK,
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Duplicate => StatusCode::CONFLICT,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn dispatch(tracker: &Tracker, request: Request) -> Response {
    match tracker.handle(request).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(body) => (status_for(body.kind), Json(body)).into_response(),
    }
}

fn rejected(message: String) -> Response {
    log::warn!("Rejected request: {}", message);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody::with_display(ErrorKind::Validation, message)),
    )
        .into_response()
}

type IdPath = Result<Path<i64>, PathRejection>;
type Body<T> = Result<Json<T>, JsonRejection>;

async fn dispatch_body<T>(
    tracker: &Tracker,
    body: Body<T>,
    to_request: impl FnOnce(T) -> Request,
) -> Response {
    match body {
        Ok(Json(value)) => dispatch(tracker, to_request(value)).await,
        Err(rejection) => rejected(rejection.body_text()),
    }
}

async fn dispatch_id(
    tracker: &Tracker,
    path: IdPath,
    to_request: impl FnOnce(i64) -> Request,
) -> Response {
    match path {
        Ok(Path(id)) => dispatch(tracker, to_request(id)).await,
        Err(rejection) => rejected(rejection.body_text()),
    }
}

async fn dispatch_patch<T>(
    tracker: &Tracker,
    path: IdPath,
    body: Body<T>,
    to_request: impl FnOnce(i64, T) -> Request,
) -> Response {
    match (path, body) {
        (Ok(Path(id)), Ok(Json(patch))) => dispatch(tracker, to_request(id, patch)).await,
        (Err(rejection), _) => rejected(rejection.body_text()),
        (_, Err(rejection)) => rejected(rejection.body_text()),
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// Workouts
pub async fn create_workout(
    State(tracker): State<Tracker>,
    body: Body<NewWorkout>,
) -> Response {
    dispatch_body(&tracker, body, Request::CreateWorkout).await
}

pub async fn list_workouts(State(tracker): State<Tracker>) -> Response {
    dispatch(&tracker, Request::ListWorkouts).await
}

pub async fn get_workout(State(tracker): State<Tracker>, path: IdPath) -> Response {
    dispatch_id(&tracker, path, |id| Request::GetWorkout { id }).await
}

pub async fn update_workout(
    State(tracker): State<Tracker>,
    path: IdPath,
    body: Body<WorkoutPatch>,
) -> Response {
    dispatch_patch(&tracker, path, body, |id, patch| Request::UpdateWorkout { id, patch }).await
}

pub async fn delete_workout(State(tracker): State<Tracker>, path: IdPath) -> Response {
    dispatch_id(&tracker, path, |id| Request::DeleteWorkout { id }).await
}

// Exercises
pub async fn create_exercise(
    State(tracker): State<Tracker>,
    body: Body<NewExercise>,
) -> Response {
    dispatch_body(&tracker, body, Request::CreateExercise).await
}

pub async fn list_exercises(State(tracker): State<Tracker>) -> Response {
    dispatch(&tracker, Request::ListExercises).await
}

pub async fn get_exercise(State(tracker): State<Tracker>, path: IdPath) -> Response {
    dispatch_id(&tracker, path, |id| Request::GetExercise { id }).await
}

pub async fn update_exercise(
    State(tracker): State<Tracker>,
    path: IdPath,
    body: Body<ExercisePatch>,
) -> Response {
    dispatch_patch(&tracker, path, body, |id, patch| Request::UpdateExercise { id, patch }).await
}

pub async fn delete_exercise(State(tracker): State<Tracker>, path: IdPath) -> Response {
    dispatch_id(&tracker, path, |id| Request::DeleteExercise { id }).await
}

// Progress
pub async fn create_progress(
    State(tracker): State<Tracker>,
    body: Body<NewProgress>,
) -> Response {
    dispatch_body(&tracker, body, Request::CreateProgress).await
}

pub async fn list_progress(State(tracker): State<Tracker>) -> Response {
    dispatch(&tracker, Request::ListProgress).await
}

pub async fn get_progress(State(tracker): State<Tracker>, path: IdPath) -> Response {
    dispatch_id(&tracker, path, |id| Request::GetProgress { id }).await
}

pub async fn update_progress(
    State(tracker): State<Tracker>,
    path: IdPath,
    body: Body<ProgressPatch>,
) -> Response {
    dispatch_patch(&tracker, path, body, |id, patch| Request::UpdateProgress { id, patch }).await
}

pub async fn delete_progress(State(tracker): State<Tracker>, path: IdPath) -> Response {
    dispatch_id(&tracker, path, |id| Request::DeleteProgress { id }).await
}

// Workout exercises
pub async fn create_workout_exercise(
    State(tracker): State<Tracker>,
    body: Body<NewWorkoutExercise>,
) -> Response {
    dispatch_body(&tracker, body, Request::CreateWorkoutExercise).await
}

pub async fn list_workout_exercises(State(tracker): State<Tracker>) -> Response {
    dispatch(&tracker, Request::ListWorkoutExercises).await
}

/// `GET /workout-exercises/{workout_id}`: the path names the workout here,
/// while `PUT` and `DELETE` on the same path name the link itself.
pub async fn get_exercises_for_workout(
    State(tracker): State<Tracker>,
    path: IdPath,
) -> Response {
    dispatch_id(&tracker, path, |workout_id| Request::GetWorkoutExercises {
        workout_id,
    })
    .await
}

pub async fn update_workout_exercise(
    State(tracker): State<Tracker>,
    path: IdPath,
    body: Body<WorkoutExercisePatch>,
) -> Response {
    dispatch_patch(&tracker, path, body, |id, patch| Request::UpdateWorkoutExercise { id, patch }).await
}

pub async fn delete_workout_exercise(State(tracker): State<Tracker>, path: IdPath) -> Response {
    dispatch_id(&tracker, path, |id| Request::DeleteWorkoutExercise { id }).await
}

// Stats
pub async fn workout_stats(State(tracker): State<Tracker>) -> Response {
    dispatch(&tracker, Request::WorkoutStats).await
}

pub async fn progress_stats(State(tracker): State<Tracker>) -> Response {
    dispatch(&tracker, Request::ProgressStats).await
}
