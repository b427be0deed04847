use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::error::FitError;

/// The four record kinds the store keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Workout,
    Exercise,
    Progress,
    WorkoutExercise,
}

impl EntityKind {
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Workout => "workouts",
            EntityKind::Exercise => "exercises",
            EntityKind::Progress => "progress",
            EntityKind::WorkoutExercise => "workout_exercises",
        }
    }

    /// Name of the identifier field in serialized records.
    pub fn id_field(self) -> &'static str {
        match self {
            EntityKind::Workout => "workout_id",
            EntityKind::Exercise => "exercise_id",
            EntityKind::Progress => "progress_id",
            EntityKind::WorkoutExercise => "workout_exercise_id",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Workout => "workouts",
            EntityKind::Exercise => "exercises",
            EntityKind::Progress => "progress entries",
            EntityKind::WorkoutExercise => "workout exercises",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Workout => "workout",
            EntityKind::Exercise => "exercise",
            EntityKind::Progress => "progress entry",
            EntityKind::WorkoutExercise => "workout exercise",
        };
        write!(f, "{}", label)
    }
}

// Workout models
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    #[serde(rename = "workout_id")]
    pub id: i64,
    pub title: String,
    pub workout_type: String,
    pub duration_minutes: i64,
    pub calories_burned: Option<i64>,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub title: String,
    pub workout_type: String,
    pub duration_minutes: i64,
    pub calories_burned: Option<i64>,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WorkoutPatch {
    pub title: Option<String>,
    pub workout_type: Option<String>,
    pub duration_minutes: Option<i64>,
    pub calories_burned: Option<i64>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

// Exercise models
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Exercise {
    #[serde(rename = "exercise_id")]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewExercise {
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExercisePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
}

// Progress models
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Progress {
    #[serde(rename = "progress_id")]
    pub id: i64,
    pub date: NaiveDate,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewProgress {
    pub date: NaiveDate,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProgressPatch {
    pub date: Option<NaiveDate>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub notes: Option<String>,
}

// Workout exercise (join) models
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    #[serde(rename = "workout_exercise_id")]
    pub id: i64,
    pub workout_id: i64,
    pub exercise_id: i64,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewWorkoutExercise {
    pub workout_id: i64,
    pub exercise_id: i64,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<i64>,
}

/// The parent references are fixed at creation; only the set details change.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WorkoutExercisePatch {
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<i64>,
}

/// A join row together with the exercise it points at.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutExerciseDetail {
    #[serde(rename = "workout_exercise_id")]
    pub id: i64,
    pub exercise_name: String,
    pub muscle_group: Option<String>,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<i64>,
}

// Statistics
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub workout_type: String,
    pub count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkoutStats {
    pub total_workouts: i64,
    pub total_minutes: i64,
    pub total_calories: i64,
    pub workouts_by_type: Vec<TypeCount>,
}

impl WorkoutStats {
    pub fn count_for(&self, workout_type: &str) -> i64 {
        self.workouts_by_type
            .iter()
            .find(|t| t.workout_type == workout_type)
            .map(|t| t.count)
            .unwrap_or(0)
    }
}

#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeightPoint {
    pub date: NaiveDate,
    pub weight: f64,
}

#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MuscleMassPoint {
    pub date: NaiveDate,
    pub muscle_mass: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProgressStats {
    pub weight_history: Vec<WeightPoint>,
    pub muscle_mass_history: Vec<MuscleMassPoint>,
}

// Validation

fn require_text(field: &str, value: &str) -> Result<(), FitError> {
    if value.trim().is_empty() {
        return Err(FitError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_non_negative_int(field: &str, value: Option<i64>) -> Result<(), FitError> {
    match value {
        Some(v) if v < 0 => Err(FitError::Validation(format!(
            "{} must not be negative, got {}",
            field, v
        ))),
        _ => Ok(()),
    }
}

fn require_non_negative(field: &str, value: Option<f64>) -> Result<(), FitError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(FitError::Validation(format!(
            "{} must be a non-negative number, got {}",
            field, v
        ))),
        _ => Ok(()),
    }
}

/// Field-level checks applied before anything reaches the database.
pub trait Validate {
    fn validate(&self) -> Result<(), FitError>;
}

impl Validate for NewWorkout {
    fn validate(&self) -> Result<(), FitError> {
        require_text("title", &self.title)?;
        require_text("workout_type", &self.workout_type)?;
        require_non_negative_int("duration_minutes", Some(self.duration_minutes))?;
        require_non_negative_int("calories_burned", self.calories_burned)
    }
}

impl Validate for WorkoutPatch {
    fn validate(&self) -> Result<(), FitError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(workout_type) = &self.workout_type {
            require_text("workout_type", workout_type)?;
        }
        require_non_negative_int("duration_minutes", self.duration_minutes)?;
        require_non_negative_int("calories_burned", self.calories_burned)
    }
}

impl Validate for NewExercise {
    fn validate(&self) -> Result<(), FitError> {
        require_text("name", &self.name)
    }
}

impl Validate for ExercisePatch {
    fn validate(&self) -> Result<(), FitError> {
        match &self.name {
            Some(name) => require_text("name", name),
            None => Ok(()),
        }
    }
}

impl Validate for NewProgress {
    fn validate(&self) -> Result<(), FitError> {
        require_non_negative("weight", self.weight)?;
        require_non_negative("height", self.height)?;
        require_non_negative("body_fat_percentage", self.body_fat_percentage)?;
        require_non_negative("muscle_mass", self.muscle_mass)
    }
}

impl Validate for ProgressPatch {
    fn validate(&self) -> Result<(), FitError> {
        require_non_negative("weight", self.weight)?;
        require_non_negative("height", self.height)?;
        require_non_negative("body_fat_percentage", self.body_fat_percentage)?;
        require_non_negative("muscle_mass", self.muscle_mass)
    }
}

impl Validate for NewWorkoutExercise {
    fn validate(&self) -> Result<(), FitError> {
        require_non_negative_int("sets", self.sets)?;
        require_non_negative_int("reps", self.reps)?;
        require_non_negative("weight_kg", self.weight_kg)?;
        require_non_negative_int("duration_seconds", self.duration_seconds)
    }
}

impl Validate for WorkoutExercisePatch {
    fn validate(&self) -> Result<(), FitError> {
        require_non_negative_int("sets", self.sets)?;
        require_non_negative_int("reps", self.reps)?;
        require_non_negative("weight_kg", self.weight_kg)?;
        require_non_negative_int("duration_seconds", self.duration_seconds)
    }
}
