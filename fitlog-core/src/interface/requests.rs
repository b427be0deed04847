use serde::{Deserialize, Serialize};

use crate::db::models::{
    ExercisePatch, NewExercise, NewProgress, NewWorkout, NewWorkoutExercise, ProgressPatch,
    WorkoutExercisePatch, WorkoutPatch,
};

/// Every operation the tracker answers, with its already-parsed inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    CreateWorkout(NewWorkout),
    ListWorkouts,
    GetWorkout { id: i64 },
    UpdateWorkout { id: i64, patch: WorkoutPatch },
    DeleteWorkout { id: i64 },

    CreateExercise(NewExercise),
    ListExercises,
    GetExercise { id: i64 },
    UpdateExercise { id: i64, patch: ExercisePatch },
    DeleteExercise { id: i64 },

    CreateProgress(NewProgress),
    ListProgress,
    GetProgress { id: i64 },
    UpdateProgress { id: i64, patch: ProgressPatch },
    DeleteProgress { id: i64 },

    CreateWorkoutExercise(NewWorkoutExercise),
    ListWorkoutExercises,
    GetWorkoutExercise { id: i64 },
    UpdateWorkoutExercise { id: i64, patch: WorkoutExercisePatch },
    DeleteWorkoutExercise { id: i64 },
    GetWorkoutExercises { workout_id: i64 },

    WorkoutStats,
    ProgressStats,
}
