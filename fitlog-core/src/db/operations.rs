use log::{debug, info};
use sqlx::query_builder::Separated;
use sqlx::{Encode, QueryBuilder, Sqlite, SqlitePool, Type};

use crate::db::models::{
    EntityKind, Exercise, ExercisePatch, MuscleMassPoint, NewExercise, NewProgress, NewWorkout,
    NewWorkoutExercise, Progress, ProgressPatch, ProgressStats, TypeCount, Validate,
    WeightPoint, Workout, WorkoutExercise, WorkoutExerciseDetail, WorkoutExercisePatch,
    WorkoutPatch, WorkoutStats,
};
use crate::error::{FitError, Result};

/// How many points each progress time series keeps.
pub const HISTORY_LIMIT: i64 = 10;

const WORKOUT_COLUMNS: &str =
    "id, title, workout_type, duration_minutes, calories_burned, date, notes";
const EXERCISE_COLUMNS: &str = "id, name, description, muscle_group";
const PROGRESS_COLUMNS: &str =
    "id, date, weight, height, body_fat_percentage, muscle_mass, notes";
const WORKOUT_EXERCISE_COLUMNS: &str =
    "id, workout_id, exercise_id, sets, reps, weight_kg, duration_seconds";

fn non_empty<T>(rows: Vec<T>, entity: EntityKind) -> Result<Vec<T>> {
    if rows.is_empty() {
        return Err(FitError::Empty(entity));
    }
    Ok(rows)
}

async fn ensure_exists(pool: &SqlitePool, entity: EntityKind, id: i64) -> Result<()> {
    let query = format!("SELECT id FROM {} WHERE id = ?1", entity.table());
    let found: Option<i64> = sqlx::query_scalar(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(FitError::NotFound { entity, id }),
    }
}

// Patches

/// A sparse update: only the fields that are set end up in the `SET` clause.
trait Changeset: Validate {
    fn is_empty(&self) -> bool;
    fn push_assignments<'args>(&self, fields: &mut Separated<'_, 'args, Sqlite, &'static str>);
}

fn assign<'args, T>(
    fields: &mut Separated<'_, 'args, Sqlite, &'static str>,
    column: &str,
    value: &Option<T>,
) where
    T: Clone + 'args + Encode<'args, Sqlite> + Type<Sqlite>,
{
    if let Some(v) = value {
        fields.push(format!("{} = ", column));
        fields.push_bind_unseparated(v.clone());
    }
}

impl Changeset for WorkoutPatch {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn push_assignments<'args>(&self, fields: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        assign(fields, "title", &self.title);
        assign(fields, "workout_type", &self.workout_type);
        assign(fields, "duration_minutes", &self.duration_minutes);
        assign(fields, "calories_burned", &self.calories_burned);
        assign(fields, "date", &self.date);
        assign(fields, "notes", &self.notes);
    }
}

impl Changeset for ExercisePatch {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn push_assignments<'args>(&self, fields: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        assign(fields, "name", &self.name);
        assign(fields, "description", &self.description);
        assign(fields, "muscle_group", &self.muscle_group);
    }
}

impl Changeset for ProgressPatch {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn push_assignments<'args>(&self, fields: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        assign(fields, "date", &self.date);
        assign(fields, "weight", &self.weight);
        assign(fields, "height", &self.height);
        assign(fields, "body_fat_percentage", &self.body_fat_percentage);
        assign(fields, "muscle_mass", &self.muscle_mass);
        assign(fields, "notes", &self.notes);
    }
}

impl Changeset for WorkoutExercisePatch {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn push_assignments<'args>(&self, fields: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        assign(fields, "sets", &self.sets);
        assign(fields, "reps", &self.reps);
        assign(fields, "weight_kg", &self.weight_kg);
        assign(fields, "duration_seconds", &self.duration_seconds);
    }
}

/// The existence read runs outside any transaction and the write is a single
/// autocommit `UPDATE`, so a busy writer is waited on rather than reported.
async fn apply_patch<P: Changeset>(
    pool: &SqlitePool,
    entity: EntityKind,
    id: i64,
    patch: &P,
) -> Result<()> {
    ensure_exists(pool, entity, id).await?;

    if patch.is_empty() {
        return Err(FitError::Validation(format!(
            "no fields supplied to update {} {}",
            entity, id
        )));
    }
    patch.validate()?;

    let mut builder = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", entity.table()));
    {
        let mut fields = builder.separated(", ");
        patch.push_assignments(&mut fields);
    }
    builder.push(" WHERE id = ").push_bind(id);

    let updated = builder
        .build()
        .execute(pool)
        .await
        .map_err(|e| FitError::from_write(entity, e))?
        .rows_affected();
    // Deleted between the existence check and the write.
    if updated == 0 {
        return Err(FitError::NotFound { entity, id });
    }

    debug!("Updated {} {}", entity, id);
    Ok(())
}

// Workouts
pub async fn create_workout(pool: &SqlitePool, new: &NewWorkout) -> Result<i64> {
    new.validate()?;
    let id = sqlx::query(
        "INSERT INTO workouts (title, workout_type, duration_minutes, calories_burned, date, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(&new.title)
    .bind(&new.workout_type)
    .bind(new.duration_minutes)
    .bind(new.calories_burned)
    .bind(new.date)
    .bind(&new.notes)
    .execute(pool)
    .await
    .map_err(|e| FitError::from_write(EntityKind::Workout, e))?
    .last_insert_rowid();
    debug!("Created workout {}", id);
    Ok(id)
}

pub async fn get_workout(pool: &SqlitePool, workout_id: i64) -> Result<Workout> {
    let query = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?1");
    sqlx::query_as::<_, Workout>(&query)
        .bind(workout_id)
        .fetch_optional(pool)
        .await?
        .ok_or(FitError::NotFound {
            entity: EntityKind::Workout,
            id: workout_id,
        })
}

/// Most recent first.
pub async fn get_all_workouts(pool: &SqlitePool) -> Result<Vec<Workout>> {
    let query = format!("SELECT {WORKOUT_COLUMNS} FROM workouts ORDER BY date DESC, id DESC");
    let rows = sqlx::query_as::<_, Workout>(&query).fetch_all(pool).await?;
    non_empty(rows, EntityKind::Workout)
}

pub async fn update_workout(pool: &SqlitePool, workout_id: i64, patch: &WorkoutPatch) -> Result<()> {
    apply_patch(pool, EntityKind::Workout, workout_id, patch).await
}

/// Deletes the workout and every join row pointing at it. Returns the number
/// of workout rows removed, which is zero for an unknown id.
pub async fn delete_workout(pool: &SqlitePool, workout_id: i64) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let links = sqlx::query("DELETE FROM workout_exercises WHERE workout_id = ?1")
        .bind(workout_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let removed = sqlx::query("DELETE FROM workouts WHERE id = ?1")
        .bind(workout_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;

    info!(
        "Deleted workout {} ({} row(s), {} linked exercise(s))",
        workout_id, removed, links
    );
    Ok(removed)
}

// Exercises
pub async fn create_exercise(pool: &SqlitePool, new: &NewExercise) -> Result<i64> {
    new.validate()?;
    let id = sqlx::query(
        "INSERT INTO exercises (name, description, muscle_group) VALUES (?1, ?2, ?3)",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.muscle_group)
    .execute(pool)
    .await
    .map_err(|e| FitError::from_write(EntityKind::Exercise, e))?
    .last_insert_rowid();
    debug!("Created exercise {} ({})", id, new.name);
    Ok(id)
}

pub async fn get_exercise(pool: &SqlitePool, exercise_id: i64) -> Result<Exercise> {
    let query = format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = ?1");
    sqlx::query_as::<_, Exercise>(&query)
        .bind(exercise_id)
        .fetch_optional(pool)
        .await?
        .ok_or(FitError::NotFound {
            entity: EntityKind::Exercise,
            id: exercise_id,
        })
}

pub async fn get_all_exercises(pool: &SqlitePool) -> Result<Vec<Exercise>> {
    let query = format!("SELECT {EXERCISE_COLUMNS} FROM exercises ORDER BY id");
    let rows = sqlx::query_as::<_, Exercise>(&query).fetch_all(pool).await?;
    non_empty(rows, EntityKind::Exercise)
}

pub async fn update_exercise(
    pool: &SqlitePool,
    exercise_id: i64,
    patch: &ExercisePatch,
) -> Result<()> {
    apply_patch(pool, EntityKind::Exercise, exercise_id, patch).await
}

pub async fn delete_exercise(pool: &SqlitePool, exercise_id: i64) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let links = sqlx::query("DELETE FROM workout_exercises WHERE exercise_id = ?1")
        .bind(exercise_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let removed = sqlx::query("DELETE FROM exercises WHERE id = ?1")
        .bind(exercise_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;

    info!(
        "Deleted exercise {} ({} row(s), {} linked workout(s))",
        exercise_id, removed, links
    );
    Ok(removed)
}

// Progress
pub async fn create_progress(pool: &SqlitePool, new: &NewProgress) -> Result<i64> {
    new.validate()?;
    let id = sqlx::query(
        "INSERT INTO progress (date, weight, height, body_fat_percentage, muscle_mass, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(new.date)
    .bind(new.weight)
    .bind(new.height)
    .bind(new.body_fat_percentage)
    .bind(new.muscle_mass)
    .bind(&new.notes)
    .execute(pool)
    .await
    .map_err(|e| FitError::from_write(EntityKind::Progress, e))?
    .last_insert_rowid();
    debug!("Created progress entry {}", id);
    Ok(id)
}

pub async fn get_progress(pool: &SqlitePool, progress_id: i64) -> Result<Progress> {
    let query = format!("SELECT {PROGRESS_COLUMNS} FROM progress WHERE id = ?1");
    sqlx::query_as::<_, Progress>(&query)
        .bind(progress_id)
        .fetch_optional(pool)
        .await?
        .ok_or(FitError::NotFound {
            entity: EntityKind::Progress,
            id: progress_id,
        })
}

/// Most recent first.
pub async fn get_all_progress(pool: &SqlitePool) -> Result<Vec<Progress>> {
    let query = format!("SELECT {PROGRESS_COLUMNS} FROM progress ORDER BY date DESC, id DESC");
    let rows = sqlx::query_as::<_, Progress>(&query).fetch_all(pool).await?;
    non_empty(rows, EntityKind::Progress)
}

pub async fn update_progress(
    pool: &SqlitePool,
    progress_id: i64,
    patch: &ProgressPatch,
) -> Result<()> {
    apply_patch(pool, EntityKind::Progress, progress_id, patch).await
}

pub async fn delete_progress(pool: &SqlitePool, progress_id: i64) -> Result<u64> {
    let removed = sqlx::query("DELETE FROM progress WHERE id = ?1")
        .bind(progress_id)
        .execute(pool)
        .await?
        .rows_affected();
    info!("Deleted progress entry {} ({} row(s))", progress_id, removed);
    Ok(removed)
}

// Workout exercises

/// Links an exercise to a workout. Dangling references are rejected by the
/// foreign-key constraints and reported as [`FitError::MissingParent`].
pub async fn create_workout_exercise(pool: &SqlitePool, new: &NewWorkoutExercise) -> Result<i64> {
    new.validate()?;
    let result = sqlx::query(
        "INSERT INTO workout_exercises (workout_id, exercise_id, sets, reps, weight_kg, duration_seconds)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(new.workout_id)
    .bind(new.exercise_id)
    .bind(new.sets)
    .bind(new.reps)
    .bind(new.weight_kg)
    .bind(new.duration_seconds)
    .execute(pool)
    .await;

    match result {
        Ok(done) => {
            let id = done.last_insert_rowid();
            debug!(
                "Linked exercise {} to workout {} as {}",
                new.exercise_id, new.workout_id, id
            );
            Ok(id)
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
            Err(FitError::MissingParent {
                workout_id: new.workout_id,
                exercise_id: new.exercise_id,
            })
        }
        Err(e) => Err(FitError::from_write(EntityKind::WorkoutExercise, e)),
    }
}

pub async fn get_workout_exercise(pool: &SqlitePool, workout_exercise_id: i64) -> Result<WorkoutExercise> {
    let query = format!("SELECT {WORKOUT_EXERCISE_COLUMNS} FROM workout_exercises WHERE id = ?1");
    sqlx::query_as::<_, WorkoutExercise>(&query)
        .bind(workout_exercise_id)
        .fetch_optional(pool)
        .await?
        .ok_or(FitError::NotFound {
            entity: EntityKind::WorkoutExercise,
            id: workout_exercise_id,
        })
}

pub async fn get_all_workout_exercises(pool: &SqlitePool) -> Result<Vec<WorkoutExercise>> {
    let query = format!("SELECT {WORKOUT_EXERCISE_COLUMNS} FROM workout_exercises ORDER BY id");
    let rows = sqlx::query_as::<_, WorkoutExercise>(&query)
        .fetch_all(pool)
        .await?;
    non_empty(rows, EntityKind::WorkoutExercise)
}

/// Exercises recorded for one workout, joined with their names.
pub async fn get_exercises_for_workout(
    pool: &SqlitePool,
    workout_id: i64,
) -> Result<Vec<WorkoutExerciseDetail>> {
    let rows = sqlx::query_as::<_, WorkoutExerciseDetail>(
        "SELECT we.id, e.name AS exercise_name, e.muscle_group,
                we.sets, we.reps, we.weight_kg, we.duration_seconds
         FROM workout_exercises we
         JOIN exercises e ON we.exercise_id = e.id
         WHERE we.workout_id = ?1
         ORDER BY we.id",
    )
    .bind(workout_id)
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Err(FitError::NoWorkoutExercises(workout_id));
    }
    Ok(rows)
}

pub async fn update_workout_exercise(
    pool: &SqlitePool,
    workout_exercise_id: i64,
    patch: &WorkoutExercisePatch,
) -> Result<()> {
    apply_patch(pool, EntityKind::WorkoutExercise, workout_exercise_id, patch).await
}

pub async fn delete_workout_exercise(pool: &SqlitePool, workout_exercise_id: i64) -> Result<u64> {
    let removed = sqlx::query("DELETE FROM workout_exercises WHERE id = ?1")
        .bind(workout_exercise_id)
        .execute(pool)
        .await?
        .rows_affected();
    info!(
        "Deleted workout exercise {} ({} row(s))",
        workout_exercise_id, removed
    );
    Ok(removed)
}

// Stats

/// Totals and per-type counts, all read from one snapshot.
pub async fn get_workout_stats(pool: &SqlitePool) -> Result<WorkoutStats> {
    let mut tx = pool.begin().await?;

    let total_workouts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workouts")
        .fetch_one(&mut *tx)
        .await?;
    let total_minutes: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(duration_minutes), 0) FROM workouts")
            .fetch_one(&mut *tx)
            .await?;
    let total_calories: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(calories_burned), 0) FROM workouts WHERE calories_burned IS NOT NULL",
    )
    .fetch_one(&mut *tx)
    .await?;
    let workouts_by_type = sqlx::query_as::<_, TypeCount>(
        "SELECT workout_type, COUNT(*) AS count FROM workouts
         GROUP BY workout_type ORDER BY workout_type",
    )
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(WorkoutStats {
        total_workouts,
        total_minutes,
        total_calories,
        workouts_by_type,
    })
}

/// The latest [`HISTORY_LIMIT`] weight and muscle-mass readings, newest first.
pub async fn get_progress_stats(pool: &SqlitePool) -> Result<ProgressStats> {
    let mut tx = pool.begin().await?;

    let weight_history = sqlx::query_as::<_, WeightPoint>(
        "SELECT date, weight FROM progress WHERE weight IS NOT NULL
         ORDER BY date DESC, id DESC LIMIT ?1",
    )
    .bind(HISTORY_LIMIT)
    .fetch_all(&mut *tx)
    .await?;
    let muscle_mass_history = sqlx::query_as::<_, MuscleMassPoint>(
        "SELECT date, muscle_mass FROM progress WHERE muscle_mass IS NOT NULL
         ORDER BY date DESC, id DESC LIMIT ?1",
    )
    .bind(HISTORY_LIMIT)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(ProgressStats {
        weight_history,
        muscle_mass_history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn new_workout(workout_type: &str, duration_minutes: i64, date: NaiveDate) -> NewWorkout {
        NewWorkout {
            title: format!("{} session", workout_type),
            workout_type: workout_type.to_string(),
            duration_minutes,
            calories_burned: None,
            date,
            notes: None,
        }
    }

    fn new_exercise(name: &str) -> NewExercise {
        NewExercise {
            name: name.to_string(),
            description: None,
            muscle_group: Some("Legs".to_string()),
        }
    }

    fn link(workout_id: i64, exercise_id: i64) -> NewWorkoutExercise {
        NewWorkoutExercise {
            workout_id,
            exercise_id,
            sets: Some(3),
            reps: Some(10),
            weight_kg: Some(60.0),
            duration_seconds: None,
        }
    }

    #[tokio::test]
    async fn created_workout_reads_back_with_defaults() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let mut new = new_workout("cardio", 45, day(3));
        new.calories_burned = Some(350);

        let id = create_workout(&pool, &new).await.unwrap();
        let workout = get_workout(&pool, id).await.unwrap();

        assert_eq!(workout.title, "cardio session");
        assert_eq!(workout.duration_minutes, 45);
        assert_eq!(workout.calories_burned, Some(350));
        assert_eq!(workout.date, day(3));
        assert_eq!(workout.notes, None);
    }

    #[tokio::test]
    async fn workouts_list_newest_first() {
        let pool = connect("sqlite::memory:").await.unwrap();
        for d in [5, 12, 1] {
            create_workout(&pool, &new_workout("cardio", 30, day(d)))
                .await
                .unwrap();
        }

        let dates: Vec<_> = get_all_workouts(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.date)
            .collect();
        assert_eq!(dates, vec![day(12), day(5), day(1)]);
    }

    #[tokio::test]
    async fn empty_tables_signal_empty() {
        let pool = connect("sqlite::memory:").await.unwrap();
        assert!(matches!(
            get_all_workouts(&pool).await,
            Err(FitError::Empty(EntityKind::Workout))
        ));
        assert!(matches!(
            get_all_exercises(&pool).await,
            Err(FitError::Empty(EntityKind::Exercise))
        ));
        assert!(matches!(
            get_all_progress(&pool).await,
            Err(FitError::Empty(EntityKind::Progress))
        ));
        assert!(matches!(
            get_exercises_for_workout(&pool, 1).await,
            Err(FitError::NoWorkoutExercises(1))
        ));
    }

    #[tokio::test]
    async fn patch_only_touches_supplied_fields() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let id = create_workout(&pool, &new_workout("strength", 45, day(2)))
            .await
            .unwrap();

        let patch = WorkoutPatch {
            notes: Some("new PR".to_string()),
            ..Default::default()
        };
        update_workout(&pool, id, &patch).await.unwrap();

        let workout = get_workout(&pool, id).await.unwrap();
        assert_eq!(workout.duration_minutes, 45);
        assert_eq!(workout.workout_type, "strength");
        assert_eq!(workout.notes.as_deref(), Some("new PR"));
    }

    #[tokio::test]
    async fn update_checks_existence_before_emptiness() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let missing = update_progress(&pool, 42, &ProgressPatch::default()).await;
        assert!(matches!(
            missing,
            Err(FitError::NotFound {
                entity: EntityKind::Progress,
                id: 42
            })
        ));

        let id = create_progress(
            &pool,
            &NewProgress {
                date: day(1),
                weight: Some(80.0),
                height: None,
                body_fat_percentage: None,
                muscle_mass: None,
                notes: None,
            },
        )
        .await
        .unwrap();
        let empty = update_progress(&pool, id, &ProgressPatch::default()).await;
        assert!(matches!(empty, Err(FitError::Validation(_))));
    }

    #[tokio::test]
    async fn dangling_link_is_rejected_without_a_row() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let exercise_id = create_exercise(&pool, &new_exercise("Squat")).await.unwrap();

        let err = create_workout_exercise(&pool, &link(999_999, exercise_id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FitError::MissingParent {
                workout_id: 999_999,
                ..
            }
        ));
        assert!(matches!(
            get_all_workout_exercises(&pool).await,
            Err(FitError::Empty(EntityKind::WorkoutExercise))
        ));
    }

    #[tokio::test]
    async fn deleting_exercise_cascades_to_links() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let workout_id = create_workout(&pool, &new_workout("strength", 60, day(4)))
            .await
            .unwrap();
        let squat = create_exercise(&pool, &new_exercise("Squat")).await.unwrap();
        let lunge = create_exercise(&pool, &new_exercise("Lunge")).await.unwrap();
        let squat_link = create_workout_exercise(&pool, &link(workout_id, squat))
            .await
            .unwrap();
        create_workout_exercise(&pool, &link(workout_id, lunge))
            .await
            .unwrap();

        assert_eq!(delete_exercise(&pool, squat).await.unwrap(), 1);

        assert!(get_workout_exercise(&pool, squat_link).await.is_err());
        let remaining = get_exercises_for_workout(&pool, workout_id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].exercise_name, "Lunge");
        assert_eq!(remaining[0].sets, Some(3));
    }

    #[tokio::test]
    async fn duplicate_exercise_name_is_reported_as_duplicate() {
        let pool = connect("sqlite::memory:").await.unwrap();
        create_exercise(&pool, &new_exercise("Deadlift")).await.unwrap();
        let err = create_exercise(&pool, &new_exercise("Deadlift"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FitError::Duplicate {
                entity: EntityKind::Exercise,
                ..
            }
        ));

        let other = create_exercise(&pool, &new_exercise("Row")).await.unwrap();
        let rename = ExercisePatch {
            name: Some("Deadlift".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            update_exercise(&pool, other, &rename).await,
            Err(FitError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn deletes_are_idempotent() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let id = create_workout(&pool, &new_workout("yoga", 20, day(6)))
            .await
            .unwrap();
        assert_eq!(delete_workout(&pool, id).await.unwrap(), 1);
        assert_eq!(delete_workout(&pool, id).await.unwrap(), 0);
        assert_eq!(delete_progress(&pool, 123).await.unwrap(), 0);
        assert_eq!(delete_workout_exercise(&pool, 123).await.unwrap(), 0);
        assert_eq!(delete_exercise(&pool, 123).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn workout_stats_sum_and_group() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let empty = get_workout_stats(&pool).await.unwrap();
        assert_eq!(empty.total_workouts, 0);
        assert_eq!(empty.total_minutes, 0);
        assert_eq!(empty.total_calories, 0);
        assert!(empty.workouts_by_type.is_empty());

        let mut run = new_workout("cardio", 30, day(1));
        run.calories_burned = Some(300);
        create_workout(&pool, &run).await.unwrap();
        create_workout(&pool, &new_workout("cardio", 40, day(2)))
            .await
            .unwrap();
        let mut lift = new_workout("strength", 20, day(3));
        lift.calories_burned = Some(150);
        create_workout(&pool, &lift).await.unwrap();

        let stats = get_workout_stats(&pool).await.unwrap();
        assert_eq!(stats.total_workouts, 3);
        assert_eq!(stats.total_minutes, 90);
        assert_eq!(stats.total_calories, 450);
        assert_eq!(stats.count_for("cardio"), 2);
        assert_eq!(stats.count_for("strength"), 1);
    }

    #[tokio::test]
    async fn progress_stats_keep_latest_ten_non_null() {
        let pool = connect("sqlite::memory:").await.unwrap();
        for d in 1..=12 {
            create_progress(
                &pool,
                &NewProgress {
                    date: day(d),
                    weight: Some(80.0 - d as f64 * 0.1),
                    height: None,
                    body_fat_percentage: None,
                    muscle_mass: if d % 4 == 0 { Some(60.0) } else { None },
                    notes: None,
                },
            )
            .await
            .unwrap();
        }

        let stats = get_progress_stats(&pool).await.unwrap();
        assert_eq!(stats.weight_history.len(), HISTORY_LIMIT as usize);
        assert_eq!(stats.weight_history[0].date, day(12));
        assert_eq!(stats.weight_history[9].date, day(3));

        let muscle_dates: Vec<_> = stats.muscle_mass_history.iter().map(|p| p.date).collect();
        assert_eq!(muscle_dates, vec![day(12), day(8), day(4)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_on_a_file_database_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concurrent.db");
        let pool = connect(path.to_str().unwrap()).await.unwrap();

        let mut ids = Vec::new();
        for d in 1..=20 {
            ids.push(
                create_workout(&pool, &new_workout("cardio", 10, day(d)))
                    .await
                    .unwrap(),
            );
        }

        let mut tasks = tokio::task::JoinSet::new();
        for round in 0..5i64 {
            for &id in &ids {
                let pool = pool.clone();
                tasks.spawn(async move {
                    let patch = WorkoutPatch {
                        duration_minutes: Some(id * 100 + round),
                        ..Default::default()
                    };
                    update_workout(&pool, id, &patch).await
                });
            }
        }

        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined.unwrap() {
                failures.push(e.to_string());
            }
        }
        assert!(failures.is_empty(), "failed updates: {:?}", failures);

        for id in ids {
            let minutes = get_workout(&pool, id).await.unwrap().duration_minutes;
            assert_eq!(minutes / 100, id);
        }
    }
}
