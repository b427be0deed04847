use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::{debug, info};

use fitlog::db::models::{
    ExercisePatch, NewExercise, NewProgress, NewWorkout, NewWorkoutExercise, ProgressPatch,
    WorkoutExercisePatch, WorkoutPatch,
};
use fitlog::db::set_db_path;
use fitlog::interface::logging::set_log_level;
use fitlog::interface::{Reply, Request};
use fitlog::{ErrorKind, Tracker};

/// Used when neither `--log-level` nor `FITLOG_LOG` is given. Stdout carries the JSON replies.
const CLI_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(version, about = "fitlog - workout, exercise and body progress tracker", long_about = None)]
struct Args {
    /// SQLite URL or file path of the record store
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,
    #[arg(long, env = "FITLOG_LOG", default_value = CLI_LOG_LEVEL, global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage workouts
    Workout {
        #[command(subcommand)]
        action: WorkoutCommand,
    },
    /// Manage the exercise catalogue
    Exercise {
        #[command(subcommand)]
        action: ExerciseCommand,
    },
    /// Manage body measurements
    Progress {
        #[command(subcommand)]
        action: ProgressCommand,
    },
    /// Manage exercises performed within workouts
    Link {
        #[command(subcommand)]
        action: LinkCommand,
    },
    Stats {
        #[command(subcommand)]
        which: StatsCommand,
    },
    /// Create the database and apply the schema
    Init,
    /// Delete every record, keeping the schema
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum WorkoutCommand {
    Add(WorkoutFields),
    List,
    Show { id: i64 },
    Update {
        id: i64,
        #[command(flatten)]
        patch: WorkoutPatchArgs,
    },
    Delete { id: i64 },
    /// List the exercises recorded for a workout
    Exercises { id: i64 },
}

#[derive(clap::Args, Debug)]
struct WorkoutFields {
    #[arg(long)]
    title: String,
    #[arg(long = "type")]
    workout_type: String,
    /// Duration in minutes
    #[arg(long)]
    duration: i64,
    #[arg(long)]
    calories: Option<i64>,
    /// YYYY-MM-DD
    #[arg(long)]
    date: NaiveDate,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(clap::Args, Debug)]
struct WorkoutPatchArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long = "type")]
    workout_type: Option<String>,
    #[arg(long)]
    duration: Option<i64>,
    #[arg(long)]
    calories: Option<i64>,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ExerciseCommand {
    Add(ExerciseFields),
    List,
    Show { id: i64 },
    Update {
        id: i64,
        #[command(flatten)]
        patch: ExercisePatchArgs,
    },
    Delete { id: i64 },
}

#[derive(clap::Args, Debug)]
struct ExerciseFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    muscle_group: Option<String>,
}

#[derive(clap::Args, Debug)]
struct ExercisePatchArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    muscle_group: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ProgressCommand {
    Add(ProgressFields),
    List,
    Show { id: i64 },
    Update {
        id: i64,
        #[command(flatten)]
        patch: ProgressPatchArgs,
    },
    Delete { id: i64 },
}

#[derive(clap::Args, Debug)]
struct ProgressFields {
    #[arg(long)]
    date: NaiveDate,
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    body_fat: Option<f64>,
    #[arg(long)]
    muscle_mass: Option<f64>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(clap::Args, Debug)]
struct ProgressPatchArgs {
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    body_fat: Option<f64>,
    #[arg(long)]
    muscle_mass: Option<f64>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Subcommand, Debug)]
enum LinkCommand {
    Add {
        #[arg(long)]
        workout: i64,
        #[arg(long)]
        exercise: i64,
        #[command(flatten)]
        detail: SetArgs,
    },
    List,
    Show { id: i64 },
    Update {
        id: i64,
        #[command(flatten)]
        detail: SetArgs,
    },
    Delete { id: i64 },
}

#[derive(clap::Args, Debug)]
struct SetArgs {
    #[arg(long)]
    sets: Option<i64>,
    #[arg(long)]
    reps: Option<i64>,
    #[arg(long)]
    weight_kg: Option<f64>,
    #[arg(long)]
    duration_seconds: Option<i64>,
}

#[derive(Subcommand, Debug)]
enum StatsCommand {
    Workouts,
    Progress,
}

impl WorkoutCommand {
    fn into_request(self) -> Request {
        match self {
            WorkoutCommand::Add(f) => Request::CreateWorkout(NewWorkout {
                title: f.title,
                workout_type: f.workout_type,
                duration_minutes: f.duration,
                calories_burned: f.calories,
                date: f.date,
                notes: f.notes,
            }),
            WorkoutCommand::List => Request::ListWorkouts,
            WorkoutCommand::Show { id } => Request::GetWorkout { id },
            WorkoutCommand::Update { id, patch: p } => Request::UpdateWorkout {
                id,
                patch: WorkoutPatch {
                    title: p.title,
                    workout_type: p.workout_type,
                    duration_minutes: p.duration,
                    calories_burned: p.calories,
                    date: p.date,
                    notes: p.notes,
                },
            },
            WorkoutCommand::Delete { id } => Request::DeleteWorkout { id },
            WorkoutCommand::Exercises { id } => Request::GetWorkoutExercises { workout_id: id },
        }
    }
}

impl ExerciseCommand {
    fn into_request(self) -> Request {
        match self {
            ExerciseCommand::Add(f) => Request::CreateExercise(NewExercise {
                name: f.name,
                description: f.description,
                muscle_group: f.muscle_group,
            }),
            ExerciseCommand::List => Request::ListExercises,
            ExerciseCommand::Show { id } => Request::GetExercise { id },
            ExerciseCommand::Update { id, patch: p } => Request::UpdateExercise {
                id,
                patch: ExercisePatch {
                    name: p.name,
                    description: p.description,
                    muscle_group: p.muscle_group,
                },
            },
            ExerciseCommand::Delete { id } => Request::DeleteExercise { id },
        }
    }
}

impl ProgressCommand {
    fn into_request(self) -> Request {
        match self {
            ProgressCommand::Add(f) => Request::CreateProgress(NewProgress {
                date: f.date,
                weight: f.weight,
                height: f.height,
                body_fat_percentage: f.body_fat,
                muscle_mass: f.muscle_mass,
                notes: f.notes,
            }),
            ProgressCommand::List => Request::ListProgress,
            ProgressCommand::Show { id } => Request::GetProgress { id },
            ProgressCommand::Update { id, patch: p } => Request::UpdateProgress {
                id,
                patch: ProgressPatch {
                    date: p.date,
                    weight: p.weight,
                    height: p.height,
                    body_fat_percentage: p.body_fat,
                    muscle_mass: p.muscle_mass,
                    notes: p.notes,
                },
            },
            ProgressCommand::Delete { id } => Request::DeleteProgress { id },
        }
    }
}

impl LinkCommand {
    fn into_request(self) -> Request {
        match self {
            LinkCommand::Add {
                workout,
                exercise,
                detail,
            } => Request::CreateWorkoutExercise(NewWorkoutExercise {
                workout_id: workout,
                exercise_id: exercise,
                sets: detail.sets,
                reps: detail.reps,
                weight_kg: detail.weight_kg,
                duration_seconds: detail.duration_seconds,
            }),
            LinkCommand::List => Request::ListWorkoutExercises,
            LinkCommand::Show { id } => Request::GetWorkoutExercise { id },
            LinkCommand::Update { id, detail } => Request::UpdateWorkoutExercise {
                id,
                patch: WorkoutExercisePatch {
                    sets: detail.sets,
                    reps: detail.reps,
                    weight_kg: detail.weight_kg,
                    duration_seconds: detail.duration_seconds,
                },
            },
            LinkCommand::Delete { id } => Request::DeleteWorkoutExercise { id },
        }
    }
}

/// Prints the reply and returns whether it counts as a failure.
fn print_reply(reply: &Reply) -> Result<bool> {
    match reply {
        Ok(payload) => {
            println!("{}", serde_json::to_string_pretty(payload)?);
            Ok(false)
        }
        Err(body) if body.kind == ErrorKind::Empty => {
            println!("{}", serde_json::to_string_pretty(body)?);
            Ok(false)
        }
        Err(body) => {
            eprintln!("{}", serde_json::to_string_pretty(body)?);
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    if !set_log_level(&args.log_level) {
        bail!("unknown log level {:?}", args.log_level);
    }
    if let Some(url) = &args.database_url {
        set_db_path(url).await?;
    }

    let tracker = Tracker::from_env().await?;

    let request = match args.command {
        Commands::Workout { action } => action.into_request(),
        Commands::Exercise { action } => action.into_request(),
        Commands::Progress { action } => action.into_request(),
        Commands::Link { action } => action.into_request(),
        Commands::Stats {
            which: StatsCommand::Workouts,
        } => Request::WorkoutStats,
        Commands::Stats {
            which: StatsCommand::Progress,
        } => Request::ProgressStats,
        Commands::Init => {
            println!("Database ready");
            tracker.close().await;
            return Ok(());
        }
        Commands::Reset { yes } => {
            if !yes {
                tracker.close().await;
                bail!("reset deletes every record; pass --yes to confirm");
            }
            tracker.reset().await?;
            info!("Database reset");
            println!("All records deleted");
            tracker.close().await;
            return Ok(());
        }
    };

    debug!("Dispatching {:?}", request);
    let reply = tracker.handle(request).await;
    let failed = print_reply(&reply)?;
    tracker.close().await;

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_for(argv: &[&str]) -> Request {
        let args = Args::try_parse_from(argv).unwrap();
        match args.command {
            Commands::Workout { action } => action.into_request(),
            Commands::Exercise { action } => action.into_request(),
            Commands::Progress { action } => action.into_request(),
            Commands::Link { action } => action.into_request(),
            other => panic!("not a record command: {:?}", other),
        }
    }

    #[test]
    fn workout_add_builds_create_request() {
        let request = request_for(&[
            "fitlog", "workout", "add", "--title", "Hill repeats", "--type", "cardio",
            "--duration", "40", "--date", "2026-10-12",
        ]);
        assert_eq!(
            request,
            Request::CreateWorkout(NewWorkout {
                title: "Hill repeats".into(),
                workout_type: "cardio".into(),
                duration_minutes: 40,
                calories_burned: None,
                date: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
                notes: None,
            })
        );
    }

    #[test]
    fn update_only_carries_given_flags() {
        let request = request_for(&["fitlog", "progress", "update", "3", "--weight", "71.2"]);
        assert_eq!(
            request,
            Request::UpdateProgress {
                id: 3,
                patch: ProgressPatch {
                    weight: Some(71.2),
                    ..Default::default()
                },
            }
        );
    }

    #[test]
    fn link_and_join_commands() {
        assert_eq!(
            request_for(&["fitlog", "link", "add", "--workout", "1", "--exercise", "2", "--sets", "4"]),
            Request::CreateWorkoutExercise(NewWorkoutExercise {
                workout_id: 1,
                exercise_id: 2,
                sets: Some(4),
                reps: None,
                weight_kg: None,
                duration_seconds: None,
            })
        );
        assert_eq!(
            request_for(&["fitlog", "workout", "exercises", "7"]),
            Request::GetWorkoutExercises { workout_id: 7 }
        );
    }

    #[test]
    fn log_level_defaults_to_warn_unless_overridden() {
        let args = Args::try_parse_from(["fitlog", "init"]).unwrap();
        let expected = std::env::var("FITLOG_LOG").unwrap_or_else(|_| CLI_LOG_LEVEL.to_string());
        assert_eq!(args.log_level, expected);

        let args = Args::try_parse_from(["fitlog", "--log-level", "debug", "init"]).unwrap();
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(
            Args::try_parse_from([
                "fitlog", "progress", "add", "--date", "18/10/2026",
            ])
            .is_err()
        );
    }

    #[test]
    fn empty_replies_are_not_failures() {
        use fitlog::interface::ErrorBody;
        let empty: Reply = Err(ErrorBody::with_display(ErrorKind::Empty, "no workouts recorded"));
        assert!(!print_reply(&empty).unwrap());
        let missing: Reply = Err(ErrorBody::with_display(ErrorKind::NotFound, "workout 3 not found"));
        assert!(print_reply(&missing).unwrap());
    }
}
