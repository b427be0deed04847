use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::db::models::{
    EntityKind, Exercise, Progress, ProgressStats, Workout, WorkoutExercise,
    WorkoutExerciseDetail, WorkoutStats,
};

/// Acknowledges a create with the new identifier, keyed by entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Created {
    pub entity: EntityKind,
    pub id: i64,
    pub message: String,
}

impl Created {
    pub fn new(entity: EntityKind, id: i64) -> Self {
        let message = match entity {
            EntityKind::Workout => "Workout created",
            EntityKind::Exercise => "Exercise created",
            EntityKind::Progress => "Progress entry created",
            EntityKind::WorkoutExercise => "Exercise added to workout",
        };
        Created {
            entity,
            id,
            message: message.to_string(),
        }
    }
}

impl Serialize for Created {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.entity.id_field(), &self.id)?;
        map.serialize_entry("message", &self.message)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn updated(entity: EntityKind) -> Self {
        let message = match entity {
            EntityKind::Workout => "Workout updated",
            EntityKind::Exercise => "Exercise updated",
            EntityKind::Progress => "Progress entry updated",
            EntityKind::WorkoutExercise => "Workout exercise updated",
        };
        Ack {
            message: message.to_string(),
        }
    }

    pub fn deleted(entity: EntityKind) -> Self {
        let message = match entity {
            EntityKind::Workout => "Workout deleted",
            EntityKind::Exercise => "Exercise deleted",
            EntityKind::Progress => "Progress entry deleted",
            EntityKind::WorkoutExercise => "Exercise removed from workout",
        };
        Ack {
            message: message.to_string(),
        }
    }
}

/// Success payload of a dispatched request.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Payload {
    Created(Created),
    Ack(Ack),
    Workout(Workout),
    Workouts(Vec<Workout>),
    Exercise(Exercise),
    Exercises(Vec<Exercise>),
    Progress(Progress),
    ProgressEntries(Vec<Progress>),
    WorkoutExercise(WorkoutExercise),
    WorkoutExercises(Vec<WorkoutExercise>),
    WorkoutExerciseDetails(Vec<WorkoutExerciseDetail>),
    WorkoutStats(WorkoutStats),
    ProgressStats(ProgressStats),
}
