//! Tracker module tying the record store to a connection pool.
//!
//! This module provides the main `Tracker` struct whose methods cover the
//! workout, exercise, progress and workout-exercise records, the statistics
//! views, and request dispatch.

mod dispatch;
mod exercise;
mod progress;
mod stats;
mod tracker;
mod workout;
mod workout_exercise;

pub use tracker::Tracker;
