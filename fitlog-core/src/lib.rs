pub mod config;
pub mod db;
pub mod error;
pub mod interface;
pub mod tracker;

pub use error::{ErrorKind, FitError};
pub use tracker::Tracker;
