//! The request/response surface the front doors talk to.
//!
//! A [`Request`] is executed by [`crate::Tracker::handle`] and answered with a
//! [`Reply`]: either a [`Payload`] or an [`ErrorBody`].

pub mod errors;
pub mod logging;
pub mod objects;
pub mod requests;

pub use errors::ErrorBody;
pub use objects::{Ack, Created, Payload};
pub use requests::Request;

pub type Reply = std::result::Result<Payload, ErrorBody>;
