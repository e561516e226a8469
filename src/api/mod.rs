//! # API Module
//!
//! HTTP handlers served by [`crate::server`].
//!
//! ## Endpoints
//!
//! - [`push`] - `POST /`: Pub/Sub push delivery. Each delivery runs one
//!   status update cycle; deliveries are serialized.
//! - [`callback`] - `GET /callback`: redirect target of the Spotify
//!   authorization page, only mounted while `spotstatus authorize` waits for a
//!   code.
//! - [`health`] - `GET /health`: liveness probe with name and version.
//!
//! Handlers never exit the process; failures are logged and reported through
//! the response status.

mod callback;
mod health;
mod push;

pub use callback::{SharedAuthorization, callback};
pub use health::health;
pub use push::{PushState, push};
