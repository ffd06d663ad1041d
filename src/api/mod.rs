//! Local HTTP API for the browser view.
//!
//! Routes are nested under `/api/`. The browser uploads images, reads the
//! current result and history, and drives the chat through these
//! endpoints; `CoreState` does the work.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer};
pub use types::ApiContext;
