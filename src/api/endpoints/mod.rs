//! API endpoint handlers, one module per panel of the browser view.

pub mod analyses;
pub mod chat;
pub mod health;
pub mod history;
