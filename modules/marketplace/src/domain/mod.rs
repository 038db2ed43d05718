pub mod auth;
pub mod error;
pub mod events;
pub mod jobs;
pub mod pending;
pub mod ports;
pub mod profile;
pub mod router;
pub mod session;
pub mod shell;
pub mod store;
