// taskly-api: Async Rust client for a REST task collection endpoint

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::TaskClient;
pub use error::{Error, StatusCategory};
pub use models::{NewTask, TaskRecord, TaskUpdate};
pub use transport::{TlsMode, TransportConfig};
