//! Client core for a remote todo API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and keeps a view-model of
//! the todo list in sync with what the server returns.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - `ApiConfig` is an explicit value persisted through the `KeyValueStore`
//!   port and only becomes configured after a connectivity probe.
//! - `TodoStore` exposes immutable `TodoState` snapshots to subscribers and
//!   only changes the list once the server has answered.
//! - `TodoApp` drives store and config through an injected `Transport`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod state;
pub mod store;
pub mod types;

pub use app::{TodoApp, CONNECTED_MESSAGE};
pub use client::{build_probe, parse_probe, TodoClient};
pub use config::{ApiConfig, ConfigState, ConfigStore, FileStore, KeyValueStore, MemoryStore, STORAGE_KEY};
pub use error::{ApiError, ConfigError, StorageError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use state::{EditSession, TodoState};
pub use store::{Operation, PendingOp, SubscriptionId, TodoStore};
pub use types::{Ack, CreateTodo, Envelope, EnvelopePolicy, RenameTodo, Todo, TodoId};
