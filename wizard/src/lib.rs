//! Shared wizard model for the sketch-to-keychain flow.
//!
//! This crate owns everything the front ends agree on: the three-stage state
//! machine, the backend's JSON envelope, the typed backend configuration, and
//! the [`backend::Backend`] capability that each front end implements over its
//! own HTTP client. It performs no I/O itself.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`state`] | `WizardState`, stages, sessions, and the named transitions |
//! | [`api`] | Response envelope types and per-endpoint parsers |
//! | [`backend`] | `Backend` trait, upload files, and request payloads |
//! | [`config`] | Backend origin, endpoint paths, and timeouts |
//! | [`controller`] | Async driver composing state transitions with a backend |
//! | [`error`] | Error enums and user-facing message derivation |

pub mod api;
pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod state;

pub use backend::{Backend, EditRequest, Generate3dRequest, ImageFile};
pub use config::{BackendConfig, Endpoint, Timeouts};
pub use controller::{Controller, DownloadTarget};
pub use error::{ApiError, ConfigError, WizardError};
pub use state::{Operation, Session, Stage, Ticket, WizardState};
