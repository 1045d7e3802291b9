//! EDI core library
//!
//! Guided symptom intake, localized content and a typed client for the
//! triage backend, shared by the `edi` terminal client.

pub mod body_map;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod intake;
pub mod locale;
pub mod summary;
pub mod voice;

pub use error::{EdiError, Result};
