//! Triage backend client
//!
//! Typed access to the analysis server's five JSON endpoints. The
//! [`TriageBackend`] trait is the seam; [`HttpBackend`] is the production
//! implementation behind the `http` feature.

mod backend;
#[cfg(feature = "http")]
mod http;
mod types;

pub use backend::{BackendResult, TriageBackend};
#[cfg(feature = "http")]
pub use http::{HttpBackend, MIN_TIMEOUT_SECONDS};
pub use types::*;

#[cfg(test)]
pub(crate) use backend::scripted::ScriptedBackend;
