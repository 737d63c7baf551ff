//! Contact form submission for the marketing site.
//!
//! A [`SubmissionController`] owns the form fields of one visitor session,
//! throttles submissions, resolves the visitor's public IP on a best-effort
//! basis and forwards the message to an external form-processing endpoint.

mod config;
mod controller;
mod dispatch;
mod error;
mod fields;
mod ip;
mod payload;

pub use config::*;
pub use controller::*;
pub use dispatch::*;
pub use error::*;
pub use fields::*;
pub use ip::*;
pub use payload::*;
