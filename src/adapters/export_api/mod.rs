//! Event registration export API adapter
//!
//! Layered bottom-up:
//!
//! - [`params`] - ordered query parameters and their canonical form
//! - [`signer`] - bearer header or HMAC-signed API key query
//! - [`policy`] - status classification and backoff schedule
//! - [`transport`] - signed, retrying GET
//! - [`mapper`] - tolerant JSON to [`RegistrationPage`](crate::domain::RegistrationPage) mapping
//! - [`service`] - [`RegistrationSource`] seam and its HTTP implementation

pub mod mapper;
pub mod params;
pub mod policy;
pub mod service;
pub mod signer;
pub mod transport;

pub use mapper::RegistrationMapper;
pub use params::QueryParams;
pub use policy::{classify, FailureKind, Outcome, RetryPolicy};
pub use service::{RegistrationService, RegistrationSource};
pub use signer::RequestSigner;
pub use transport::ExportApiTransport;
