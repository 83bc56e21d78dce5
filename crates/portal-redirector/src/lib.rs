//! Redirector service library.
//!
//! [`RedirectorService`] resolves short identifiers to their target URLs
//! through the link namespace and counts successful resolutions with an
//! [`AccessCounter`] in the quota namespace.

pub mod counter;
pub mod error;
pub mod redirector;
pub mod service;

pub use counter::{AccessCounter, ACCESS_COUNTER_KEY};
pub use error::{RedirectorError, Result};
pub use redirector::Redirector;
pub use service::RedirectorService;
