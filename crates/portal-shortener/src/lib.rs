//! URL shortener service implementation.
//!
//! [`ShortenerService`] runs a shortening request through quota admission,
//! URL validation, the domain guard, identifier allocation and the collision
//! check before writing the link and charging the client's quota.

pub mod error;
pub mod service;
pub mod shortener;
pub mod url;

pub use error::{Result, ShortenerError};
pub use service::{ShortenerService, ShortenerSettings};
pub use shortener::{ShortenRequest, Shortened, Shortener};
