//! Core types and traits for the Portal URL shortener.
//!
//! This crate provides the key-value store interface shared by the
//! quota tracker, the shortener and the redirector, together with the
//! identifier and link types that flow between them.

pub mod clock;
pub mod error;
pub mod link;
pub mod shortcode;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use error::{Result, StoreError};
pub use link::{LinkEntry, Retention};
pub use shortcode::ShortCode;
pub use store::{KvStore, Namespace};
