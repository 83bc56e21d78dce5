//! Test fixtures for Portal: disposable containers and log capture.

pub mod error;
pub mod logs;
pub mod redis;

pub use error::{Result, TestInfraError};
pub use logs::LogCapture;
