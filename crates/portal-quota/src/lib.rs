//! Per-client request quota backed by expiring store counters.
//!
//! A client's first request opens a window by writing the full quota under
//! the client key with the window length as its expiry. Every successful
//! request then decrements that counter in place; the window is never
//! extended. When the store evicts the key the client starts over with a
//! full quota.

pub mod tracker;

pub use tracker::{Admission, QuotaPolicy, QuotaStatus, QuotaTracker, DEFAULT_WINDOW};
