//! Short identifier generation and allocation.

pub mod allocator;
pub mod random;
pub mod seq;

pub use allocator::Allocator;
pub use random::UuidGenerator;
pub use seq::SeqGenerator;

use portal_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// They make no uniqueness promise: the caller checks the link namespace
/// before writing.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;
    /// Generates a candidate short code.
    fn generate(&self) -> Self::Output;
}
