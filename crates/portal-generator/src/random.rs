use crate::Generator;
use portal_core::ShortCode;
use uuid::Uuid;

/// Length of generated identifiers.
pub const DEFAULT_LENGTH: usize = 6;

/// Generates identifiers from the leading characters of a random UUID.
///
/// Six hex characters give 2^24 possible codes, so collisions are possible
/// and are caught by the existence check at shortening time.
#[derive(Debug, Clone)]
pub struct UuidGenerator {
    length: usize,
}

impl UuidGenerator {
    pub fn new() -> Self {
        Self::with_length(DEFAULT_LENGTH)
    }

    /// Truncates to `length` characters of the hyphenated UUID form.
    pub fn with_length(length: usize) -> Self {
        Self { length }
    }
}

impl Default for UuidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for UuidGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let token = Uuid::new_v4().hyphenated().to_string();
        ShortCode::generated(token.chars().take(self.length).collect::<String>())
    }
}
