use crate::Generator;
use portal_core::ShortCode;

/// Chooses the candidate identifier for a shortening request.
///
/// A caller-supplied identifier is used verbatim; otherwise one is drawn
/// from the generator. The candidate is not reserved: two requests can be
/// handed the same code, and the shortener's single existence check is the
/// only guard against overwriting a live link.
#[derive(Debug, Clone)]
pub struct Allocator<G> {
    generator: G,
}

impl<G: Generator> Allocator<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Returns the candidate identifier. An empty `custom` counts as absent.
    pub fn allocate(&self, custom: Option<&str>) -> ShortCode {
        match custom.filter(|code| !code.is_empty()) {
            Some(code) => ShortCode::custom(code),
            None => self.generator.generate().into(),
        }
    }
}
