use std::fmt::Display;

/// The short identifier a link is stored under.
///
/// Identifiers are used verbatim as keys in the link namespace. No length or
/// alphabet restriction is applied here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShortCode {
    /// A system-generated identifier (e.g. from a random token).
    Generated(String),
    /// A caller-provided custom identifier.
    Custom(String),
}

impl ShortCode {
    /// Creates a generated short code.
    pub fn generated(code: impl Into<String>) -> Self {
        Self::Generated(code.into())
    }

    /// Creates a custom short code, taken verbatim.
    pub fn custom(code: impl Into<String>) -> Self {
        Self::Custom(code.into())
    }

    /// Whether this code was supplied by the caller.
    pub fn is_custom(&self) -> bool {
        matches!(self, ShortCode::Custom(_))
    }

    /// Generates the full shortened URL based on the provided public domain.
    pub fn to_url(&self, domain: &str) -> String {
        format!("{}/{}", domain.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            ShortCode::Generated(s) | ShortCode::Custom(s) => s.as_str(),
        }
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_codes_are_verbatim() {
        let code = ShortCode::custom("My Code/with-anything");
        assert_eq!(code.as_str(), "My Code/with-anything");
        assert!(code.is_custom());
    }

    #[test]
    fn display_generated() {
        let code = ShortCode::generated("a1b2c3");
        assert_eq!(code.to_string(), "a1b2c3");
        assert!(!code.is_custom());
    }

    #[test]
    fn to_url_joins_domain() {
        let code = ShortCode::custom("abc123");
        assert_eq!(code.to_url("localhost:3000"), "localhost:3000/abc123");
        assert_eq!(code.to_url("https://po.rt/"), "https://po.rt/abc123");
    }
}
