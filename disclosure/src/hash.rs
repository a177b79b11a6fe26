//! Deep links: opening a panel named by the location fragment.

use regex::Regex;

use crate::error::InitError;

/// A compiled deep-link pattern.
#[derive(Debug, Clone)]
pub struct DeepLink {
    pattern: Regex,
}

impl DeepLink {
    /// Compile `pattern`. Capture group 1 (or the whole match when the
    /// pattern has no groups) is the percent-encoded panel id.
    pub fn new(pattern: &str) -> Result<Self, InitError> {
        let pattern = Regex::new(pattern).map_err(|source| InitError::InvalidHashPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    /// Extract the panel id from a location fragment such as `#ct=pricing`.
    pub fn parse(&self, hash: &str) -> Option<String> {
        let captures = self.pattern.captures(hash)?;
        let raw = captures.get(1).or_else(|| captures.get(0))?.as_str();
        match urlencoding::decode(raw) {
            Ok(id) if !id.is_empty() => Some(id.into_owned()),
            Ok(_) => None,
            Err(e) => {
                log::debug!("[hash] undecodable fragment '{}': {}", hash, e);
                None
            }
        }
    }
}
