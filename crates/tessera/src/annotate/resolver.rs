//! Cell text to entity resolution.

use crate::error::Result;
use crate::kb::KbService;

/// Resolves a cell's text to at most one entity identifier.
///
/// Text is used verbatim apart from trimming surrounding whitespace; the
/// knowledge base's top-ranked candidate is accepted without further
/// disambiguation. Empty text never reaches the knowledge base.
pub struct EntityResolver<'a> {
    kb: &'a dyn KbService,
}

impl<'a> EntityResolver<'a> {
    /// Create a resolver over a lookup service.
    pub fn new(kb: &'a dyn KbService) -> Self {
        Self { kb }
    }

    /// Resolve text to an entity identifier.
    ///
    /// `Ok(None)` means no match; `Err` means the lookup itself failed and
    /// the caller decides whether that aborts anything (it never does in the
    /// batch stages, which count it and move on).
    pub fn resolve(&self, text: &str) -> Result<Option<String>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let candidates = self.kb.search(text)?;
        Ok(candidates.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kb::MockKbService;

    #[test]
    fn test_resolve_takes_top_candidate() {
        let kb = MockKbService::new().with_entity("Paris", &["Q90", "Q167646"]);
        let resolver = EntityResolver::new(&kb);

        assert_eq!(resolver.resolve("Paris").unwrap(), Some("Q90".to_string()));
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        let kb = MockKbService::new().with_entity("Paris", &["Q90"]);
        let resolver = EntityResolver::new(&kb);

        assert_eq!(resolver.resolve("  Paris\t").unwrap(), Some("Q90".to_string()));
    }

    #[test]
    fn test_empty_text_skips_lookup() {
        let kb = MockKbService::new();
        let resolver = EntityResolver::new(&kb);

        assert_eq!(resolver.resolve("   ").unwrap(), None);
        assert_eq!(kb.calls().search, 0);
    }

    #[test]
    fn test_no_match_is_none() {
        let kb = MockKbService::new();
        let resolver = EntityResolver::new(&kb);

        assert_eq!(resolver.resolve("Atlantis").unwrap(), None);
    }

    #[test]
    fn test_failure_propagates() {
        let kb = MockKbService::new().fail_search("Paris");
        let resolver = EntityResolver::new(&kb);

        assert!(resolver.resolve("Paris").is_err());
    }
}
