use anyhow::{Context, Result};
use regex::Regex;

/// Allow-list of page URLs the overlay runs on. `*` matches any run of characters.
#[derive(Debug, Clone)]
pub struct PageMatcher {
    patterns: Vec<Regex>,
}

impl PageMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                let expr = format!("^{}$", regex::escape(pattern).replace(r"\*", ".*"));
                Regex::new(&expr).with_context(|| format!("Invalid match pattern: {}", pattern))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    pub fn matches(&self, url: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(url))
    }
}
