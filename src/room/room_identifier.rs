use regex::Regex;

use crate::room::listing_page::is_listing_page;
use crate::room::room_id::RoomId;

/// Derives a room id from a full page URL, without any caching.
pub trait RoomIdMatcher {
    fn derive(&self, url: &str) -> Option<RoomId>;
}

/// Matches the trailing path segment right before an optional query string.
///
/// Supported shapes:
///
/// - `https://live.douyin.com/613217711064`
/// - `https://live.douyin.com/613217711064?from_tab_name=main`
/// - `https://www.douyin.com/follow/live/574023227986`
pub struct PatternMatcher {
    trailing_segment: Regex,
    live_segment: Regex,
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self {
            trailing_segment: Regex::new(r"/([A-Za-z0-9]+)(?:\?|$)").unwrap(),
            live_segment: Regex::new(r"/live/([A-Za-z0-9]+)(?:\?|$)").unwrap(),
        }
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomIdMatcher for PatternMatcher {
    fn derive(&self, url: &str) -> Option<RoomId> {
        if is_listing_page(url) {
            return None;
        }

        let captures = self
            .trailing_segment
            .captures(url)
            .or_else(|| self.live_segment.captures(url))?;

        // A rejected token does not fall through to the next pattern.
        captures.get(1).and_then(|token| RoomId::parse(token.as_str()))
    }
}

/// Resolves room ids, remembering the last URL and what it resolved to.
pub struct RoomIdentifier<M = PatternMatcher> {
    matcher: M,
    cached_url: Option<String>,
    cached_id: Option<RoomId>,
}

impl RoomIdentifier {
    pub fn new() -> Self {
        Self::with_matcher(PatternMatcher::new())
    }
}

impl Default for RoomIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RoomIdMatcher> RoomIdentifier<M> {
    pub fn with_matcher(matcher: M) -> Self {
        Self {
            matcher,
            cached_url: None,
            cached_id: None,
        }
    }

    /// Returns the cached id when `url` is byte-for-byte the last resolved URL
    /// and that URL produced an id. Absent results are always recomputed.
    pub fn resolve(&mut self, url: &str) -> Option<RoomId> {
        if self.cached_url.as_deref() == Some(url) {
            if let Some(id) = &self.cached_id {
                return Some(id.clone());
            }
        }

        self.cached_url = Some(url.to_string());
        self.cached_id = self.matcher.derive(url);
        self.cached_id.clone()
    }
}
