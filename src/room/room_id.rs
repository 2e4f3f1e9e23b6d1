use std::fmt;

pub const MAX_ROOM_ID_LEN: usize = 15;

/// Path segments that look like room ids but name account pages.
const RESERVED: [&str; 3] = ["self", "friend", "discover"];

/// Identifier of a live room, as it appears in the room page URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Accepts an ASCII alphanumeric token of at most 15 characters that is not reserved.
    pub fn parse(token: &str) -> Option<RoomId> {
        if token.is_empty()
            || token.len() > MAX_ROOM_ID_LEN
            || !token.chars().all(|c| c.is_ascii_alphanumeric())
            || RESERVED.contains(&token)
        {
            return None;
        }
        Some(RoomId(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
