pub mod listing_page;
pub mod page_match;
pub mod room_id;
pub mod room_identifier;

pub use listing_page::is_listing_page;
pub use page_match::PageMatcher;
pub use room_id::RoomId;
pub use room_identifier::RoomIdentifier;
