pub mod document;
pub mod element_path;
pub mod load_document;
pub mod url_changes;

use crate::room::RoomIdentifier;

pub use document::{Document, NodeId};
pub use element_path::ElementPath;
pub use load_document::load_document_file;
pub use url_changes::url_changes;

/// Host page state: the observed location, its document, and the room id memo.
pub struct Page {
    pub location: String,
    pub document: Document,
    pub room_identifier: RoomIdentifier,
}

impl Page {
    pub fn new(location: impl Into<String>, document: Document) -> Self {
        Self {
            location: location.into(),
            document,
            room_identifier: RoomIdentifier::new(),
        }
    }

    pub fn navigate(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }
}
