pub mod fetch_viewer_count;
pub mod render_viewer_count;
pub mod update_viewer_count;

pub use fetch_viewer_count::ViewerCountClient;
pub use update_viewer_count::ViewerCountUpdater;
