use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Local;
use colored::Colorize;
use tokio::sync::Mutex;

use crate::config::DisplayConfig;
use crate::page::Page;
use crate::room::RoomId;
use crate::viewer_count::fetch_viewer_count::{DisplayValue, FetchError, ViewerCountClient};
use crate::viewer_count::render_viewer_count::{render, RenderOutcome};

/// Runs fetch + render cycles against a shared page.
///
/// Every cycle takes a sequence number when it starts. A response that
/// arrives after a newer cycle has already rendered is dropped, so the
/// overlay never goes back in time.
pub struct ViewerCountUpdater {
    page: Arc<Mutex<Page>>,
    client: ViewerCountClient,
    display: DisplayConfig,
    issued: AtomicU64,
    rendered: AtomicU64,
}

impl ViewerCountUpdater {
    pub fn new(page: Arc<Mutex<Page>>, client: ViewerCountClient, display: DisplayConfig) -> Self {
        Self {
            page,
            client,
            display,
            issued: AtomicU64::new(0),
            rendered: AtomicU64::new(0),
        }
    }

    pub fn page(&self) -> &Arc<Mutex<Page>> {
        &self.page
    }

    /// One cycle. Returns the rendered outcome, or `None` when the response was stale.
    pub async fn update(&self) -> Option<RenderOutcome> {
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let outcome = match self.fetch_viewer_count().await {
            Ok((room_id, value)) => RenderOutcome::Count { room_id, value },
            Err(FetchError::NoRoomId) => {
                println!("{}", "No room id in current url, clearing viewer count".yellow());
                RenderOutcome::Failed
            }
            Err(e) => {
                eprintln!("{}", format!("Failed to get viewer count: {}", e).red());
                RenderOutcome::Failed
            }
        };

        let mut page = self.page.lock().await;

        if sequence < self.rendered.load(Ordering::SeqCst) {
            println!(
                "{}",
                format!("Dropping stale viewer count response #{}", sequence).yellow()
            );
            return None;
        }
        self.rendered.store(sequence, Ordering::SeqCst);

        let overlay = render(&mut page.document, &outcome, &self.display);

        let timestamp = Local::now().format("%H:%M:%S");
        match overlay {
            Some(node) => println!(
                "{}",
                format!("[{}] {}", timestamp, page.document.outer_html(node)).green()
            ),
            None => println!("{}", format!("[{}] viewer count cleared", timestamp).yellow()),
        }

        Some(outcome)
    }

    async fn fetch_viewer_count(&self) -> Result<(RoomId, DisplayValue), FetchError> {
        let room_id = {
            let mut guard = self.page.lock().await;
            let page = &mut *guard;
            page.room_identifier.resolve(&page.location)
        }
        .ok_or(FetchError::NoRoomId)?;

        let value = self.client.fetch_count(&room_id).await?;
        Ok((room_id, value))
    }
}
