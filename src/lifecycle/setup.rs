use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use futures::stream::{Stream, StreamExt};

use crate::lifecycle::poller::Poller;
use crate::room::{is_listing_page, PageMatcher};
use crate::viewer_count::ViewerCountUpdater;

/// Starts and restarts the viewer count display as the page location changes.
pub struct Controller {
    updater: Arc<ViewerCountUpdater>,
    page_matcher: PageMatcher,
    poll_interval: Duration,
    poller: Poller,
}

impl Controller {
    pub fn new(updater: Arc<ViewerCountUpdater>, page_matcher: PageMatcher, poll_interval: Duration) -> Self {
        Self {
            updater,
            page_matcher,
            poll_interval,
            poller: Poller::new(),
        }
    }

    /// Called on page ready and after every URL change.
    ///
    /// Does nothing on unmatched hosts and listing pages; a timer started for
    /// an earlier room keeps running there. Otherwise restarts the timer and
    /// runs one cycle right away. Returns whether the display was (re)started.
    pub async fn setup(&mut self) -> bool {
        let url = self.updater.page().lock().await.location.clone();

        if !self.page_matcher.matches(&url) {
            println!("{}", format!("Page not handled: {}", url).yellow());
            return false;
        }
        if is_listing_page(&url) {
            println!("{}", format!("Listing page, viewer count not shown: {}", url).yellow());
            return false;
        }

        println!("{}", format!("Starting viewer count display for {}", url).green());

        let updater = self.updater.clone();
        self.poller.start(self.poll_interval, move || {
            let updater = updater.clone();
            async move {
                updater.update().await;
            }
        });

        let updater = self.updater.clone();
        tokio::spawn(async move {
            updater.update().await;
        });

        true
    }

    #[cfg(test)]
    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    /// Calls `setup` once per URL change until the stream ends.
    pub async fn run<S>(&mut self, url_changes: S)
    where
        S: Stream<Item = String>,
    {
        let mut url_changes = Box::pin(url_changes);
        while let Some(url) = url_changes.next().await {
            println!("URL changed to {}, reinitializing...", url);
            self.setup().await;
        }
    }
}
