use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use futures::stream::{self, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use lifecycle::Controller;
use page::{Document, Page};
use room::PageMatcher;
use viewer_count::{ViewerCountClient, ViewerCountUpdater};

mod config;
mod lifecycle;
mod page;
mod room;
mod viewer_count;

#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration settings
    let config = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", format!("Failed to load configuration: {}", e).red());
            return Err(e.into());
        }
    };

    let document = match &config.page.snapshot {
        Some(path) => page::load_document_file(path).await?,
        None => Document::empty(),
    };
    let page = Arc::new(Mutex::new(Page::new(config.page.start_url.clone(), document)));

    let client = ViewerCountClient::new(config.service.clone())
        .context("Failed to build HTTP client")?;
    let page_matcher = PageMatcher::new(&config.page.match_patterns)?;
    let updater = Arc::new(ViewerCountUpdater::new(page.clone(), client, config.display.clone()));
    let mut controller = Controller::new(updater, page_matcher, config.display.poll_interval());

    println!("Current URL: {}", config.page.start_url);
    controller.setup().await;

    // Every stdin line is a document mutation; the line is the location observed after it.
    let lines = BufReader::new(tokio::io::stdin()).lines();
    let mutations = stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line.trim().to_string(), lines)),
            Ok(None) => None,
            Err(e) => {
                eprintln!("{}", format!("Failed to read page mutation: {}", e).red());
                None
            }
        }
    })
    .filter(|line| futures::future::ready(!line.is_empty()))
    .then(|location| {
        let page = page.clone();
        async move {
            page.lock().await.navigate(location.clone());
            location
        }
    });

    controller
        .run(page::url_changes(config.page.start_url.clone(), mutations))
        .await;

    // stdin closed: keep showing the current room until interrupted.
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    Ok(())
}
