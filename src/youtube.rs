//! Best-effort YouTube tutorial lookup for failed installs.

use std::time::Duration;

use colored::*;
use reqwest::blocking::Client;
use serde::Deserialize;

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";
const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: VideoId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
}

/// Queries the YouTube search API for an install tutorial.
///
/// Every failure is downgraded to a printed warning; a lookup can never abort
/// the install loop. Without an API key no request is issued at all.
pub struct TutorialFinder {
    client: Client,
    api_key: Option<String>,
}

impl TutorialFinder {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, api_key }
    }

    /// Look up a tutorial for installing `target`. Best-effort, no retry.
    pub fn lookup(&self, target: &str) {
        let key = match self.api_key.as_deref() {
            Some(key) => key,
            None => {
                println!(
                    "{} Tutorial lookup skipped (no API key configured)",
                    "⊘".yellow()
                );
                return;
            }
        };

        println!("{} Searching for an install tutorial...", "→".cyan());
        match self.search(target, key) {
            Ok(Some((title, video_id))) => {
                println!("{} Found video: {}", "▶".green(), title);
                println!("  {}{}", WATCH_BASE, video_id);
            }
            Ok(None) => println!("{} No relevant video found", "⊘".yellow()),
            Err(e) => println!("{} Tutorial lookup failed: {}", "⚠".yellow(), e),
        }
    }

    fn search(&self, target: &str, key: &str) -> Result<Option<(String, String)>, reqwest::Error> {
        let query = format!("How to install {} Python", target);
        let response = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("part", "snippet"),
                ("q", query.as_str()),
                ("key", key),
                ("maxResults", "1"),
                ("type", "video"),
            ])
            .send()?
            .error_for_status()?;

        let data: SearchResponse = response.json()?;
        Ok(data
            .items
            .into_iter()
            .next()
            .map(|item| (item.snippet.title, item.id.video_id)))
    }
}
