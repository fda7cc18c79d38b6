// ABOUTME: Blocking HTTP client for the Notion API
// ABOUTME: Handles throttling, 429 backoff, pagination, and block batching

use crate::model::{BlockList, ChildPage, CreatedPage, MAX_BLOCKS_PER_REQUEST};
use crate::{Error, Result};
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;

const NOTION_VERSION: &str = "2022-06-28";
const MAX_RETRIES: u32 = 3;

fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.len() <= max_chars {
        return s.to_string();
    }

    // Find a valid UTF-8 boundary at or before max_chars
    let mut boundary = max_chars;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }

    if boundary == 0 {
        return String::new();
    }

    format!("{}...", &s[..boundary])
}

fn parse_response<T: serde::de::DeserializeOwned>(endpoint: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        eprintln!("Failed to parse response from {}: {}", endpoint, e);
        eprintln!("Response body (first 500 chars): {}", truncate_str(body, 500));
        Error::Parse(e)
    })
}

pub struct NotionClient {
    client: Client,
    base_url: String,
    token: String,
    throttle_min: u64,
    throttle_max: u64,
}

impl NotionClient {
    pub fn new(token: String, base_url: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(NotionClient {
            client,
            base_url: base_url.unwrap_or_else(|| "https://api.notion.com".into()),
            token,
            throttle_min: 100,
            throttle_max: 300,
        })
    }

    pub fn with_throttle(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.throttle_min = min_ms;
        self.throttle_max = max_ms;
        self
    }

    pub fn disable_throttle(mut self) -> Self {
        self.throttle_min = 0;
        self.throttle_max = 0;
        self
    }

    fn throttle(&self) {
        if self.throttle_max > 0 {
            let sleep_ms = rand::thread_rng().gen_range(self.throttle_min..=self.throttle_max);
            std::thread::sleep(Duration::from_millis(sleep_ms));
        }
    }

    /// Issue one API request, retrying on 429 per the Retry-After header
    /// (up to MAX_RETRIES), and return the raw response body on success.
    fn request(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Result<String> {
        let url = format!("{}/v1/{}", self.base_url, endpoint);
        let mut retries = MAX_RETRIES;

        loop {
            let mut req = self
                .client
                .request(method.clone(), &url)
                .header("Authorization", format!("Bearer {}", self.token))
                .header("Notion-Version", NOTION_VERSION)
                .header("Content-Type", "application/json");
            if let Some(body) = body {
                req = req.json(body);
            }

            let response = req.send()?;
            self.throttle();

            let status = response.status();
            if status.is_success() {
                return Ok(response.text()?);
            }

            if status.as_u16() == 429 && retries > 0 {
                let wait_secs = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                std::thread::sleep(Duration::from_secs(wait_secs));
                retries -= 1;
                continue;
            }

            let message = response.text().unwrap_or_default();
            return Err(Error::Api {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                message: truncate_str(&message, 100),
            });
        }
    }

    /// List the child pages of a parent block, following pagination.
    pub fn list_child_pages(&self, parent_id: &str) -> Result<Vec<ChildPage>> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let endpoint = match &cursor {
                Some(c) => format!(
                    "blocks/{}/children?page_size=100&start_cursor={}",
                    parent_id, c
                ),
                None => format!("blocks/{}/children?page_size=100", parent_id),
            };
            let body = self.request(Method::GET, &endpoint, None)?;
            let list: BlockList = parse_response(&endpoint, &body)?;

            for block in list.results {
                if block.kind == "child_page" {
                    if let Some(info) = block.child_page {
                        pages.push(ChildPage {
                            id: block.id,
                            title: info.title,
                        });
                    }
                }
            }

            cursor = if list.has_more { list.next_cursor } else { None };
            if cursor.is_none() {
                break;
            }
        }

        Ok(pages)
    }

    pub fn find_page_by_title(&self, parent_id: &str, title: &str) -> Result<Option<String>> {
        Ok(self
            .list_child_pages(parent_id)?
            .into_iter()
            .find(|p| p.title == title)
            .map(|p| p.id))
    }

    /// Create a page under a parent. The first batch of at most 100
    /// blocks rides along with page creation; any remainder is appended
    /// in subsequent batches of at most 100.
    pub fn create_page(
        &self,
        parent_id: &str,
        title: &str,
        icon: &str,
        children: &[Value],
    ) -> Result<String> {
        let first = &children[..children.len().min(MAX_BLOCKS_PER_REQUEST)];
        let body = json!({
            "parent": { "page_id": parent_id },
            "icon": { "type": "emoji", "emoji": icon },
            "properties": {
                "title": { "title": [{ "text": { "content": title } }] }
            },
            "children": first
        });

        let text = self.request(Method::POST, "pages", Some(&body))?;
        let page: CreatedPage = parse_response("pages", &text)?;

        for batch in children.chunks(MAX_BLOCKS_PER_REQUEST).skip(1) {
            self.append_children(&page.id, batch)?;
        }

        Ok(page.id)
    }

    pub fn append_children(&self, block_id: &str, children: &[Value]) -> Result<()> {
        let endpoint = format!("blocks/{}/children", block_id);
        self.request(Method::PATCH, &endpoint, Some(&json!({ "children": children })))?;
        Ok(())
    }

    pub fn delete_block(&self, block_id: &str) -> Result<()> {
        self.request(Method::DELETE, &format!("blocks/{}", block_id), None)?;
        Ok(())
    }
}
