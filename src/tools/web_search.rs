// ABOUTME: WebSearchTool - looks up company information on the open web.
// ABOUTME: Uses DuckDuckGo HTML search; all failures come back as data.

use async_trait::async_trait;
use serde::Deserialize;

use crate::tool::{Tool, ToolResult};

/// A single search hit.
#[derive(Debug, Clone)]
struct SearchHit {
    title: String,
    url: String,
    snippet: String,
}

/// Tool for performing web searches, used to research and qualify leads.
pub struct WebSearchTool {
    client: reqwest::Client,
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WebSearchTool {
    /// Create a new WebSearchTool.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (compatible; leadloop/0.1)")
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// Create with a custom reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Parse DuckDuckGo HTML search results. Result anchors carry
    /// class="result__a"; snippets follow under class="result__snippet".
    fn parse_results(html: &str) -> Vec<SearchHit> {
        let mut hits = Vec::new();
        let mut remaining = html;

        while let Some(anchor) = remaining.find("class=\"result__a\"") {
            remaining = &remaining[anchor..];

            let Some(url) = Self::extract_href(remaining) else {
                remaining = &remaining[1..];
                continue;
            };

            let title = Self::extract_anchor_text(remaining);

            let snippet = remaining
                .find("class=\"result__snippet\"")
                .map(|pos| Self::extract_anchor_text(&remaining[pos..]))
                .unwrap_or_default();

            if !url.is_empty() && !title.is_empty() {
                hits.push(SearchHit {
                    title,
                    url,
                    snippet,
                });
            }

            remaining = &remaining[1..];
        }

        hits
    }

    /// Pull the href target out of the current anchor, unwrapping the
    /// uddg= redirect DuckDuckGo puts around external URLs.
    fn extract_href(fragment: &str) -> Option<String> {
        let start = fragment.find("href=\"")?;
        let rest = &fragment[start + 6..];
        let end = rest.find('"')?;
        let raw = &rest[..end];

        let Some(uddg) = raw.find("uddg=") else {
            return Some(raw.to_string());
        };
        let encoded = &raw[uddg + 5..];
        let encoded = encoded.split('&').next().unwrap_or(encoded);
        Some(urlencoding::decode(encoded).unwrap_or_default().to_string())
    }

    /// Text between the current anchor's `>` and its `</a>`, tags stripped.
    fn extract_anchor_text(fragment: &str) -> String {
        let Some(gt) = fragment.find('>') else {
            return String::new();
        };
        let inner = &fragment[gt + 1..];
        let end = inner.find("</a>").unwrap_or(inner.len());
        Self::strip_tags(&inner[..end]).trim().to_string()
    }

    fn strip_tags(html: &str) -> String {
        let mut text = String::new();
        let mut in_tag = false;
        for ch in html.chars() {
            match ch {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(ch),
                _ => {}
            }
        }
        text.replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Performs a web search. Use this to find location, industry, or news \
         about a company to qualify leads."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return (default: 10)",
                    "default": 10
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        #[derive(Deserialize)]
        struct Params {
            query: String,
            #[serde(default = "default_max_results")]
            max_results: usize,
        }

        fn default_max_results() -> usize {
            10
        }

        let params: Params = serde_json::from_value(params)?;

        let url = format!(
            "https://html.duckduckgo.com/html/?q={}",
            urlencoding::encode(&params.query)
        );

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => return Ok(ToolResult::error(format!("Search failed: {}", e))),
        };

        if !response.status().is_success() {
            return Ok(ToolResult::error(format!(
                "Search failed with status: {}",
                response.status()
            )));
        }

        let html = match response.text().await {
            Ok(text) => text,
            Err(e) => return Ok(ToolResult::error(format!("Failed to read response: {}", e))),
        };

        let hits: Vec<_> = Self::parse_results(&html)
            .into_iter()
            .take(params.max_results)
            .collect();

        if hits.is_empty() {
            return Ok(ToolResult::json(serde_json::json!({
                "results": "No results found."
            })));
        }

        let mut text = String::new();
        for (i, hit) in hits.iter().enumerate() {
            text.push_str(&format!("{}. {} ({})\n", i + 1, hit.title, hit.url));
            if !hit.snippet.is_empty() {
                text.push_str(&format!("   {}\n", hit.snippet));
            }
        }

        Ok(ToolResult::json(serde_json::json!({ "results": text })))
    }
}
