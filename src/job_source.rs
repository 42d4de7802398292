use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use log::{info, warn};
use url::Url;
use crate::config::SourceConfig;
use crate::error::AlertError;
use crate::posting::{JobPosting, RawPosting};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// Anything that can hand the driver a fresh batch of postings.
pub trait JobSource {
    fn fetch(&self) -> Result<Vec<JobPosting>, AlertError>;
}

impl<T: JobSource + ?Sized> JobSource for Box<T> {
    fn fetch(&self) -> Result<Vec<JobPosting>, AlertError> {
        (**self).fetch()
    }
}

/// Builds the source described by the configuration.
pub fn from_config(config: &SourceConfig) -> Result<Box<dyn JobSource>, AlertError> {
    Ok(match config {
        SourceConfig::JsonFeed { url } => Box::new(JsonFeedSource::new(url)?),
        SourceConfig::HtmlBoard { url, base_url } => Box::new(HtmlBoardSource::new(url, base_url)?),
    })
}

fn build_client() -> Result<Client, AlertError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    Client::builder()
        .timeout(HTTP_TIMEOUT)
        .default_headers(headers)
        .cookie_store(true)
        .build()
        .map_err(|source| AlertError::Transport { target: "http client".to_string(), source })
}

fn random_user_agent() -> &'static str {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    USER_AGENTS[rng.gen_range(0..USER_AGENTS.len())]
}

/// GETs `url` and returns the body, treating any non-success status as an error.
fn get_text(client: &Client, url: &str) -> Result<String, AlertError> {
    let transport = |source: reqwest::Error| AlertError::Transport { target: url.to_string(), source };

    let resp = client
        .get(url)
        .header(USER_AGENT, random_user_agent())
        .send()
        .map_err(transport)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(AlertError::Status { target: url.to_string(), status });
    }
    resp.text().map_err(transport)
}

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    jobs: Vec<Value>,
}

/// A JSON API answering `{ "jobs": [...] }`.
pub struct JsonFeedSource {
    client: Client,
    url: String,
}

impl JsonFeedSource {
    pub fn new(url: &str) -> Result<Self, AlertError> {
        Ok(JsonFeedSource { client: build_client()?, url: url.to_string() })
    }
}

impl JobSource for JsonFeedSource {
    fn fetch(&self) -> Result<Vec<JobPosting>, AlertError> {
        info!("Fetching job feed: {}", self.url);
        let body = get_text(&self.client, &self.url)?;
        parse_feed(&body, &self.url)
    }
}

/// Decodes a feed body. Elements that do not decode are skipped, not fatal.
pub fn parse_feed(body: &str, target: &str) -> Result<Vec<JobPosting>, AlertError> {
    let envelope: FeedEnvelope = serde_json::from_str(body)
        .map_err(|source| AlertError::Decode { target: target.to_string(), source })?;

    let total = envelope.jobs.len();
    let mut postings = Vec::with_capacity(total);
    for (i, value) in envelope.jobs.into_iter().enumerate() {
        match serde_json::from_value::<RawPosting>(value) {
            Ok(raw) => match JobPosting::from_raw(raw) {
                Some(posting) => postings.push(posting),
                None => warn!("Skipping feed entry {}: no id or url", i),
            },
            Err(e) => warn!("Skipping malformed feed entry {}: {}", i, e),
        }
    }
    info!("Decoded {} of {} feed entries", postings.len(), total);
    Ok(postings)
}

/// A job board search results page scraped for posting cards.
pub struct HtmlBoardSource {
    client: Client,
    url: String,
    base_url: Url,
}

impl HtmlBoardSource {
    pub fn new(url: &str, base_url: &str) -> Result<Self, AlertError> {
        let base_url = Url::parse(base_url)
            .map_err(|source| AlertError::InvalidUrl { url: base_url.to_string(), source })?;
        Ok(HtmlBoardSource { client: build_client()?, url: url.to_string(), base_url })
    }
}

impl JobSource for HtmlBoardSource {
    fn fetch(&self) -> Result<Vec<JobPosting>, AlertError> {
        info!("Scraping job board: {}", self.url);
        let html = get_text(&self.client, &self.url)?;
        Ok(parse_board(&html, &self.base_url))
    }
}

/// Extracts posting cards (`a.tapItem`) from a results page.
pub fn parse_board(html: &str, base_url: &Url) -> Vec<JobPosting> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("a.tapItem").unwrap();
    let title_selector = Selector::parse("h2 span").unwrap();
    let location_selector = Selector::parse(".companyLocation").unwrap();
    let snippet_selector = Selector::parse(".job-snippet").unwrap();
    let salary_selector = Selector::parse(".salary-snippet").unwrap();

    let mut postings = Vec::new();
    for card in document.select(&card_selector) {
        let Some(title) = first_text(card, &title_selector) else {
            warn!("Skipping job card without a title");
            continue;
        };
        let Some(href) = card.value().attr("href") else {
            warn!("Skipping '{}': card has no link", title);
            continue;
        };
        let link = match base_url.join(href) {
            Ok(u) => u.to_string(),
            Err(e) => {
                warn!("Skipping '{}': bad link {}: {}", title, href, e);
                continue;
            }
        };

        postings.push(JobPosting {
            id: link.clone(),
            title,
            description: first_text(card, &snippet_selector).unwrap_or_default(),
            location: first_text(card, &location_selector).unwrap_or_default(),
            salary: first_text(card, &salary_selector),
            url: link,
            tags: Vec::new(),
        });
    }
    info!("Found {} job cards", postings.len());
    postings
}

fn first_text(element: ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_skips_bad_entries() {
        let body = r#"{"jobs": [
            {"id": 11, "title": "Project Coordinator", "candidate_required_location": "India",
             "url": "https://jobs.example/11", "tags": ["pmo"], "salary": "4 LPA"},
            {"id": 12, "description": "no title here"},
            {"title": "Orphan"},
            {"id": "13", "title": "Analyst", "url": "https://jobs.example/13"}
        ]}"#;
        let postings = parse_feed(body, "test").unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].id, "11");
        assert_eq!(postings[0].location, "India");
        assert_eq!(postings[0].salary.as_deref(), Some("4 LPA"));
        assert_eq!(postings[1].id, "13");
    }

    #[test]
    fn feed_without_jobs_key_is_a_decode_error() {
        let err = parse_feed(r#"{"results": []}"#, "test").unwrap_err();
        assert!(matches!(err, AlertError::Decode { .. }));
    }

    #[test]
    fn board_cards_are_extracted() {
        let html = r#"
            <html><body>
              <a class="tapItem result" href="/rc/clk?jk=abc">
                <h2 class="jobTitle"><span title="x">Project Coordinator</span></h2>
                <div class="companyLocation">Remote</div>
                <div class="salary-snippet">₹3,00,000 a year</div>
                <div class="job-snippet"> Freshers can apply. </div>
              </a>
              <a class="tapItem" href="/rc/clk?jk=def"><h2><span>Analyst</span></h2></a>
              <a class="tapItem" href="/rc/clk?jk=ghi"><h2></h2></a>
              <a class="other" href="/elsewhere"><h2><span>Ignored</span></h2></a>
            </body></html>"#;
        let base = Url::parse("https://www.indeed.com").unwrap();
        let postings = parse_board(html, &base);

        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].title, "Project Coordinator");
        assert_eq!(postings[0].url, "https://www.indeed.com/rc/clk?jk=abc");
        assert_eq!(postings[0].id, postings[0].url);
        assert_eq!(postings[0].location, "Remote");
        assert_eq!(postings[0].description, "Freshers can apply.");
        assert_eq!(postings[0].salary.as_deref(), Some("₹3,00,000 a year"));
        assert_eq!(postings[1].title, "Analyst");
        assert_eq!(postings[1].salary, None);
    }
}
