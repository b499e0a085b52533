use scraper::{Html, Selector};
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::WebSettings;
use crate::error::{DhelpError, Result};
use crate::web::http_client::{HttpClient, HttpGetResult, ReqwestHttp};

/// Retry policy for [`WebPage::fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Pause before each retry.
    pub delay: Duration,
    /// Retries after the first attempt; 0 disables retrying.
    pub max_retries: u32,
    pub silent: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&WebSettings::default())
    }
}

impl From<&WebSettings> for FetchOptions {
    fn from(settings: &WebSettings) -> Self {
        Self {
            delay: settings.delay(),
            max_retries: settings.max_retries,
            silent: settings.silent,
        }
    }
}

/// A web page addressed by URL that can be fetched as text or parsed HTML.
pub struct WebPage {
    url: String,
    options: FetchOptions,
    client: Box<dyn HttpClient>,
}

enum Attempt {
    Done(HttpGetResult),
    Retry(String),
}

impl WebPage {
    pub fn new(url: &str) -> Result<Self> {
        Self::with_settings(url, &WebSettings::default())
    }

    pub fn with_settings(url: &str, settings: &WebSettings) -> Result<Self> {
        let client = ReqwestHttp::new(settings)?;
        Self::with_client(url, FetchOptions::from(settings), client)
    }

    pub fn with_client(url: &str, options: FetchOptions, client: impl HttpClient + 'static) -> Result<Self> {
        reqwest::Url::parse(url)
            .map_err(|e| DhelpError::MalformedInput(format!("invalid URL '{url}': {e}")))?;
        Ok(Self {
            url: url.to_string(),
            options,
            client: Box::new(client),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Returns the page body, retrying transport failures, 429 and 5xx
    /// responses up to `max_retries` times.
    pub fn fetch(&self) -> Result<String> {
        Ok(self.fetch_response()?.body)
    }

    #[instrument(skip(self), fields(url = %self.url))]
    fn fetch_response(&self) -> Result<HttpGetResult> {
        let attempts = self.options.max_retries.saturating_add(1);
        let mut last_reason = String::new();

        for attempt in 1..=attempts {
            if attempt > 1 {
                if !self.options.silent {
                    info!("Retrying {} (attempt {}/{})", self.url, attempt, attempts);
                }
                thread::sleep(self.options.delay);
            } else if !self.options.silent {
                info!("Fetching {}", self.url);
            }

            match self.attempt(attempt)? {
                Attempt::Done(response) => return Ok(response),
                Attempt::Retry(reason) => {
                    warn!("Problem fetching {}: {}", self.url, reason);
                    last_reason = reason;
                }
            }
        }

        if !self.options.silent {
            info!("Retry limit reached, giving up on {}", self.url);
        }
        Err(DhelpError::FetchFailed {
            url: self.url.clone(),
            attempts,
            reason: last_reason,
        })
    }

    fn attempt(&self, attempt: u32) -> Result<Attempt> {
        let response = match self.client.get(&self.url) {
            Ok(response) => response,
            Err(reason) => return Ok(Attempt::Retry(reason)),
        };
        debug!("GET {} -> {} ({} bytes)", self.url, response.status, response.body.len());

        match response.status {
            _ if response.is_success() => Ok(Attempt::Done(response)),
            404 | 410 => Err(DhelpError::UrlNotFound(self.url.clone())),
            429 | 500..=599 => Ok(Attempt::Retry(format!("HTTP {}", response.status))),
            status => Err(DhelpError::FetchFailed {
                url: self.url.clone(),
                attempts: attempt,
                reason: format!("HTTP {status}"),
            }),
        }
    }

    /// Fetches the page and parses it into a queryable HTML document.
    pub fn soup(&self) -> Result<Html> {
        let response = self.fetch_response()?;
        // Still parsed, but the selectors are unlikely to find anything.
        if !response.is_html() {
            warn!("{} returned {}, not HTML", self.url, response.content_type);
        }
        Ok(Html::parse_document(&response.body))
    }

    /// Fetches the page and returns the trimmed text of every element
    /// matching the CSS `selector`.
    pub fn select_text(&self, selector: &str) -> Result<Vec<String>> {
        let selector = Selector::parse(selector).map_err(|e| DhelpError::Selector(e.to_string()))?;
        let document = self.soup()?;
        Ok(document
            .select(&selector)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .collect())
    }
}

impl fmt::Debug for WebPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebPage")
            .field("url", &self.url)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for WebPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    /// Answers with `responses` in order, then repeats the last one.
    struct ScriptedClient {
        responses: Vec<std::result::Result<HttpGetResult, String>>,
        calls: Arc<AtomicUsize>,
    }

    impl HttpClient for ScriptedClient {
        fn get(&self, _url: &str) -> std::result::Result<HttpGetResult, String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let index = call.min(self.responses.len() - 1);
            self.responses[index].clone()
        }
    }

    fn page(responses: Vec<std::result::Result<HttpGetResult, String>>, max_retries: u32) -> (WebPage, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = ScriptedClient {
            responses,
            calls: calls.clone(),
        };
        let options = FetchOptions {
            delay: Duration::ZERO,
            max_retries,
            silent: true,
        };
        (WebPage::with_client("https://example.org/page", options, client).unwrap(), calls)
    }

    fn ok(status: u16, body: &str) -> std::result::Result<HttpGetResult, String> {
        Ok(HttpGetResult {
            status,
            body: body.to_string(),
            content_type: "text/html".to_string(),
        })
    }

    #[test]
    fn test_fetch_returns_body() {
        let (page, calls) = page(vec![ok(200, "<p>hi</p>")], 3);
        assert_eq!(page.fetch().unwrap(), "<p>hi</p>");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unreachable_url_retries_then_fails() {
        let (page, calls) = page(vec![Err("connection refused".to_string())], 3);
        let result = page.fetch();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match result {
            Err(DhelpError::FetchFailed { attempts, reason, .. }) => {
                assert_eq!(attempts, 4);
                assert_eq!(reason, "connection refused");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_zero_retries_means_single_attempt() {
        let (page, calls) = page(vec![Err("timeout".to_string())], 0);
        assert!(page.fetch().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_recovers_after_server_error() {
        let (page, calls) = page(vec![ok(503, ""), Err("reset".to_string()), ok(200, "body")], 3);
        assert_eq!(page.fetch().unwrap(), "body");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_not_found_is_not_retried() {
        let (page, calls) = page(vec![ok(404, "missing")], 3);
        assert!(matches!(page.fetch(), Err(DhelpError::UrlNotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_client_error_is_not_retried() {
        let (page, calls) = page(vec![ok(403, "nope")], 3);
        assert!(matches!(
            page.fetch(),
            Err(DhelpError::FetchFailed { attempts: 1, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retries_wait_for_delay() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = ScriptedClient {
            responses: vec![Err("down".to_string())],
            calls: calls.clone(),
        };
        let options = FetchOptions {
            delay: Duration::from_millis(20),
            max_retries: 2,
            silent: true,
        };
        let page = WebPage::with_client("http://localhost:9/", options, client).unwrap();
        let started = Instant::now();
        assert!(page.fetch().is_err());
        assert!(started.elapsed() >= Duration::from_millis(40));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let client = ScriptedClient {
            responses: vec![ok(200, "")],
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let result = WebPage::with_client("not a url", FetchOptions::default(), client);
        assert!(matches!(result, Err(DhelpError::MalformedInput(_))));
    }

    #[test]
    fn test_soup_parses_non_html_content_type() {
        let plain = Ok(HttpGetResult {
            status: 200,
            body: "<p>plain</p>".to_string(),
            content_type: "text/plain".to_string(),
        });
        let (page, calls) = page(vec![plain], 0);
        let document = page.soup().unwrap();
        let selector = Selector::parse("p").unwrap();
        assert_eq!(document.select(&selector).count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_select_text() {
        let html = r#"<html><body>
            <header><div class="-main"><span class="-img"> Stack Overflow </span></div></header>
            <ul><li>one</li><li>two</li></ul>
        </body></html>"#;
        let (page, _) = page(vec![ok(200, html)], 0);
        assert_eq!(page.select_text("header div.-main span.-img").unwrap(), vec!["Stack Overflow"]);
        assert_eq!(page.select_text("li").unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_select_text_bad_selector() {
        let (page, calls) = page(vec![ok(200, "<p></p>")], 0);
        assert!(matches!(page.select_text("p[["), Err(DhelpError::Selector(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
