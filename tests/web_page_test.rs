use anyhow::Result;
use dhelp::config::Settings;
use dhelp::web::{FetchOptions, HttpClient, HttpGetResult};
use dhelp::{DhelpError, WebPage};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

/// Fails a fixed number of times before serving a page.
struct UnreliableServer {
    failures: u32,
    calls: Arc<AtomicU32>,
}

impl HttpClient for UnreliableServer {
    fn get(&self, _url: &str) -> Result<HttpGetResult, String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err("connection refused".to_string());
        }
        Ok(HttpGetResult {
            status: 200,
            body: "<html><body><h1 class=\"title\">Stack Overflow</h1></body></html>".to_string(),
            content_type: "text/html".to_string(),
        })
    }
}

#[test]
fn test_settings_drive_fetch_policy() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("dhelp.toml");
    std::fs::write(&path, "[web]\ndelay_ms = 0\nmax_retries = 3\nsilent = true\n")?;
    let settings = Settings::load(&path)?;

    let calls = Arc::new(AtomicU32::new(0));
    let server = UnreliableServer {
        failures: u32::MAX,
        calls: calls.clone(),
    };
    let page = WebPage::with_client("https://stackoverflow.com", FetchOptions::from(&settings.web), server)?;

    match page.fetch() {
        Err(DhelpError::FetchFailed { attempts, .. }) => assert_eq!(attempts, 4),
        other => panic!("expected fetch to give up, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    Ok(())
}

#[test]
fn test_soup_after_transient_failures() -> Result<()> {
    let calls = Arc::new(AtomicU32::new(0));
    let server = UnreliableServer {
        failures: 2,
        calls: calls.clone(),
    };
    let options = FetchOptions {
        delay: Duration::from_millis(1),
        max_retries: 2,
        silent: true,
    };
    let page = WebPage::with_client("https://stackoverflow.com", options, server)?;

    assert_eq!(page.select_text("h1.title")?, vec!["Stack Overflow"]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let soup = page.soup()?;
    let selector = scraper::Selector::parse("body").map_err(|e| anyhow::anyhow!("{e}"))?;
    assert_eq!(soup.select(&selector).count(), 1);
    Ok(())
}
