use reqwest::header::CONTENT_TYPE;

use crate::config::WebSettings;
use crate::error::Result;

/// Blocking GET capability used by [`WebPage`](super::WebPage).
///
/// `Err` means the request never produced a response (DNS, connect,
/// timeout); HTTP error statuses come back as `Ok` with their status code.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> std::result::Result<HttpGetResult, String>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpGetResult {
    pub status: u16,
    pub body: String,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for `text/html` and `application/xhtml+xml` responses.
    pub fn is_html(&self) -> bool {
        let media_type = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        media_type == "text/html" || media_type == "application/xhtml+xml"
    }
}

pub struct ReqwestHttp {
    client: reqwest::blocking::Client,
}

impl ReqwestHttp {
    pub fn new(settings: &WebSettings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestHttp {
    fn get(&self, url: &str) -> std::result::Result<HttpGetResult, String> {
        let resp = self.client.get(url).send().map_err(|e| e.to_string())?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();
        let body = resp.text().map_err(|e| e.to_string())?;
        Ok(HttpGetResult { status, body, content_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(content_type: &str) -> HttpGetResult {
        HttpGetResult {
            status: 200,
            body: String::new(),
            content_type: content_type.to_string(),
        }
    }

    #[test]
    fn test_is_html() {
        assert!(response("text/html").is_html());
        assert!(response("Text/HTML; charset=utf-8").is_html());
        assert!(response("application/xhtml+xml").is_html());
        assert!(!response("application/json").is_html());
        assert!(!response("").is_html());
    }
}
