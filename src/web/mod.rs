//! Web page retrieval and HTML parsing.

pub mod http_client;
pub mod page;

pub use http_client::{HttpClient, HttpGetResult, ReqwestHttp};
pub use page::{FetchOptions, WebPage};
