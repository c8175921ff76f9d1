//! Wire contract of the crawl endpoint.

pub mod request;
pub mod response;

pub use request::{CrawlRequest, RequestValidationError};
pub use response::CrawlResponse;
