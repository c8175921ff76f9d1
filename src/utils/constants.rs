//! Shared constants for the crawl service
//!
//! Every tuned value used by the pipeline lives here so the defaults stay
//! consistent between the config builder, the filters and the normalizer.

/// Crawls admitted at the same time, process-wide.
pub const DEFAULT_MAX_CONCURRENT_CRAWLS: usize = 3;

/// Page readiness budget handed to the engine for every crawl.
pub const PAGE_TIMEOUT_SECS: u64 = 120;

/// Characters of rendered HTML returned in a successful response.
pub const HTML_PREVIEW_CHARS: usize = 500;

/// Default `word_count_threshold` when the caller omits it.
pub const DEFAULT_WORD_COUNT_THRESHOLD: i64 = 10;

/// Viewport used for every browser session.
pub const VIEWPORT_WIDTH: u32 = 1920;
pub const VIEWPORT_HEIGHT: u32 = 1080;

/// Chrome user agent string presented by the browser session
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Pruning filter: minimum block score to survive.
pub const PRUNING_THRESHOLD: f64 = 0.45;

/// Pruning filter: minimum words in a retained block.
pub const PRUNING_MIN_WORDS: usize = 10;

/// Query-relevance filter: minimum BM25 score to survive.
pub const BM25_THRESHOLD: f64 = 0.5;

/// Screenshots wider than this are downscaled before transport.
pub const SCREENSHOT_MAX_WIDTH: u32 = 1920;

/// JPEG quality used when re-encoding screenshots
///
/// 60 keeps a full-page capture in the low hundreds of KB while
/// text stays legible.
pub const SCREENSHOT_QUALITY: u8 = 60;

/// Provider/model used for structured extraction when none is configured.
pub const DEFAULT_LLM_PROVIDER: &str = "openai/gpt-4o-mini";

/// Credential substituted when neither the request nor the environment has one.
pub const SENTINEL_API_TOKEN: &str = "no-token";

/// Formatting guidance appended to every extraction instruction.
pub const EXTRACTION_FORMAT_HINT: &str =
    "Map the extracted data to descriptive keys and return valid JSON only.";

/// Entries held by the in-process result cache.
pub const RESULT_CACHE_CAPACITY: usize = 256;

/// Page content sent to the extraction provider is cut to this many characters.
pub const EXTRACTION_MAX_INPUT_CHARS: usize = 48_000;

/// Request timeout for one extraction call.
pub const EXTRACTION_TIMEOUT_SECS: u64 = 90;
