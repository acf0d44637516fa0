use crate::config::Config;
use crate::http_client::PageFetcher;
use crate::url_cache::MemoryUrlCache;

/// Shared state handed to every server handler. The URL cache is the only
/// mutable member and is internally synchronized.
pub struct AppState {
    pub fetcher: PageFetcher,
    pub url_cache: MemoryUrlCache,
    pub config: Config,
}
