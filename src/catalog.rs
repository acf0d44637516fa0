use crate::extract;
use crate::http_client::PageFetcher;
use crate::models::{ContentEntry, Source};
use crate::url_cache::UrlStore;

/// Produce a bounded, optionally search-filtered catalog for one scraping
/// source and record every entry's id → source-URL pair in the cache.
///
/// Fails soft: a fetch failure yields an empty list, never an error.
pub async fn list_entries(
    fetcher: &PageFetcher,
    cache: &dyn UrlStore,
    source: Source,
    limit: usize,
    search: Option<&str>,
    placeholder_on_empty: bool,
) -> Vec<ContentEntry> {
    let listing_url = source.listing_url(search);
    let document = match fetcher.fetch_document(&listing_url).await {
        Ok(document) => document,
        Err(e) => {
            log::error!("{}: catalog fetch failed for {}: {}", source.tag(), listing_url, e);
            return Vec::new();
        }
    };

    let entries = extract::extract_entries(
        &document,
        source,
        &listing_url,
        limit,
        search,
        placeholder_on_empty,
    );

    for entry in &entries {
        cache.put(&entry.id, &entry.source_url);
    }

    log::info!("{}: returning {} entries", source.tag(), entries.len());
    entries
}
