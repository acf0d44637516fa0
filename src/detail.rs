use crate::config::TmdbSettings;
use crate::extract;
use crate::helpers::{parse_id, reconstruct_url};
use crate::http_client::PageFetcher;
use crate::metadata::tmdb;
use crate::models::{ContentType, DetailRecord, Source};
use crate::url_cache::UrlStore;

/// Resolve full metadata for an id.
///
/// TMDB-prefixed ids are answered from the metadata provider; scraping ids
/// resolve their page URL via the cache (or deterministic reconstruction on
/// a miss), fetch it, and pull title/description/poster plus episode links
/// out of the document. Absent when the id is unknown or the fetch fails.
pub async fn get_details(
    fetcher: &PageFetcher,
    cache: &dyn UrlStore,
    tmdb_settings: &TmdbSettings,
    id: &str,
) -> Option<DetailRecord> {
    let Some((source, slug)) = parse_id(id) else {
        log::warn!("details requested for unparseable id {}", id);
        return None;
    };

    if source == Source::Tmdb {
        let lookup = tmdb::lookup(fetcher, tmdb_settings, slug).await?;
        return Some(DetailRecord {
            id: id.to_string(),
            content_type: ContentType::Series,
            name: lookup.name,
            description: lookup.overview,
            poster: lookup.poster,
            background: lookup.background,
            genres: lookup.genres,
            release_info: lookup.release_year,
            imdb_rating: lookup.rating,
            runtime: lookup.runtime,
            episodes: Vec::new(),
        });
    }

    let url = match cache.get(id) {
        Some(url) => url,
        None => {
            let reconstructed = reconstruct_url(source, slug);
            log::info!("details: reconstructing URL for {} -> {}", id, reconstructed);
            reconstructed
        }
    };

    let document = match fetcher.fetch_document(&url).await {
        Ok(document) => document,
        Err(e) => {
            log::error!("details fetch failed for {}: {}", url, e);
            return None;
        }
    };

    let page_meta = extract::extract_page_meta(&document);
    let episodes = extract::extract_episodes(&document, id);
    log::info!("details for {}: {} episode links", id, episodes.len());

    let name = if page_meta.title.is_empty() {
        slug.to_string()
    } else {
        page_meta.title
    };

    Some(DetailRecord {
        id: id.to_string(),
        content_type: ContentType::Series,
        name,
        description: page_meta.description,
        poster: page_meta.poster.clone(),
        background: page_meta.poster,
        genres: Vec::new(),
        release_info: String::new(),
        imdb_rating: String::new(),
        runtime: String::new(),
        episodes,
    })
}
