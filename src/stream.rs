use crate::catalog;
use crate::config::Config;
use crate::extract::{self, StreamUrl};
use crate::helpers::{absolutize, parse_id, reconstruct_url, split_episode};
use crate::http_client::PageFetcher;
use crate::metadata::tmdb;
use crate::models::{Source, StreamCandidate};
use crate::url_cache::UrlStore;
use scraper::Selector;

const EMBEDDED_PLAYER_LABEL: &str = "Embedded player";

/// Turn collected stream URLs into ordered candidates, absolutizing
/// protocol-relative and root-relative URLs against the page they came
/// from. An empty collection degrades to a single ExternalPage candidate
/// referencing the page itself.
pub fn build_candidates(urls: Vec<StreamUrl>, page_url: &str) -> Vec<StreamCandidate> {
    if urls.is_empty() {
        return vec![StreamCandidate::ExternalPage {
            external_url: page_url.to_string(),
        }];
    }
    urls.into_iter()
        .map(|candidate| {
            let url = absolutize(&candidate.url, page_url);
            if candidate.from_frame {
                StreamCandidate::EmbeddedPlayer {
                    title: EMBEDDED_PLAYER_LABEL.to_string(),
                    external_url: url,
                }
            } else {
                StreamCandidate::DirectMedia { url }
            }
        })
        .collect()
}

/// Fetch a page and run the full stream-URL pipeline over it. Any fetch
/// failure collapses to the ExternalPage fallback for that page.
async fn streams_from_page(fetcher: &PageFetcher, page_url: &str) -> Vec<StreamCandidate> {
    let document = match fetcher.fetch_document(page_url).await {
        Ok(document) => document,
        Err(e) => {
            log::warn!("stream page fetch failed for {}: {}", page_url, e);
            return vec![StreamCandidate::ExternalPage {
                external_url: page_url.to_string(),
            }];
        }
    };
    build_candidates(extract::collect_stream_urls(&document), page_url)
}

/// Episode deep link: rebuild the episode page URL from the episode slug
/// alone and take the first frame embed found there.
async fn episode_streams(
    fetcher: &PageFetcher,
    source: Source,
    episode_slug: &str,
) -> Vec<StreamCandidate> {
    let page_url = reconstruct_url(source, episode_slug);
    let document = match fetcher.fetch_document(&page_url).await {
        Ok(document) => document,
        Err(e) => {
            log::warn!("episode page fetch failed for {}: {}", page_url, e);
            return vec![StreamCandidate::ExternalPage {
                external_url: page_url,
            }];
        }
    };

    let iframe_selector = Selector::parse("iframe").unwrap();
    let frame_src = document
        .select(&iframe_selector)
        .filter_map(|iframe| iframe.value().attr("src"))
        .map(str::trim)
        .find(|src| !src.is_empty());

    match frame_src {
        Some(src) => vec![StreamCandidate::EmbeddedPlayer {
            title: EMBEDDED_PLAYER_LABEL.to_string(),
            external_url: absolutize(src, &page_url),
        }],
        None => vec![StreamCandidate::ExternalPage {
            external_url: page_url,
        }],
    }
}

/// TMDB ids carry no page of their own: look the title up and use it as a
/// search term against every scraping source, one source at a time,
/// resolving streams for each match sequentially.
async fn tmdb_streams(
    fetcher: &PageFetcher,
    cache: &dyn UrlStore,
    config: &Config,
    tmdb_id: &str,
) -> Vec<StreamCandidate> {
    let Some(lookup) = tmdb::lookup(fetcher, &config.tmdb, tmdb_id).await else {
        return Vec::new();
    };

    let mut streams = Vec::new();
    for source in Source::scraping_sources() {
        let matches = catalog::list_entries(
            fetcher,
            cache,
            *source,
            config.catalog.stream_search_limit,
            Some(lookup.name.as_str()),
            false,
        )
        .await;
        for entry in matches {
            streams.extend(streams_from_page(fetcher, &entry.source_url).await);
        }
    }

    if streams.is_empty() {
        return vec![StreamCandidate::ExternalPage {
            external_url: tmdb::show_page_url(tmdb_id),
        }];
    }
    streams
}

/// Resolve playable-stream candidates for an id. Total: any internal
/// failure collapses to an empty list or a fallback candidate, never an
/// error.
pub async fn get_streams(
    fetcher: &PageFetcher,
    cache: &dyn UrlStore,
    config: &Config,
    id: &str,
) -> Vec<StreamCandidate> {
    let Some((source, slug)) = parse_id(id) else {
        log::warn!("streams requested for unparseable id {}", id);
        return Vec::new();
    };

    if source == Source::Tmdb {
        return tmdb_streams(fetcher, cache, config, slug).await;
    }

    let (item_slug, episode_slug) = split_episode(slug);
    if let Some(episode_slug) = episode_slug {
        return episode_streams(fetcher, source, episode_slug).await;
    }

    let page_url = match cache.get(id) {
        Some(url) => url,
        None => {
            let reconstructed = reconstruct_url(source, item_slug);
            log::info!("streams: reconstructing URL for {} -> {}", id, reconstructed);
            reconstructed
        }
    };
    streams_from_page(fetcher, &page_url).await
}
