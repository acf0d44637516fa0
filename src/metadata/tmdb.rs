//! TMDB client: popular-anime catalog and lookup by numeric id.
//!
//! Failures never propagate; both operations degrade to an empty/absent
//! result and log the cause.

use super::MetaLookup;
use crate::config::TmdbSettings;
use crate::http_client::PageFetcher;
use crate::models::{ContentEntry, ContentType};
use serde_json::Value;

const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
const BACKDROP_BASE: &str = "https://image.tmdb.org/t/p/w1280";

fn str_field(value: &Value, key: &str) -> String {
    value.get(key).and_then(Value::as_str).unwrap_or("").to_string()
}

/// Page URL shown to users for a TMDB show id.
pub fn show_page_url(tmdb_id: &str) -> String {
    format!("https://www.themoviedb.org/tv/{}", tmdb_id)
}

/// Popular animation TV shows, mapped into catalog entries with `tmdb:`
/// prefixed ids. Empty on any failure.
pub async fn popular(
    fetcher: &PageFetcher,
    settings: &TmdbSettings,
    limit: usize,
) -> Vec<ContentEntry> {
    let url = format!(
        "{}/discover/tv?api_key={}&with_genres=16&sort_by=popularity.desc&page=1",
        settings.base_url, settings.api_key
    );
    let json = match fetcher.fetch_json(&url).await {
        Ok(json) => json,
        Err(e) => {
            log::error!("tmdb: discover request failed: {}", e);
            return Vec::new();
        }
    };
    let Some(results) = json.get("results").and_then(Value::as_array) else {
        log::warn!("tmdb: discover response had no results array");
        return Vec::new();
    };

    let entries: Vec<ContentEntry> = results
        .iter()
        .take(limit)
        .filter_map(|show| {
            let id = show.get("id").and_then(Value::as_i64)?;
            let name = str_field(show, "name");
            if name.is_empty() {
                return None;
            }
            let poster = show
                .get("poster_path")
                .and_then(Value::as_str)
                .map(|path| format!("{}{}", POSTER_BASE, path))
                .unwrap_or_default();
            Some(ContentEntry {
                id: format!("tmdb:{}", id),
                content_type: ContentType::Series,
                name,
                poster,
                overview: str_field(show, "overview"),
                source_url: show_page_url(&id.to_string()),
            })
        })
        .collect();

    log::info!("tmdb: returning {} popular entries", entries.len());
    entries
}

/// Look up one show by numeric id. Absent on transport/HTTP/JSON failure or
/// when the response carries no id (TMDB's not-found shape).
pub async fn lookup(
    fetcher: &PageFetcher,
    settings: &TmdbSettings,
    tmdb_id: &str,
) -> Option<MetaLookup> {
    let url = format!("{}/tv/{}?api_key={}", settings.base_url, tmdb_id, settings.api_key);
    let show = match fetcher.fetch_json(&url).await {
        Ok(json) => json,
        Err(e) => {
            log::error!("tmdb: lookup failed for {}: {}", tmdb_id, e);
            return None;
        }
    };
    show.get("id").and_then(Value::as_i64)?;

    let poster = show
        .get("poster_path")
        .and_then(Value::as_str)
        .map(|path| format!("{}{}", POSTER_BASE, path))
        .unwrap_or_default();
    let background = show
        .get("backdrop_path")
        .and_then(Value::as_str)
        .map(|path| format!("{}{}", BACKDROP_BASE, path))
        .unwrap_or_else(|| poster.clone());
    let genres = show
        .get("genres")
        .and_then(Value::as_array)
        .map(|genres| {
            genres
                .iter()
                .filter_map(|genre| genre.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let release_year = show
        .get("first_air_date")
        .and_then(Value::as_str)
        .map(|date| date.chars().take(4).collect())
        .unwrap_or_default();
    let rating = show
        .get("vote_average")
        .and_then(Value::as_f64)
        .map(|avg| avg.to_string())
        .unwrap_or_default();
    let runtime = show
        .get("episode_run_time")
        .and_then(Value::as_array)
        .and_then(|times| times.first())
        .and_then(Value::as_i64)
        .map(|minutes| minutes.to_string())
        .unwrap_or_default();

    Some(MetaLookup {
        name: str_field(&show, "name"),
        overview: str_field(&show, "overview"),
        poster,
        background,
        genres,
        release_year,
        rating,
        runtime,
    })
}
