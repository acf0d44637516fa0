//! Helper functions shared across the addon
//!
//! This module provides utility functions used throughout the application:
//! - Slug derivation from URLs and link paths
//! - Wire-format identifier construction and parsing
//! - Deterministic URL reconstruction for cache misses
//! - Relative/protocol-relative URL absolutization
//!
//! # Examples
//!
//! ```
//! use rust_anime_scraper::helpers::{slugify, parse_id};
//! use rust_anime_scraper::models::Source;
//!
//! let slug = slugify("https://animesdrive.blog/anime/naruto/");
//! assert_eq!(slug, "animesdrive-blog-anime-naruto");
//!
//! let (source, rest) = parse_id("anroll:some-show").unwrap();
//! assert_eq!(source, Source::Anroll);
//! assert_eq!(rest, "some-show");
//! ```

use crate::models::Source;
use reqwest::Url;

/// Derive a URL-safe slug: strip the scheme, then collapse every run of
/// non-word characters into a single `-`. Leading/trailing separators are
/// trimmed so the result round-trips through id parsing and URL
/// reconstruction.
///
/// The same input always yields the same slug; ids built from it are stable.
pub fn slugify(input: &str) -> String {
    let stripped = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
        .unwrap_or(input);

    let mut out = String::with_capacity(stripped.len());
    let mut pending_sep = false;
    for c in stripped.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Slug of the path portion of a link: scheme and host are stripped for
/// absolute URLs, then the remainder is slugified. Relative hrefs are
/// slugified as-is.
pub fn path_slug(href: &str) -> String {
    match Url::parse(href) {
        Ok(url) => {
            let mut path = url.path().to_string();
            if let Some(q) = url.query() {
                path.push('?');
                path.push_str(q);
            }
            slugify(&path)
        }
        Err(_) => slugify(href),
    }
}

/// Wire-format id for a catalog entry: `"<sourceTag>:<slug(href)>"`.
pub fn entry_id(source: Source, href: &str) -> String {
    format!("{}:{}", source.tag(), slugify(href))
}

/// Wire-format id for an episode: the parent id plus a slug of the link path.
pub fn episode_id(parent_id: &str, href: &str) -> String {
    format!("{}:{}", parent_id, path_slug(href))
}

/// Split a wire-format id into its source and the remaining slug portion.
/// The slug may itself contain further colon-delimited segments for
/// episode-level ids.
pub fn parse_id(id: &str) -> Option<(Source, &str)> {
    let (tag, rest) = id.split_once(':')?;
    if rest.is_empty() {
        return None;
    }
    Some((Source::from_tag(tag)?, rest))
}

/// Split an item-or-episode slug into the item portion and, when present,
/// the episode portion (`"itemSlug:episodeSlug"`).
pub fn split_episode(slug: &str) -> (&str, Option<&str>) {
    match slug.split_once(':') {
        Some((item, episode)) if !episode.is_empty() => (item, Some(episode)),
        _ => (slug, None),
    }
}

/// Deterministic fallback when the id cache has no URL for an id: rebuild a
/// plausible page URL from the source's base URL and the slug portion.
pub fn reconstruct_url(source: Source, slug: &str) -> String {
    format!("{}/{}", source.base_url(), slug)
}

/// Rewrite protocol-relative (`//…`) and root-relative (`/…`) URLs to
/// absolute ones using the fetched page's URL as base. Anything else is
/// returned untouched.
pub fn absolutize(url: &str, page_url: &str) -> String {
    if let Some(rest) = url.strip_prefix("//") {
        return format!("https://{}", rest);
    }
    if url.starts_with('/') {
        if let Ok(base) = Url::parse(page_url) {
            if let Ok(joined) = base.join(url) {
                return joined.to_string();
            }
        }
        log::debug!("could not absolutize {} against {}", url, page_url);
    }
    url.to_string()
}
