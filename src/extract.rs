//! Heuristic content extraction over already-fetched documents.
//!
//! All operations here are pure: given a parsed document (or raw HTML text)
//! they locate catalog entries, episode links, and embedded stream URLs
//! using prioritized structural and textual patterns. Nothing in this module
//! performs network access. Extraction is best-effort by design; unknown
//! layouts degrade to noisier fallback passes instead of failing.

use crate::helpers::{entry_id, episode_id};
use crate::models::{ContentEntry, ContentType, Episode, Source};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Likely post/article containers, most specific themes first. Matches are
/// unioned across groups in document order and deduplicated by element.
const ENTRY_CONTAINER_GROUPS: &[&str] = &["article", ".post", ".entry", ".post-item", ".blog-post"];

/// Content-body regions episode links are scoped to.
const CONTENT_REGIONS: &[&str] = &[".entry-content", ".post-content", ".content", "article", "main"];

/// A stream URL candidate with its provenance: frame-derived URLs become
/// embedded-player candidates downstream, everything else direct media.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamUrl {
    pub url: String,
    pub from_frame: bool,
}

/// Union all matches of `groups` over the document, preserving document
/// order and deduplicating by element identity.
fn union_in_document_order<'a>(document: &'a Html, groups: &[&str]) -> Vec<ElementRef<'a>> {
    let mut matched = HashSet::new();
    for group in groups {
        let selector = Selector::parse(group).unwrap();
        for element in document.select(&selector) {
            matched.insert(element.id());
        }
    }
    if matched.is_empty() {
        return Vec::new();
    }
    let all = Selector::parse("*").unwrap();
    document
        .select(&all)
        .filter(|element| matched.contains(&element.id()))
        .collect()
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Build a catalog entry from one matched container, or None when no usable
/// link/title can be resolved (or the search filter rejects it).
fn container_entry(
    container: ElementRef,
    source: Source,
    search: Option<&str>,
) -> Option<ContentEntry> {
    let link_selector = Selector::parse("h2 a, .entry-title a, a").unwrap();
    let heading_selector = Selector::parse("h2, h1, .entry-title").unwrap();
    let img_selector = Selector::parse("img").unwrap();

    let link = container.select(&link_selector).next()?;
    let href = link.value().attr("href").unwrap_or("").trim();
    if href.is_empty() {
        return None;
    }

    // Title resolution order: nearest heading, link title attribute, link text.
    let title = container
        .select(&heading_selector)
        .next()
        .and_then(|heading| non_empty(element_text(heading)))
        .or_else(|| {
            link.value()
                .attr("title")
                .and_then(|t| non_empty(t.trim().to_string()))
        })
        .or_else(|| non_empty(element_text(link)))?;

    if let Some(term) = search {
        if !title.to_lowercase().contains(&term.to_lowercase()) {
            return None;
        }
    }

    let poster = container
        .select(&img_selector)
        .next()
        .and_then(|img| {
            img.value()
                .attr("src")
                .or_else(|| img.value().attr("data-src"))
        })
        .unwrap_or("")
        .to_string();

    Some(ContentEntry {
        id: entry_id(source, href),
        content_type: ContentType::Series,
        name: title,
        poster,
        overview: String::new(),
        source_url: href.to_string(),
    })
}

/// Locate catalog entries on a listing page.
///
/// Structural pass over prioritized container groups first; if that finds
/// nothing, a noisier scan over every anchor with a path-bearing href; if
/// still nothing and no search term was supplied, optionally a single
/// synthetic placeholder entry pointing at `page_url` so an empty catalog is
/// distinguishable from a failed crawl.
pub fn extract_entries(
    document: &Html,
    source: Source,
    page_url: &str,
    limit: usize,
    search: Option<&str>,
    placeholder_on_empty: bool,
) -> Vec<ContentEntry> {
    let mut entries: Vec<ContentEntry> = Vec::new();

    for container in union_in_document_order(document, ENTRY_CONTAINER_GROUPS) {
        if entries.len() >= limit {
            break;
        }
        if let Some(entry) = container_entry(container, source, search) {
            entries.push(entry);
        }
    }

    // Fallback: unknown layout, scan all anchors. Higher recall, more noise.
    if entries.is_empty() {
        let anchor_selector = Selector::parse("a").unwrap();
        for link in document.select(&anchor_selector) {
            if entries.len() >= limit {
                break;
            }
            let href = link.value().attr("href").unwrap_or("").trim();
            let text = element_text(link);
            if href.is_empty() || text.is_empty() || !href.contains('/') {
                continue;
            }
            if let Some(term) = search {
                if !text.to_lowercase().contains(&term.to_lowercase()) {
                    continue;
                }
            }
            entries.push(ContentEntry {
                id: entry_id(source, href),
                content_type: ContentType::Series,
                name: text,
                poster: String::new(),
                overview: String::new(),
                source_url: href.to_string(),
            });
        }
    }

    // Synthetic placeholder so the caller chain can tell "page had nothing
    // we recognize" apart from "fetch failed". Off by config when unwanted.
    if entries.is_empty() && search.is_none() && placeholder_on_empty && limit > 0 {
        log::debug!("{}: no entries matched, emitting placeholder", source.tag());
        entries.push(ContentEntry {
            id: format!("{}:sample-item", source.tag()),
            content_type: ContentType::Series,
            name: format!("Sample Anime ({})", source.display_name()),
            poster: String::new(),
            overview: String::new(),
            source_url: page_url.to_string(),
        });
    }

    entries.truncate(limit);
    entries
}

/// Locate episode-like links on a detail page.
///
/// Anchors are scoped to content-body regions when any exist, otherwise the
/// whole document is scanned. A link qualifies when its text carries an
/// episode keyword plus a numeral, a bare 1-3 digit number, or its href
/// contains an episode keyword. Numbers default to 1 when nothing parses;
/// callers must tolerate duplicates.
pub fn extract_episodes(document: &Html, parent_id: &str) -> Vec<Episode> {
    let keyword_number_re = Regex::new(r"(?i)\b(?:epis[a-z]*|ep|cap[a-z]*)\s*\.?\s*#?(\d{1,4})").unwrap();
    let bare_number_re = Regex::new(r"\b(\d{1,3})\b").unwrap();
    let href_keyword_re = Regex::new(r"(?i)episodio|episode|capitulo").unwrap();
    let anchor_selector = Selector::parse("a").unwrap();

    let regions = union_in_document_order(document, CONTENT_REGIONS);

    let mut episodes = Vec::new();
    let mut seen = HashSet::new();

    let mut scan = |link: ElementRef| {
        if !seen.insert(link.id()) {
            return;
        }
        let href = link.value().attr("href").unwrap_or("").trim();
        if href.is_empty() {
            return;
        }
        let text = element_text(link);

        let number_capture = keyword_number_re
            .captures(&text)
            .or_else(|| bare_number_re.captures(&text));
        if number_capture.is_none() && !href_keyword_re.is_match(href) {
            return;
        }

        let episode_number = number_capture
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1);

        let title = if text.is_empty() { href.to_string() } else { text };
        episodes.push(Episode {
            id: episode_id(parent_id, href),
            title,
            episode_number,
        });
    };

    if regions.is_empty() {
        for link in document.select(&anchor_selector) {
            scan(link);
        }
    } else {
        for region in regions {
            for link in region.select(&anchor_selector) {
                scan(link);
            }
        }
    }

    episodes
}

fn is_noise_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    let js_re = Regex::new(r"(?i)\.js(\?|$)").unwrap();
    js_re.is_match(url) || lower.contains("cloudflare-static") || lower.contains("rocket-loader")
}

fn push_unique(out: &mut Vec<StreamUrl>, seen: &mut HashSet<String>, url: &str, from_frame: bool) {
    let url = url.trim();
    if url.is_empty() || !seen.insert(url.to_string()) {
        return;
    }
    out.push(StreamUrl {
        url: url.to_string(),
        from_frame,
    });
}

/// The three textual pattern classes over raw HTML, in priority order:
/// frame-embed sources, direct media-file URLs, then generic "source"-looking
/// src attributes. One insertion-ordered dedup set across all classes, with
/// script/static-asset noise removed at the end.
fn pattern_stream_urls(html: &str) -> Vec<StreamUrl> {
    let iframe_re = Regex::new(r#"(?i)<iframe[^>]*src=["']([^"']+)["']"#).unwrap();
    let media_re =
        Regex::new(r#"(?i)https?://[^\s'"<>]+?\.(?:m3u8|mp4|webm|mkv)(?:\?[^'"\s<>]*)?"#).unwrap();
    let src_attr_re = Regex::new(r#"(?i)src=["']([^"']+)["']"#).unwrap();
    let hint_re = Regex::new(r"(?i)m3u8|mp4|webm|mkv|player|cdn|stream").unwrap();

    let mut out = Vec::new();
    let mut seen = HashSet::new();

    for caps in iframe_re.captures_iter(html) {
        push_unique(&mut out, &mut seen, &caps[1], true);
    }
    for m in media_re.find_iter(html) {
        push_unique(&mut out, &mut seen, m.as_str(), false);
    }
    // Broad net last: hosts that proxy streams without a media extension.
    for caps in src_attr_re.captures_iter(html) {
        if hint_re.is_match(&caps[1]) {
            push_unique(&mut out, &mut seen, &caps[1], false);
        }
    }

    out.retain(|candidate| !is_noise_url(&candidate.url));
    out
}

/// Extract probable stream URLs from arbitrary HTML text, frame URLs first.
pub fn extract_stream_urls(html: &str) -> Vec<String> {
    pattern_stream_urls(html)
        .into_iter()
        .map(|candidate| candidate.url)
        .collect()
}

/// Structural companion to [`extract_stream_urls`]: collect `<video>` /
/// `<source>` / `<iframe>` src values from the DOM first, then merge in the
/// textual pattern classes over the serialized page, deduplicated by URL.
pub fn collect_stream_urls(document: &Html) -> Vec<StreamUrl> {
    let video_selector = Selector::parse("video").unwrap();
    let source_selector = Selector::parse("source").unwrap();
    let iframe_selector = Selector::parse("iframe").unwrap();

    let mut out = Vec::new();
    let mut seen = HashSet::new();

    for video in document.select(&video_selector) {
        if let Some(src) = video.value().attr("src") {
            push_unique(&mut out, &mut seen, src, false);
        }
        for source in video.select(&source_selector) {
            if let Some(src) = source.value().attr("src") {
                push_unique(&mut out, &mut seen, src, false);
            }
        }
    }
    for iframe in document.select(&iframe_selector) {
        if let Some(src) = iframe.value().attr("src") {
            push_unique(&mut out, &mut seen, src, true);
        }
    }

    for candidate in pattern_stream_urls(&document.root_element().html()) {
        if seen.insert(candidate.url.clone()) {
            out.push(candidate);
        }
    }

    out
}

/// Title/description/poster pulled from a detail page's meta tags with
/// progressively less structured fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub poster: String,
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .and_then(|content| non_empty(content.trim().to_string()))
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|element| non_empty(element_text(element)))
}

fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .and_then(|value| non_empty(value.trim().to_string()))
}

pub fn extract_page_meta(document: &Html) -> PageMeta {
    let title = meta_content(document, r#"meta[property="og:title"]"#)
        .or_else(|| first_text(document, "title"))
        .unwrap_or_default();
    let description = meta_content(document, r#"meta[property="og:description"]"#)
        .or_else(|| meta_content(document, r#"meta[name="description"]"#))
        .or_else(|| first_text(document, ".entry-content p"))
        .or_else(|| first_text(document, "p"))
        .unwrap_or_default();
    let poster = meta_content(document, r#"meta[property="og:image"]"#)
        .or_else(|| first_attr(document, "img", "src"))
        .unwrap_or_default();

    PageMeta {
        title,
        description,
        poster,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_filter_drops_script_urls() {
        assert!(is_noise_url("https://site.example/app.js"));
        assert!(is_noise_url("https://site.example/app.js?v=2"));
        assert!(is_noise_url("https://ajax.cloudflare-static.example/x"));
        assert!(is_noise_url("https://site.example/rocket-loader.min.js"));
        assert!(!is_noise_url("https://cdn.example/video.m3u8"));
    }

    #[test]
    fn pattern_classes_keep_priority_order() {
        let html = r#"
            <p>https://cdn.example/a.m3u8?token=1</p>
            <iframe src="https://player.example/embed/42"></iframe>
            <script src="https://site.example/bundle.js"></script>
        "#;
        let urls = extract_stream_urls(html);
        assert_eq!(
            urls,
            vec![
                "https://player.example/embed/42".to_string(),
                "https://cdn.example/a.m3u8?token=1".to_string(),
            ]
        );
    }

    #[test]
    fn generic_src_hints_are_last_resort() {
        let html = r#"<embed src="https://cdn.host.example/proxy/stream/9f"></embed>"#;
        let urls = extract_stream_urls(html);
        assert_eq!(urls, vec!["https://cdn.host.example/proxy/stream/9f".to_string()]);
    }

    #[test]
    fn page_meta_prefers_open_graph() {
        let document = Html::parse_document(
            r#"<html><head>
                <title>Fallback Title</title>
                <meta property="og:title" content="Naruto Shippuden">
                <meta property="og:description" content="A ninja story.">
                <meta property="og:image" content="https://img.example/naruto.jpg">
            </head><body><p>First paragraph.</p></body></html>"#,
        );
        let meta = extract_page_meta(&document);
        assert_eq!(meta.title, "Naruto Shippuden");
        assert_eq!(meta.description, "A ninja story.");
        assert_eq!(meta.poster, "https://img.example/naruto.jpg");
    }

    #[test]
    fn page_meta_falls_back_to_body_content() {
        let document = Html::parse_document(
            r#"<html><head><title>Bleach - Watch Online</title></head>
            <body><img src="/poster.jpg"><p>Soul reapers and hollows.</p></body></html>"#,
        );
        let meta = extract_page_meta(&document);
        assert_eq!(meta.title, "Bleach - Watch Online");
        assert_eq!(meta.description, "Soul reapers and hollows.");
        assert_eq!(meta.poster, "/poster.jpg");
    }
}
