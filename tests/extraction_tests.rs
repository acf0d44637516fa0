use rust_anime_scraper::extract::{
    collect_stream_urls, extract_entries, extract_episodes, extract_stream_urls, StreamUrl,
};
use rust_anime_scraper::models::Source;
use scraper::Html;

const PAGE_URL: &str = "https://animesdrive.blog/";

fn listing_page() -> Html {
    Html::parse_document(
        r#"<html><body>
            <article>
                <h2><a href="https://animesdrive.blog/anime/naruto-shippuden/">Naruto Shippuden</a></h2>
                <img src="https://img.example/naruto.jpg">
            </article>
            <article>
                <h2><a href="https://animesdrive.blog/anime/one-piece/">One Piece</a></h2>
                <img data-src="https://img.example/one-piece.jpg">
            </article>
            <article>
                <h2><a href="https://animesdrive.blog/anime/bleach/">Bleach</a></h2>
            </article>
        </body></html>"#,
    )
}

#[test]
fn structural_pass_finds_entries_in_document_order() {
    let entries = extract_entries(&listing_page(), Source::AnimesDrive, PAGE_URL, 50, None, true);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].name, "Naruto Shippuden");
    assert_eq!(entries[1].name, "One Piece");
    assert_eq!(entries[2].name, "Bleach");
    assert_eq!(entries[0].id, "animesdrive:animesdrive-blog-anime-naruto-shippuden");
    assert_eq!(
        entries[0].source_url,
        "https://animesdrive.blog/anime/naruto-shippuden/"
    );
}

#[test]
fn poster_falls_back_to_data_src() {
    let entries = extract_entries(&listing_page(), Source::AnimesDrive, PAGE_URL, 50, None, true);
    assert_eq!(entries[0].poster, "https://img.example/naruto.jpg");
    assert_eq!(entries[1].poster, "https://img.example/one-piece.jpg");
    assert_eq!(entries[2].poster, "");
}

#[test]
fn never_returns_more_than_limit() {
    let entries = extract_entries(&listing_page(), Source::AnimesDrive, PAGE_URL, 2, None, true);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "Naruto Shippuden");
    assert_eq!(entries[1].name, "One Piece");
}

#[test]
fn search_term_filters_titles_case_insensitively() {
    let entries = extract_entries(
        &listing_page(),
        Source::AnimesDrive,
        PAGE_URL,
        50,
        Some("piece"),
        true,
    );
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "One Piece");
}

#[test]
fn same_url_always_yields_same_id() {
    let first = extract_entries(&listing_page(), Source::AnimesDrive, PAGE_URL, 50, None, true);
    let second = extract_entries(&listing_page(), Source::AnimesDrive, PAGE_URL, 50, None, true);
    assert_eq!(first[0].id, second[0].id);
}

#[test]
fn title_attribute_is_used_when_no_heading_exists() {
    let document = Html::parse_document(
        r#"<div class="post">
            <a href="/anime/dragon-ball/" title="Dragon Ball"><span></span></a>
        </div>"#,
    );
    let entries = extract_entries(&document, Source::Anroll, PAGE_URL, 50, None, true);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Dragon Ball");
}

#[test]
fn anchor_fallback_recovers_unknown_layouts() {
    let document = Html::parse_document(
        r##"<div class="weird-theme">
            <a href="/anime/bleach/">Bleach</a>
            <a href="#">skip me</a>
            <a href="nopath">skip me too</a>
        </div>"##,
    );
    let entries = extract_entries(&document, Source::Anroll, PAGE_URL, 50, None, true);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Bleach");
    assert_eq!(entries[0].id, "anroll:anime-bleach");
}

#[test]
fn barren_page_yields_exactly_one_placeholder() {
    let document = Html::parse_document("<html><body><p>nothing here</p></body></html>");
    let entries = extract_entries(&document, Source::AnimesDrive, PAGE_URL, 50, None, true);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "animesdrive:sample-item");
    assert_eq!(entries[0].name, "Sample Anime (AnimesDrive)");
    assert_eq!(entries[0].source_url, PAGE_URL);
}

#[test]
fn placeholder_is_suppressed_when_searching() {
    let document = Html::parse_document("<html><body><p>nothing here</p></body></html>");
    let entries = extract_entries(
        &document,
        Source::AnimesDrive,
        PAGE_URL,
        50,
        Some("naruto"),
        true,
    );
    assert!(entries.is_empty());
}

#[test]
fn placeholder_can_be_disabled() {
    let document = Html::parse_document("<html><body><p>nothing here</p></body></html>");
    let entries = extract_entries(&document, Source::AnimesDrive, PAGE_URL, 50, None, false);
    assert!(entries.is_empty());
}

#[test]
fn episode_links_are_scoped_to_content_regions() {
    let document = Html::parse_document(
        r#"<html><body>
            <nav><a href="/genero/acao/">Action 2024</a></nav>
            <div class="entry-content">
                <a href="/episodio/naruto-1/">Episodio 1</a>
                <a href="/episodio/naruto-2/">Episodio 2</a>
                <a href="/sobre/">About the show</a>
            </div>
        </body></html>"#,
    );
    let episodes = extract_episodes(&document, "animesdrive:anime-naruto");
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].episode_number, 1);
    assert_eq!(episodes[1].episode_number, 2);
    assert_eq!(episodes[0].id, "animesdrive:anime-naruto:episodio-naruto-1");
}

#[test]
fn episode_number_defaults_to_one_without_a_numeral() {
    let document = Html::parse_document(
        r#"<div class="entry-content">
            <a href="/episodio/naruto-final/">Final</a>
        </div>"#,
    );
    let episodes = extract_episodes(&document, "animesdrive:anime-naruto");
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].episode_number, 1);
    assert_eq!(episodes[0].title, "Final");
}

#[test]
fn bare_numbers_qualify_as_episode_links() {
    let document = Html::parse_document(
        r#"<div class="entry-content">
            <a href="/assistir/naruto/12/">12</a>
        </div>"#,
    );
    let episodes = extract_episodes(&document, "animesdrive:anime-naruto");
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].episode_number, 12);
}

#[test]
fn whole_document_is_scanned_when_no_content_region_exists() {
    let document = Html::parse_document(
        r#"<div class="bare"><a href="/episodio/bleach-3/">Episode 3</a></div>"#,
    );
    let episodes = extract_episodes(&document, "anroll:anime-bleach");
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].episode_number, 3);
}

#[test]
fn frame_urls_come_before_media_urls_and_scripts_are_dropped() {
    let html = r#"
        <p>mirror: https://cdn.example/a.m3u8?token=1</p>
        <iframe src="https://player.example/x"></iframe>
        <script src="https://static.example/app.js"></script>
    "#;
    let urls = extract_stream_urls(html);
    assert_eq!(
        urls,
        vec![
            "https://player.example/x".to_string(),
            "https://cdn.example/a.m3u8?token=1".to_string(),
        ]
    );
}

#[test]
fn collector_merges_dom_and_pattern_passes() {
    let document = Html::parse_document(
        r#"<html><body>
            <video src="/video/ep1.mp4">
                <source src="https://cdn.example/ep1.m3u8">
            </video>
            <iframe src="https://player.example/embed/1"></iframe>
        </body></html>"#,
    );
    let urls = collect_stream_urls(&document);
    assert_eq!(
        urls,
        vec![
            StreamUrl {
                url: "/video/ep1.mp4".to_string(),
                from_frame: false,
            },
            StreamUrl {
                url: "https://cdn.example/ep1.m3u8".to_string(),
                from_frame: false,
            },
            StreamUrl {
                url: "https://player.example/embed/1".to_string(),
                from_frame: true,
            },
        ]
    );
}
