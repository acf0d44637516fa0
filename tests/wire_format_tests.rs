use rust_anime_scraper::helpers::{entry_id, episode_id, parse_id, split_episode};
use rust_anime_scraper::models::{Source, StreamCandidate};
use serde_json::json;

#[test]
fn entry_and_episode_ids_round_trip_through_parsing() {
    let id = entry_id(Source::AnimesDrive, "https://animesdrive.blog/anime/naruto/");
    assert_eq!(id, "animesdrive:animesdrive-blog-anime-naruto");

    let ep_id = episode_id(&id, "/episodio/naruto-1/");
    assert_eq!(ep_id, "animesdrive:animesdrive-blog-anime-naruto:episodio-naruto-1");

    let (source, slug) = parse_id(&ep_id).unwrap();
    assert_eq!(source, Source::AnimesDrive);
    let (item, episode) = split_episode(slug);
    assert_eq!(item, "animesdrive-blog-anime-naruto");
    assert_eq!(episode, Some("episodio-naruto-1"));
}

#[test]
fn tmdb_ids_keep_their_numeric_slug() {
    let (source, slug) = parse_id("tmdb:12345").unwrap();
    assert_eq!(source, Source::Tmdb);
    assert_eq!(slug, "12345");
}

#[test]
fn direct_media_serializes_as_url_only() {
    let candidate = StreamCandidate::DirectMedia {
        url: "https://cdn.example/a.m3u8".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&candidate).unwrap(),
        json!({ "url": "https://cdn.example/a.m3u8" })
    );
}

#[test]
fn embedded_player_carries_label_and_external_url() {
    let candidate = StreamCandidate::EmbeddedPlayer {
        title: "Embedded player".to_string(),
        external_url: "https://player.example/e/1".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&candidate).unwrap(),
        json!({ "title": "Embedded player", "externalUrl": "https://player.example/e/1" })
    );
}

#[test]
fn external_page_serializes_as_external_url_only() {
    let candidate = StreamCandidate::ExternalPage {
        external_url: "https://animesdrive.blog/anime/x/".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&candidate).unwrap(),
        json!({ "externalUrl": "https://animesdrive.blog/anime/x/" })
    );
}
