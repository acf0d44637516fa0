use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use log::info;
use serde_json::json;
use std::collections::HashMap;

use rust_anime_scraper::app_state::AppState;
use rust_anime_scraper::catalog;
use rust_anime_scraper::config::Config;
use rust_anime_scraper::detail;
use rust_anime_scraper::http_client::PageFetcher;
use rust_anime_scraper::metadata::tmdb;
use rust_anime_scraper::models::Source;
use rust_anime_scraper::stream;
use rust_anime_scraper::url_cache::MemoryUrlCache;

#[get("/manifest.json")]
async fn manifest() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "id": "org.animeroll.addon",
        "version": "0.1.0",
        "name": "AnimeRoll",
        "description": "Anime catalogs, metadata and stream candidates scraped from public sites",
        "resources": ["catalog", "meta", "stream"],
        "types": ["series"],
        "catalogs": [
            {
                "type": "series",
                "id": "animesdrive:latest",
                "name": "AnimesDrive Latest",
                "extra": [{ "name": "search" }]
            },
            {
                "type": "series",
                "id": "anroll:latest",
                "name": "Anroll Latest",
                "extra": [{ "name": "search" }]
            },
            {
                "type": "series",
                "id": "tmdb:popular",
                "name": "Popular Anime (TMDB)"
            }
        ]
    }))
}

#[get("/catalog/{catalog_id}")]
async fn catalog_handler(
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let catalog_id = path.into_inner();
    let search = query
        .get("search")
        .map(String::as_str)
        .filter(|term| !term.is_empty());
    let limit = data.config.catalog.default_limit;

    let metas = match catalog_id.as_str() {
        "animesdrive:latest" | "animesdrive:catalog:latest" => {
            catalog::list_entries(
                &data.fetcher,
                &data.url_cache,
                Source::AnimesDrive,
                limit,
                search,
                data.config.catalog.placeholder_on_empty,
            )
            .await
        }
        "anroll:latest" | "anroll:catalog:latest" => {
            catalog::list_entries(
                &data.fetcher,
                &data.url_cache,
                Source::Anroll,
                limit,
                search,
                data.config.catalog.placeholder_on_empty,
            )
            .await
        }
        "tmdb:popular" | "tmdb:catalog:popular" => {
            tmdb::popular(&data.fetcher, &data.config.tmdb, limit).await
        }
        _ => Vec::new(),
    };

    info!("catalog {} returned {} metas", catalog_id, metas.len());
    HttpResponse::Ok().json(json!({ "metas": metas }))
}

#[get("/meta/{id}")]
async fn meta_handler(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let meta = detail::get_details(&data.fetcher, &data.url_cache, &data.config.tmdb, &id).await;
    HttpResponse::Ok().json(json!({ "meta": meta }))
}

#[get("/stream/{id}")]
async fn stream_handler(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let streams = stream::get_streams(&data.fetcher, &data.url_cache, &data.config, &id).await;
    info!("stream {} returned {} candidates", id, streams.len());
    HttpResponse::Ok().json(json!({ "streams": streams }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    log4rs::init_file("log4rs.yml", Default::default()).unwrap();

    let config = Config::load();
    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(config.port);

    let fetcher = PageFetcher::with_config(config.fetch.fetch_config())
        .expect("Failed to create page fetcher");

    info!("page fetcher initialized:");
    info!("  Max attempts: {}", config.fetch.max_attempts);
    info!("  Timeout: {}s", config.fetch.timeout_secs);
    info!("  Challenge cooldown: {}ms", config.fetch.challenge_cooldown_ms);

    let data = web::Data::new(AppState {
        fetcher,
        url_cache: MemoryUrlCache::new(),
        config,
    });

    let addr = format!("0.0.0.0:{}", port);
    info!("addon running at http://{}/manifest.json", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .service(manifest)
            .service(catalog_handler)
            .service(meta_handler)
            .service(stream_handler)
    })
    .bind(&addr)?
    .run()
    .await
}
