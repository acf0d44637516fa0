use serde::{Deserialize, Serialize};

/// Upstream content sources known to the addon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    AnimesDrive,
    Anroll,
    Tmdb,
}

impl Source {
    /// Short identifier prefix used in wire-format ids (`"<tag>:<slug>"`).
    pub fn tag(&self) -> &'static str {
        match self {
            Source::AnimesDrive => "animesdrive",
            Source::Anroll => "anroll",
            Source::Tmdb => "tmdb",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Source::AnimesDrive => "AnimesDrive",
            Source::Anroll => "Anroll",
            Source::Tmdb => "TMDB",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Source::AnimesDrive => "https://animesdrive.blog",
            Source::Anroll => "https://www.anroll.net",
            Source::Tmdb => "https://www.themoviedb.org",
        }
    }

    /// Catalog listing URL: the home page, or the site search when a term is given.
    pub fn listing_url(&self, search: Option<&str>) -> String {
        match search {
            Some(term) => format!("{}/?s={}", self.base_url(), urlencoding::encode(term)),
            None => format!("{}/", self.base_url()),
        }
    }

    pub fn from_tag(tag: &str) -> Option<Source> {
        match tag {
            "animesdrive" => Some(Source::AnimesDrive),
            "anroll" => Some(Source::Anroll),
            "tmdb" => Some(Source::Tmdb),
            _ => None,
        }
    }

    /// Sources resolved by scraping HTML, in search priority order.
    pub fn scraping_sources() -> &'static [Source] {
        &[Source::AnimesDrive, Source::Anroll]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Series,
}

/// One normalized catalog entry produced from a listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub name: String,
    pub poster: String,
    pub overview: String,
    #[serde(rename = "sourceUrl")]
    pub source_url: String,
}

/// Full metadata for a single item, assembled per request.
#[derive(Debug, Clone, Serialize)]
pub struct DetailRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub name: String,
    pub description: String,
    pub poster: String,
    pub background: String,
    pub genres: Vec<String>,
    #[serde(rename = "releaseInfo")]
    pub release_info: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    pub runtime: String,
    pub episodes: Vec<Episode>,
}

/// Episode-like sub-link found on a detail page. Numbers are heuristic and
/// may repeat when the page text carries no usable numeral.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    #[serde(rename = "episodeNumber")]
    pub episode_number: u32,
}

/// A playable-stream candidate. DirectMedia and EmbeddedPlayer are preferred;
/// ExternalPage is the last-resort "open the page yourself" fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StreamCandidate {
    DirectMedia {
        url: String,
    },
    EmbeddedPlayer {
        title: String,
        #[serde(rename = "externalUrl")]
        external_url: String,
    },
    ExternalPage {
        #[serde(rename = "externalUrl")]
        external_url: String,
    },
}
