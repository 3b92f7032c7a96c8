use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display};

use crate::error::{AppError, AppResult};

pub mod options;
pub mod request;

pub use options::{PlaylistSort, WidgetDefaults, WidgetOptions, WidgetQuery};
pub use request::{GenreEntry, MenuEntry, WidgetAction, WidgetRequest, WidgetResponse};

/// Library section an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    TvShow,
    Episode,
    Album,
    Song,
    Recording,
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MediaType::Movie => "movie",
            MediaType::TvShow => "tvshow",
            MediaType::Episode => "episode",
            MediaType::Album => "album",
            MediaType::Song => "song",
            MediaType::Recording => "recording",
        };
        write!(f, "{}", name)
    }
}

/// One billed cast member
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub order: u32,
}

/// Resume point of a partially played item, in seconds
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ResumePoint {
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub total: f64,
}

/// Fields shared by every kind of library record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Release year; the library reports 0 when unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Rating on a 0-10 scale; the library reports 0 when unrated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub dateadded: String,
    #[serde(default)]
    pub lastplayed: String,
    #[serde(default)]
    pub playcount: u32,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub art: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<ResumePoint>,
    /// IMDb top 250 rank, 0 when unranked
    #[serde(default, skip_serializing_if = "is_zero")]
    pub top250: u32,
    /// Ordinal assigned by an extended popularity/trending list
    #[serde(
        default,
        rename = "extendedindex",
        skip_serializing_if = "Option::is_none"
    )]
    pub extended_index: Option<u32>,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovieDetails {
    pub movieid: i64,
    pub uniqueid: BTreeMap<String, String>,
    pub cast: Vec<CastMember>,
    pub director: Vec<String>,
    pub writer: Vec<String>,
    pub mpaa: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TvShowDetails {
    pub tvshowid: i64,
    pub cast: Vec<CastMember>,
    pub mpaa: String,
    /// Total number of episodes
    pub episode: u32,
    pub watchedepisodes: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EpisodeDetails {
    pub episodeid: i64,
    pub tvshowid: i64,
    pub showtitle: String,
    pub season: i32,
    pub episode: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlbumDetails {
    pub albumid: i64,
    pub artist: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SongDetails {
    pub songid: i64,
    pub albumid: i64,
    pub album: String,
    pub artist: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecordingDetails {
    pub recordingid: i64,
    pub channel: String,
}

/// Kind-specific part of a record
///
/// The tag is the only thing that tells a movie from a TV show; scorers
/// dispatch on it directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaKind {
    Movie(MovieDetails),
    TvShow(TvShowDetails),
    Episode(EpisodeDetails),
    Album(AlbumDetails),
    Song(SongDetails),
    Recording(RecordingDetails),
}

/// Snapshot of a single library entity as handed to widgets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    #[serde(flatten)]
    pub info: ItemInfo,
    #[serde(flatten)]
    pub kind: MediaKind,
    #[serde(
        default,
        rename = "similarscore",
        skip_serializing_if = "Option::is_none"
    )]
    pub similar_score: Option<f64>,
    #[serde(
        default,
        rename = "recommendedscore",
        skip_serializing_if = "Option::is_none"
    )]
    pub recommended_score: Option<f64>,
    #[serde(
        default,
        rename = "extraproperties",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub extra_properties: BTreeMap<String, String>,
}

impl MediaItem {
    /// Creates an item with the given title and kind and no other metadata
    pub fn new(title: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            info: ItemInfo {
                title: title.into(),
                ..ItemInfo::default()
            },
            kind,
            similar_score: None,
            recommended_score: None,
            extra_properties: BTreeMap::new(),
        }
    }

    /// Builds an item from a raw library record of the given type
    pub fn from_library(media_type: MediaType, mut record: serde_json::Value) -> AppResult<Self> {
        let object = record.as_object_mut().ok_or_else(|| {
            AppError::DataSource(format!("{} record is not a JSON object", media_type))
        })?;
        object.insert("type".to_string(), serde_json::to_value(media_type)?);
        Ok(serde_json::from_value(record)?)
    }

    pub fn media_type(&self) -> MediaType {
        match self.kind {
            MediaKind::Movie(_) => MediaType::Movie,
            MediaKind::TvShow(_) => MediaType::TvShow,
            MediaKind::Episode(_) => MediaType::Episode,
            MediaKind::Album(_) => MediaType::Album,
            MediaKind::Song(_) => MediaType::Song,
            MediaKind::Recording(_) => MediaType::Recording,
        }
    }

    pub fn title(&self) -> &str {
        &self.info.title
    }

    /// Release year, treating 0 as unknown
    pub fn year(&self) -> Option<i32> {
        self.info.year.filter(|year| *year != 0)
    }

    /// Rating, treating 0 as unrated
    pub fn rating(&self) -> Option<f64> {
        self.info.rating.filter(|rating| *rating != 0.0)
    }

    pub fn genres(&self) -> &[String] {
        &self.info.genre
    }

    /// Billed cast, empty for kinds without one
    pub fn cast(&self) -> &[CastMember] {
        match &self.kind {
            MediaKind::Movie(movie) => &movie.cast,
            MediaKind::TvShow(show) => &show.cast,
            _ => &[],
        }
    }

    /// Content certification, empty when unknown
    pub fn mpaa(&self) -> &str {
        match &self.kind {
            MediaKind::Movie(movie) => &movie.mpaa,
            MediaKind::TvShow(show) => &show.mpaa,
            _ => "",
        }
    }

    pub fn movie_id(&self) -> Option<i64> {
        match &self.kind {
            MediaKind::Movie(movie) => Some(movie.movieid),
            _ => None,
        }
    }

    /// Parent show title of an episode
    pub fn show_title(&self) -> Option<&str> {
        match &self.kind {
            MediaKind::Episode(episode) => Some(episode.showtitle.as_str()),
            _ => None,
        }
    }

    pub fn top250_rank(&self) -> Option<u32> {
        Some(self.info.top250).filter(|rank| *rank != 0)
    }

    pub fn is_watched(&self) -> bool {
        self.info.playcount > 0
    }

    /// Partially played item, or a show with some but not all episodes watched
    pub fn is_in_progress(&self) -> bool {
        match &self.kind {
            MediaKind::TvShow(show) => {
                show.watchedepisodes > 0 && show.watchedepisodes < show.episode
            }
            _ => self
                .info
                .resume
                .map(|resume| resume.position > 0.0)
                .unwrap_or(false),
        }
    }

    /// Same title and same release year
    pub fn is_same_title_and_year(&self, other: &MediaItem) -> bool {
        self.info.title == other.info.title && self.year() == other.year()
    }
}
