use serde::Deserialize;
use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
    sync::Arc,
};

use crate::{
    db::{ExtendedList, Filter, LibraryQuery, MediaLibrary, Sort},
    error::AppResult,
    models::{MediaItem, MediaType},
    services::random::{self, RandomSource},
};

/// On-disk layout of a library snapshot
///
/// Records use the same field names as the Kodi JSON-RPC API.
#[derive(Debug, Default, Deserialize)]
pub struct LibrarySnapshot {
    #[serde(default)]
    pub movies: Vec<serde_json::Value>,
    #[serde(default)]
    pub tvshows: Vec<serde_json::Value>,
    #[serde(default)]
    pub episodes: Vec<serde_json::Value>,
    #[serde(default)]
    pub albums: Vec<serde_json::Value>,
    #[serde(default)]
    pub songs: Vec<serde_json::Value>,
    #[serde(default)]
    pub recordings: Vec<serde_json::Value>,
    /// Playlist label to member titles
    #[serde(default)]
    pub playlists: BTreeMap<String, Vec<String>>,
    /// Extended list to ranked titles per section
    #[serde(default)]
    pub extended: HashMap<ExtendedList, HashMap<MediaType, Vec<String>>>,
}

/// In-memory library evaluating queries locally
pub struct SnapshotLibrary {
    items: HashMap<MediaType, Vec<MediaItem>>,
    playlists: BTreeMap<String, Vec<String>>,
    extended: HashMap<ExtendedList, HashMap<MediaType, Vec<String>>>,
    random: Arc<dyn RandomSource>,
}

impl SnapshotLibrary {
    /// Creates a library holding the given items and no playlists
    pub fn from_items(items: Vec<MediaItem>, random: Arc<dyn RandomSource>) -> Self {
        let mut grouped: HashMap<MediaType, Vec<MediaItem>> = HashMap::new();
        for item in items {
            grouped.entry(item.media_type()).or_default().push(item);
        }

        Self {
            items: grouped,
            playlists: BTreeMap::new(),
            extended: HashMap::new(),
            random,
        }
    }

    /// Converts the raw records of a snapshot
    pub fn from_snapshot(snapshot: LibrarySnapshot, random: Arc<dyn RandomSource>) -> AppResult<Self> {
        let sections = [
            (MediaType::Movie, snapshot.movies),
            (MediaType::TvShow, snapshot.tvshows),
            (MediaType::Episode, snapshot.episodes),
            (MediaType::Album, snapshot.albums),
            (MediaType::Song, snapshot.songs),
            (MediaType::Recording, snapshot.recordings),
        ];

        let mut items = Vec::new();
        for (media_type, records) in sections {
            for record in records {
                items.push(MediaItem::from_library(media_type, record)?);
            }
        }

        let mut library = Self::from_items(items, random);
        library.playlists = snapshot.playlists;
        library.extended = snapshot.extended;
        Ok(library)
    }

    /// Parses a snapshot from JSON text
    pub fn from_json_str(json: &str, random: Arc<dyn RandomSource>) -> AppResult<Self> {
        let snapshot: LibrarySnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot, random)
    }

    /// Loads a snapshot file
    pub async fn load(path: impl AsRef<Path>, random: Arc<dyn RandomSource>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await?;
        let library = Self::from_json_str(&json, random)?;

        tracing::info!(
            path = %path.display(),
            movies = library.section_len(MediaType::Movie),
            tvshows = library.section_len(MediaType::TvShow),
            "Loaded library snapshot"
        );

        Ok(library)
    }

    /// Adds or replaces a playlist
    pub fn with_playlist(mut self, label: &str, titles: &[&str]) -> Self {
        self.playlists.insert(
            label.to_string(),
            titles.iter().map(|title| title.to_string()).collect(),
        );
        self
    }

    /// Adds or replaces the ranking of an extended list for one section
    pub fn with_extended(mut self, list: ExtendedList, media_type: MediaType, titles: &[&str]) -> Self {
        self.extended
            .entry(list)
            .or_default()
            .insert(media_type, titles.iter().map(|title| title.to_string()).collect());
        self
    }

    fn section_len(&self, media_type: MediaType) -> usize {
        self.items.get(&media_type).map(Vec::len).unwrap_or(0)
    }

    fn in_playlist(&self, label: &str, title: &str) -> bool {
        self.playlists
            .get(label)
            .map(|titles| titles.iter().any(|t| t == title))
            .unwrap_or(false)
    }

    fn matches(&self, item: &MediaItem, filter: &Filter) -> bool {
        match filter {
            Filter::Watched => item.is_watched(),
            Filter::Unwatched => !item.is_watched(),
            Filter::InProgress => item.is_in_progress(),
            Filter::NotInProgress => !item.is_in_progress(),
            Filter::Tag(tag) => {
                let tag = tag.to_lowercase();
                item.info
                    .tag
                    .iter()
                    .any(|candidate| candidate.to_lowercase().contains(&tag))
            }
            Filter::InPlaylist(label) => self.in_playlist(label, item.title()),
            Filter::NotInPlaylist(label) => !self.in_playlist(label, item.title()),
            Filter::Title(title) => item.title() == title,
            Filter::Genre(genre) => item.genres().iter().any(|g| g == genre),
            Filter::Any(filters) => filters.iter().any(|f| self.matches(item, f)),
        }
    }

    fn sorted(&self, mut items: Vec<MediaItem>, sort: Sort) -> Vec<MediaItem> {
        match sort {
            Sort::LastPlayed => items.sort_by(|a, b| b.info.lastplayed.cmp(&a.info.lastplayed)),
            Sort::DateAdded => items.sort_by(|a, b| b.info.dateadded.cmp(&a.info.dateadded)),
            Sort::Rating => items.sort_by(|a, b| {
                b.rating()
                    .unwrap_or(0.0)
                    .total_cmp(&a.rating().unwrap_or(0.0))
            }),
            Sort::Year => items.sort_by(|a, b| b.year().cmp(&a.year())),
            Sort::Title => items.sort_by(|a, b| a.info.title.cmp(&b.info.title)),
            Sort::Random => return random::shuffle(items, self.random.as_ref()),
        }
        items
    }
}

#[async_trait::async_trait]
impl MediaLibrary for SnapshotLibrary {
    async fn items(&self, media_type: MediaType, query: &LibraryQuery) -> AppResult<Vec<MediaItem>> {
        let section = self.items.get(&media_type).map(Vec::as_slice).unwrap_or(&[]);

        let matching: Vec<MediaItem> = section
            .iter()
            .filter(|item| query.filters.iter().all(|filter| self.matches(item, filter)))
            .cloned()
            .collect();

        let mut result = match query.sort {
            Some(sort) => self.sorted(matching, sort),
            None => matching,
        };

        if let Some(limit) = query.limit {
            result.truncate(limit);
        }

        tracing::debug!(
            media_type = %media_type,
            count = result.len(),
            "Snapshot query"
        );

        Ok(result)
    }

    async fn genres(&self, media_type: MediaType) -> AppResult<Vec<String>> {
        let mut genres: Vec<String> = Vec::new();
        for item in self.items.get(&media_type).into_iter().flatten() {
            for genre in item.genres() {
                if !genres.contains(genre) {
                    genres.push(genre.clone());
                }
            }
        }
        Ok(genres)
    }

    async fn playlists(&self) -> AppResult<Vec<String>> {
        Ok(self.playlists.keys().cloned().collect())
    }

    async fn extended_ranking(
        &self,
        media_type: MediaType,
        list: ExtendedList,
    ) -> AppResult<Vec<String>> {
        Ok(self
            .extended
            .get(&list)
            .and_then(|sections| sections.get(&media_type))
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "snapshot"
    }
}
