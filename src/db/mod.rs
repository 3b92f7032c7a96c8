//! Host media library abstraction
//!
//! Widgets never talk to a concrete database. They build a [`LibraryQuery`]
//! and hand it to a [`MediaLibrary`], which is either a live Kodi instance
//! ([`KodiLibrary`]) or an in-memory snapshot ([`SnapshotLibrary`]).

use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{MediaItem, MediaType},
};

pub mod kodi;
pub mod snapshot;

pub use kodi::KodiLibrary;
pub use snapshot::SnapshotLibrary;

/// Record filter understood by every library backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Watched,
    Unwatched,
    InProgress,
    NotInProgress,
    /// Tag contains the value
    Tag(String),
    InPlaylist(String),
    NotInPlaylist(String),
    /// Exact title match
    Title(String),
    Genre(String),
    /// Matches when any of the nested filters matches
    Any(Vec<Filter>),
}

/// Sort order; date and score-like keys are descending, title ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    LastPlayed,
    DateAdded,
    Rating,
    Year,
    Title,
    Random,
}

/// Filter/sort/limit request against one library section
///
/// All filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryQuery {
    pub filters: Vec<Filter>,
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl LibraryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds a tag filter when a tag is set
    pub fn tagged(self, tag: Option<&str>) -> Self {
        match tag {
            Some(tag) => self.filter(Filter::Tag(tag.to_string())),
            None => self,
        }
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Third-party ranked lists matched against the local library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtendedList {
    PopularTmdb,
    PopularTrakt,
    Trending,
    MostPlayed,
    MostWatched,
}

/// Host media database
///
/// Every call is an independent blocking-style request; implementations hold
/// no per-request state.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Items of one library section matching the query
    async fn items(&self, media_type: MediaType, query: &LibraryQuery) -> AppResult<Vec<MediaItem>>;

    /// Genre labels defined for a library section
    async fn genres(&self, media_type: MediaType) -> AppResult<Vec<String>>;

    /// Labels of the user's video playlists
    async fn playlists(&self) -> AppResult<Vec<String>>;

    /// Titles of an extended list in rank order
    ///
    /// Backends without access to third-party rankings return an empty list.
    async fn extended_ranking(
        &self,
        _media_type: MediaType,
        _list: ExtendedList,
    ) -> AppResult<Vec<String>> {
        Ok(Vec::new())
    }

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}
