/// Per-kind widget providers
///
/// Each library section (movies, TV shows, songs, albums, episodes) gets a
/// provider exposing the kind-specific lists the aggregator merges. PVR
/// recordings come from a separate, smaller seam. Providers are pluggable so
/// the aggregator can be driven by mocks in tests.
use crate::{
    db::ExtendedList,
    error::AppResult,
    models::{MediaItem, WidgetOptions},
};

pub mod library;

pub use library::LibraryWidgets;

/// Kind-specific widget lists for one library section
///
/// Every list honours the options' tag filter and is capped at `options.limit`.
/// Lists that make no sense for a kind (e.g. in-progress albums) are empty.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KindWidgets: Send + Sync {
    /// Recently added, newest first
    async fn recent(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>>;

    /// Random selection
    async fn random(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>>;

    /// Partially played, most recently played first
    async fn inprogress(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>>;

    /// Unplayed items, best rated first
    async fn recommended(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>>;

    /// Items similar to the most recently played one
    async fn similar(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>>;

    /// IMDb top 250 members in rank order
    async fn top250(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>>;

    /// Library items matched against an extended ranking, `extendedindex` set
    async fn extended(
        &self,
        list: ExtendedList,
        options: &WidgetOptions,
    ) -> AppResult<Vec<MediaItem>>;

    /// Shows with a next episode to watch, most recently played first
    async fn nextshows(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>>;

    /// Up to `limit` random items of a genre
    async fn genre_items(&self, genre: &str, limit: usize) -> AppResult<Vec<MediaItem>>;
}

/// PVR recordings
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecordingsSource: Send + Sync {
    /// Latest recordings, capped at `options.limit`
    async fn recordings(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>>;
}
