use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display};

use super::{MediaItem, WidgetOptions, WidgetQuery};

/// Named widget listing exposed to the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetAction {
    Listing,
    PlaylistsListing,
    Playlist,
    RefPlaylist,
    Recommended,
    Recent,
    RecentShowsAndMovies,
    Random,
    InProgress,
    InProgressShowsAndMovies,
    InProgressEpisodesAndMovies,
    InProgressNextShowsAndMovies,
    InProgressAndRecommended,
    InProgressAndRandom,
    WatchAgainShowsAndMovies,
    UnwatchedShowsAndMovies,
    NewRelease,
    RandomTop250,
    TopRated,
    ExtendedPopularTmdb,
    ExtendedPopularTrakt,
    ExtendedTrending,
    ExtendedMostPlayed,
    ExtendedMostWatched,
    BrowseGenres,
    Similar,
    Top250,
}

impl WidgetAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetAction::Listing => "listing",
            WidgetAction::PlaylistsListing => "playlistslisting",
            WidgetAction::Playlist => "playlist",
            WidgetAction::RefPlaylist => "refplaylist",
            WidgetAction::Recommended => "recommended",
            WidgetAction::Recent => "recent",
            WidgetAction::RecentShowsAndMovies => "recentshowsandmovies",
            WidgetAction::Random => "random",
            WidgetAction::InProgress => "inprogress",
            WidgetAction::InProgressShowsAndMovies => "inprogressshowsandmovies",
            WidgetAction::InProgressEpisodesAndMovies => "inprogressepisodesandmovies",
            WidgetAction::InProgressNextShowsAndMovies => "inprogressnextshowsandmovies",
            WidgetAction::InProgressAndRecommended => "inprogressandrecommended",
            WidgetAction::InProgressAndRandom => "inprogressandrandom",
            WidgetAction::WatchAgainShowsAndMovies => "watchagainshowsandmovies",
            WidgetAction::UnwatchedShowsAndMovies => "unwatchedshowsandmovies",
            WidgetAction::NewRelease => "newrelease",
            WidgetAction::RandomTop250 => "randomtop250",
            WidgetAction::TopRated => "toprated",
            WidgetAction::ExtendedPopularTmdb => "extendedpopulartmdb",
            WidgetAction::ExtendedPopularTrakt => "extendedpopulartrakt",
            WidgetAction::ExtendedTrending => "extendedtrending",
            WidgetAction::ExtendedMostPlayed => "extendedmostplayed",
            WidgetAction::ExtendedMostWatched => "extendedmostwatched",
            WidgetAction::BrowseGenres => "browsegenres",
            WidgetAction::Similar => "similar",
            WidgetAction::Top250 => "top250",
        }
    }
}

impl Display for WidgetAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully resolved widget request
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetRequest {
    pub action: WidgetAction,
    pub options: WidgetOptions,
}

impl WidgetRequest {
    pub fn new(action: WidgetAction, options: WidgetOptions) -> Self {
        Self { action, options }
    }
}

/// Menu entry pointing at another widget request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub label: String,
    pub action: WidgetAction,
    #[serde(default)]
    pub params: WidgetQuery,
    pub icon: String,
}

/// Display record for one genre shared by movies and TV shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreEntry {
    pub label: String,
    pub title: String,
    pub art: BTreeMap<String, String>,
    pub thumbnail: String,
    pub is_folder: bool,
}

/// Result of a widget action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WidgetResponse {
    Items(Vec<MediaItem>),
    Entries(Vec<MenuEntry>),
    Genres(Vec<GenreEntry>),
}

impl WidgetResponse {
    /// Empty response of the shape the action normally produces
    pub fn empty_for(action: WidgetAction) -> Self {
        match action {
            WidgetAction::Listing | WidgetAction::PlaylistsListing => {
                WidgetResponse::Entries(Vec::new())
            }
            WidgetAction::BrowseGenres => WidgetResponse::Genres(Vec::new()),
            _ => WidgetResponse::Items(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            WidgetResponse::Items(items) => items.len(),
            WidgetResponse::Entries(entries) => entries.len(),
            WidgetResponse::Genres(genres) => genres.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_items(self) -> Option<Vec<MediaItem>> {
        match self {
            WidgetResponse::Items(items) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_match_serde() {
        for action in [
            WidgetAction::InProgressAndRecommended,
            WidgetAction::RandomTop250,
            WidgetAction::Top250,
            WidgetAction::ExtendedPopularTmdb,
            WidgetAction::PlaylistsListing,
        ] {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
    }

    #[test]
    fn test_action_parses_from_path_segment() {
        let action: WidgetAction = serde_json::from_str("\"watchagainshowsandmovies\"").unwrap();
        assert_eq!(action, WidgetAction::WatchAgainShowsAndMovies);
        assert!(serde_json::from_str::<WidgetAction>("\"favourites\"").is_err());
    }

    #[test]
    fn test_empty_response_shape() {
        assert_eq!(
            WidgetResponse::empty_for(WidgetAction::Listing),
            WidgetResponse::Entries(vec![])
        );
        assert_eq!(
            WidgetResponse::empty_for(WidgetAction::BrowseGenres),
            WidgetResponse::Genres(vec![])
        );
        assert!(WidgetResponse::empty_for(WidgetAction::Recent).is_empty());
    }
}
