//! Menu and genre entries
//!
//! Builders for the non-item widgets: the main listing, the playlist picker and
//! the genre browser. They work on data the aggregator already fetched.

use std::collections::BTreeMap;

use crate::{
    models::{GenreEntry, MediaItem, MenuEntry, WidgetAction, WidgetOptions, WidgetQuery},
    services::localization::Localizer,
};

const MOVIES_ICON: &str = "DefaultMovies.png";
const TVSHOWS_ICON: &str = "DefaultTvShows.png";
const GENRE_THUMBNAIL: &str = "DefaultGenre.png";

/// Tag value that turns the playlist picker into the reference-playlist picker
pub const REFERENCE_TAG: &str = "ref";

/// Number of items whose artwork decorates a genre entry
pub const GENRE_ART_ITEMS: usize = 5;

const LISTING: [(u32, WidgetAction); 6] = [
    (32080, WidgetAction::InProgressEpisodesAndMovies),
    (32088, WidgetAction::UnwatchedShowsAndMovies),
    (32086, WidgetAction::WatchAgainShowsAndMovies),
    (32087, WidgetAction::NewRelease),
    (32081, WidgetAction::RandomTop250),
    (32004, WidgetAction::TopRated),
];

/// (source, list, action)
const EXTENDED_LISTING: [(u32, u32, WidgetAction); 5] = [
    (32100, 32090, WidgetAction::ExtendedPopularTmdb),
    (32101, 32090, WidgetAction::ExtendedPopularTrakt),
    (32101, 32102, WidgetAction::ExtendedTrending),
    (32101, 32105, WidgetAction::ExtendedMostPlayed),
    (32101, 32108, WidgetAction::ExtendedMostWatched),
];

/// Main menu entries, prefixed with the tag and carrying it forward
pub fn main_listing(options: &WidgetOptions, localizer: &dyn Localizer) -> Vec<MenuEntry> {
    let tag = options.tag();
    let prefix = tag.map(|tag| format!("{} - ", tag)).unwrap_or_default();

    let mut entries: Vec<MenuEntry> = LISTING
        .iter()
        .map(|(id, action)| MenuEntry {
            label: format!("{}{}", prefix, localizer.localize(*id)),
            action: *action,
            params: WidgetQuery::tagged(tag),
            icon: MOVIES_ICON.to_string(),
        })
        .collect();

    if options.extended_info {
        entries.extend(EXTENDED_LISTING.iter().map(|(source, list, action)| MenuEntry {
            label: format!(
                "{} - {}",
                localizer.localize(*source),
                localizer.localize(*list)
            ),
            action: *action,
            params: WidgetQuery::default(),
            icon: MOVIES_ICON.to_string(),
        }));
    }

    entries
}

/// One entry per playlist label
///
/// Without a movie playlist chosen yet, entries pick the movie playlist and
/// stay in the picker; once chosen, entries pick the TV playlist and open
/// the playlist widget (or the reference widget under the `ref` tag).
pub fn playlist_entries(labels: Vec<String>, options: &WidgetOptions) -> Vec<MenuEntry> {
    let reference = options.tag() == Some(REFERENCE_TAG);

    labels
        .into_iter()
        .map(|label| match &options.movie_label {
            Some(movie_label) => MenuEntry {
                action: if reference {
                    WidgetAction::RefPlaylist
                } else {
                    WidgetAction::Playlist
                },
                params: WidgetQuery {
                    movie_label: Some(movie_label.clone()),
                    tv_label: Some(label.clone()),
                    ..WidgetQuery::default()
                },
                icon: TVSHOWS_ICON.to_string(),
                label,
            },
            None => MenuEntry {
                action: WidgetAction::PlaylistsListing,
                params: WidgetQuery {
                    tag: reference.then(|| REFERENCE_TAG.to_string()),
                    movie_label: Some(label.clone()),
                    ..WidgetQuery::default()
                },
                icon: MOVIES_ICON.to_string(),
                label,
            },
        })
        .collect()
}

/// Genres present in both lists, in movie order
pub fn shared_genres(movie_genres: &[String], tvshow_genres: &[String]) -> Vec<String> {
    movie_genres
        .iter()
        .filter(|genre| tvshow_genres.contains(genre))
        .cloned()
        .collect()
}

/// Genre display record decorated with the given items' artwork
pub fn genre_entry(genre: &str, items: &[MediaItem]) -> GenreEntry {
    let mut art = BTreeMap::new();
    for (index, item) in items.iter().enumerate() {
        let poster = item.info.art.get("poster").cloned().unwrap_or_default();
        let fanart = item.info.art.get("fanart").cloned().unwrap_or_default();
        art.insert(format!("poster.{}", index), poster);
        art.entry("fanart".to_string())
            .or_insert_with(|| fanart.clone());
        art.insert(format!("fanart.{}", index), fanart);
    }

    GenreEntry {
        label: genre.to_string(),
        title: genre.to_string(),
        art,
        thumbnail: GENRE_THUMBNAIL.to_string(),
        is_folder: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;
    use crate::services::localization::EnglishStrings;

    #[test]
    fn test_listing_prefixes_tag() {
        let options = WidgetOptions {
            tag: Some("Kids".to_string()),
            ..WidgetOptions::default()
        };
        let entries = main_listing(&options, &EnglishStrings);

        assert_eq!(entries.len(), 6);
        assert_eq!(entries[2].label, "Kids - Watch Again");
        assert_eq!(entries[2].action, WidgetAction::WatchAgainShowsAndMovies);
        assert_eq!(entries[2].params.tag.as_deref(), Some("Kids"));
    }

    #[test]
    fn test_listing_extended_entries() {
        let options = WidgetOptions {
            extended_info: true,
            ..WidgetOptions::default()
        };
        let entries = main_listing(&options, &EnglishStrings);

        assert_eq!(entries.len(), 11);
        assert_eq!(entries[0].label, "In Progress Episodes & Movies");
        assert_eq!(entries[6].label, "TMDb - Popular");
        assert_eq!(entries[8].action, WidgetAction::ExtendedTrending);
        assert_eq!(entries[8].label, "Trakt - Trending");
    }

    #[test]
    fn test_playlist_picker_selects_movie_playlist_first() {
        let entries = playlist_entries(vec!["Rock & Roll".to_string()], &WidgetOptions::default());

        assert_eq!(entries[0].action, WidgetAction::PlaylistsListing);
        assert_eq!(entries[0].params.movie_label.as_deref(), Some("Rock & Roll"));
        assert_eq!(entries[0].params.tag, None);
        assert_eq!(entries[0].icon, "DefaultMovies.png");
    }

    #[test]
    fn test_reference_picker_targets_refplaylist() {
        let picking_movies = WidgetOptions {
            tag: Some("ref".to_string()),
            ..WidgetOptions::default()
        };
        let entries = playlist_entries(vec!["Noir".to_string()], &picking_movies);
        assert_eq!(entries[0].action, WidgetAction::PlaylistsListing);
        assert_eq!(entries[0].params.tag.as_deref(), Some("ref"));

        let picking_shows = WidgetOptions {
            movie_label: Some("Noir".to_string()),
            ..picking_movies
        };
        let entries = playlist_entries(vec!["Crime TV".to_string()], &picking_shows);
        assert_eq!(entries[0].action, WidgetAction::RefPlaylist);
        assert_eq!(entries[0].params.movie_label.as_deref(), Some("Noir"));
        assert_eq!(entries[0].params.tv_label.as_deref(), Some("Crime TV"));
        assert_eq!(entries[0].icon, "DefaultTvShows.png");
    }

    #[test]
    fn test_shared_genres_keep_movie_order() {
        let movies = vec!["Drama".to_string(), "Action".to_string(), "Horror".to_string()];
        let shows = vec!["Horror".to_string(), "Drama".to_string()];
        assert_eq!(shared_genres(&movies, &shows), vec!["Drama", "Horror"]);
    }

    #[test]
    fn test_genre_entry_art() {
        let mut first = movie("A");
        first.info.art.insert("poster".to_string(), "a-poster.jpg".to_string());
        first.info.art.insert("fanart".to_string(), "a-fanart.jpg".to_string());
        let mut second = movie("B");
        second.info.art.insert("fanart".to_string(), "b-fanart.jpg".to_string());

        let entry = genre_entry("Drama", &[first, second]);
        assert_eq!(entry.thumbnail, "DefaultGenre.png");
        assert!(entry.is_folder);
        assert_eq!(entry.art["fanart"], "a-fanart.jpg");
        assert_eq!(entry.art["poster.0"], "a-poster.jpg");
        assert_eq!(entry.art["poster.1"], "");
        assert_eq!(entry.art["fanart.1"], "b-fanart.jpg");
    }

    #[test]
    fn test_genre_entry_without_items() {
        let entry = genre_entry("Western", &[]);
        assert!(entry.art.is_empty());
        assert_eq!(entry.label, "Western");
    }
}
