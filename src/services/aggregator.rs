/// Mixed-media widget aggregator
///
/// Fans each widget action out to the per-kind providers (or straight to the
/// library), merges the results in a fixed source order and ranks them: by
/// date, by rank, randomly, or through the similarity scorer and the
/// recommendation weighter.
use std::{collections::HashMap, sync::Arc};

use tracing::instrument;

use crate::{
    db::{ExtendedList, Filter, LibraryQuery, MediaLibrary, Sort},
    error::{AppError, AppResult},
    models::{
        GenreEntry, MediaItem, MediaType, MenuEntry, PlaylistSort, WidgetAction,
        WidgetOptions, WidgetRequest, WidgetResponse,
    },
    services::{
        localization::{EnglishStrings, Localizer},
        menu,
        providers::{KindWidgets, LibraryWidgets, RecordingsSource},
        random::{self, RandomSource},
        recommendations::{self, ReferenceSet},
        similarity,
    },
};

/// Collaborators of a [`MediaAggregator`]
pub struct AggregatorParts {
    pub library: Arc<dyn MediaLibrary>,
    pub movies: Arc<dyn KindWidgets>,
    pub tvshows: Arc<dyn KindWidgets>,
    pub songs: Arc<dyn KindWidgets>,
    pub albums: Arc<dyn KindWidgets>,
    pub episodes: Arc<dyn KindWidgets>,
    pub pvr: Arc<dyn RecordingsSource>,
    pub random: Arc<dyn RandomSource>,
    pub localizer: Arc<dyn Localizer>,
}

pub struct MediaAggregator {
    library: Arc<dyn MediaLibrary>,
    movies: Arc<dyn KindWidgets>,
    tvshows: Arc<dyn KindWidgets>,
    songs: Arc<dyn KindWidgets>,
    albums: Arc<dyn KindWidgets>,
    episodes: Arc<dyn KindWidgets>,
    pvr: Arc<dyn RecordingsSource>,
    random: Arc<dyn RandomSource>,
    localizer: Arc<dyn Localizer>,
}

fn concat<const N: usize>(lists: [Vec<MediaItem>; N]) -> Vec<MediaItem> {
    lists.into_iter().flatten().collect()
}

fn newest_added(mut items: Vec<MediaItem>, limit: usize) -> Vec<MediaItem> {
    items.sort_by(|a, b| b.info.dateadded.cmp(&a.info.dateadded));
    items.truncate(limit);
    items
}

fn last_played_first(mut items: Vec<MediaItem>, limit: usize) -> Vec<MediaItem> {
    items.sort_by(|a, b| b.info.lastplayed.cmp(&a.info.lastplayed));
    items.truncate(limit);
    items
}

/// Appends `extra` items whose key is not already present
fn append_missing<K, F>(mut items: Vec<MediaItem>, extra: Vec<MediaItem>, key: F, limit: usize) -> Vec<MediaItem>
where
    K: PartialEq,
    F: Fn(&MediaItem) -> Option<K>,
{
    let seen: Vec<K> = items.iter().filter_map(&key).collect();
    items.extend(
        extra
            .into_iter()
            .filter(|item| key(item).map_or(true, |k| !seen.contains(&k))),
    );
    items.truncate(limit);
    items
}

impl MediaAggregator {
    /// Aggregator with library-backed providers for every kind
    pub fn new(library: Arc<dyn MediaLibrary>, random: Arc<dyn RandomSource>) -> Self {
        let widgets =
            |media_type| Arc::new(LibraryWidgets::new(media_type, library.clone())) as Arc<dyn KindWidgets>;

        Self::from_parts(AggregatorParts {
            movies: widgets(MediaType::Movie),
            tvshows: widgets(MediaType::TvShow),
            songs: widgets(MediaType::Song),
            albums: widgets(MediaType::Album),
            episodes: widgets(MediaType::Episode),
            pvr: Arc::new(LibraryWidgets::new(MediaType::Recording, library.clone())),
            library,
            random,
            localizer: Arc::new(EnglishStrings),
        })
    }

    pub fn from_parts(parts: AggregatorParts) -> Self {
        Self {
            library: parts.library,
            movies: parts.movies,
            tvshows: parts.tvshows,
            songs: parts.songs,
            albums: parts.albums,
            episodes: parts.episodes,
            pvr: parts.pvr,
            random: parts.random,
            localizer: parts.localizer,
        }
    }

    /// Runs one widget action
    ///
    /// Library failures are logged and answered with an empty widget; invalid
    /// requests are returned as errors.
    #[instrument(skip(self, request), fields(action = %request.action))]
    pub async fn handle(&self, request: &WidgetRequest) -> AppResult<WidgetResponse> {
        match self.dispatch(request.action, &request.options).await {
            Ok(response) => {
                tracing::debug!(count = response.len(), "Widget action completed");
                Ok(response)
            }
            Err(e) if e.is_data_source() => {
                tracing::error!(error = %e, "Widget action failed, returning empty listing");
                Ok(WidgetResponse::empty_for(request.action))
            }
            Err(e) => Err(e),
        }
    }

    async fn dispatch(&self, action: WidgetAction, options: &WidgetOptions) -> AppResult<WidgetResponse> {
        let items = match action {
            WidgetAction::Listing => return Ok(WidgetResponse::Entries(self.listing(options))),
            WidgetAction::PlaylistsListing => {
                return Ok(WidgetResponse::Entries(self.playlistslisting(options).await?))
            }
            WidgetAction::BrowseGenres => {
                return Ok(WidgetResponse::Genres(self.browsegenres(options).await?))
            }
            WidgetAction::Playlist => self.playlist(options).await?,
            WidgetAction::RefPlaylist => self.refplaylist(options).await?,
            WidgetAction::Recommended => self.recommended(options).await?,
            WidgetAction::Recent => self.recent(options).await?,
            WidgetAction::RecentShowsAndMovies => self.recentshowsandmovies(options).await?,
            WidgetAction::Random => self.random(options).await?,
            WidgetAction::InProgress => self.inprogress(options).await?,
            WidgetAction::InProgressShowsAndMovies => self.inprogressshowsandmovies(options).await?,
            WidgetAction::InProgressEpisodesAndMovies => {
                self.inprogressepisodesandmovies(options).await?
            }
            WidgetAction::InProgressNextShowsAndMovies => {
                self.inprogressnextshowsandmovies(options).await?
            }
            WidgetAction::InProgressAndRecommended => self.inprogressandrecommended(options).await?,
            WidgetAction::InProgressAndRandom => self.inprogressandrandom(options).await?,
            WidgetAction::WatchAgainShowsAndMovies => self.watchagainshowsandmovies(options).await?,
            WidgetAction::UnwatchedShowsAndMovies => self.unwatchedshowsandmovies(options).await?,
            WidgetAction::NewRelease => self.newrelease(options).await?,
            WidgetAction::RandomTop250 => self.randomtop250(options).await?,
            WidgetAction::TopRated => self.toprated(options).await?,
            WidgetAction::ExtendedPopularTmdb => self.extended(ExtendedList::PopularTmdb, options).await?,
            WidgetAction::ExtendedPopularTrakt => self.extended(ExtendedList::PopularTrakt, options).await?,
            WidgetAction::ExtendedTrending => self.extended(ExtendedList::Trending, options).await?,
            WidgetAction::ExtendedMostPlayed => self.extended(ExtendedList::MostPlayed, options).await?,
            WidgetAction::ExtendedMostWatched => self.extended(ExtendedList::MostWatched, options).await?,
            WidgetAction::Similar => self.similar(options).await?,
            WidgetAction::Top250 => self.top250(options).await?,
        };
        Ok(WidgetResponse::Items(items))
    }

    fn shuffled(&self, items: Vec<MediaItem>, limit: usize) -> Vec<MediaItem> {
        let mut items = random::shuffle(items, self.random.as_ref());
        items.truncate(limit);
        items
    }

    pub fn listing(&self, options: &WidgetOptions) -> Vec<MenuEntry> {
        let mut entries = menu::main_listing(options, self.localizer.as_ref());
        entries.truncate(options.limit);
        entries
    }

    pub async fn playlistslisting(&self, options: &WidgetOptions) -> AppResult<Vec<MenuEntry>> {
        let labels = self.library.playlists().await?;
        let mut entries = menu::playlist_entries(labels, options);
        entries.truncate(options.limit);
        Ok(entries)
    }

    /// Genres shared by movies and TV shows, decorated with random artwork
    ///
    /// Only the first `options.limit` genres are decorated.
    pub async fn browsegenres(&self, options: &WidgetOptions) -> AppResult<Vec<GenreEntry>> {
        let (movie_genres, tvshow_genres) = tokio::try_join!(
            self.library.genres(MediaType::Movie),
            self.library.genres(MediaType::TvShow)
        )?;

        let mut entries = Vec::new();
        for genre in menu::shared_genres(&movie_genres, &tvshow_genres)
            .into_iter()
            .take(options.limit)
        {
            entries.push(self.process_genre(&genre).await?);
        }
        Ok(entries)
    }

    /// Genre entry with artwork from either movies or TV shows, picked by coin flip
    pub async fn process_genre(&self, genre: &str) -> AppResult<GenreEntry> {
        let pool = if self.random.coin_flip() {
            &self.movies
        } else {
            &self.tvshows
        };
        let items = pool.genre_items(genre, menu::GENRE_ART_ITEMS).await?;
        Ok(menu::genre_entry(genre, &items))
    }

    pub async fn recent(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let (movies, albums, songs, episodes, recordings) = tokio::try_join!(
            self.movies.recent(options),
            self.albums.recent(options),
            self.songs.recent(options),
            self.episodes.recent(options),
            self.pvr.recordings(options)
        )?;
        Ok(newest_added(
            concat([movies, albums, songs, episodes, recordings]),
            options.limit,
        ))
    }

    pub async fn recentshowsandmovies(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let (movies, tvshows) =
            tokio::try_join!(self.movies.recent(options), self.tvshows.recent(options))?;
        Ok(newest_added(concat([movies, tvshows]), options.limit))
    }

    pub async fn random(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let (movies, tvshows, albums, songs, episodes, recordings) = tokio::try_join!(
            self.movies.random(options),
            self.tvshows.random(options),
            self.albums.random(options),
            self.songs.random(options),
            self.episodes.random(options),
            self.pvr.recordings(options)
        )?;
        Ok(self.shuffled(
            concat([movies, tvshows, albums, songs, episodes, recordings]),
            options.limit,
        ))
    }

    pub async fn inprogress(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let (movies, episodes, recordings) = tokio::try_join!(
            self.movies.inprogress(options),
            self.episodes.inprogress(options),
            self.pvr.recordings(options)
        )?;
        Ok(last_played_first(
            concat([movies, episodes, recordings]),
            options.limit,
        ))
    }

    pub async fn inprogressshowsandmovies(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        self.inprogressepisodesandmovies(options).await
    }

    pub async fn inprogressepisodesandmovies(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let (movies, episodes) = tokio::try_join!(
            self.movies.inprogress(options),
            self.episodes.inprogress(options)
        )?;
        Ok(last_played_first(concat([movies, episodes]), options.limit))
    }

    pub async fn inprogressnextshowsandmovies(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let (movies, tvshows) = tokio::try_join!(
            self.movies.inprogress(options),
            self.tvshows.nextshows(options)
        )?;
        Ok(last_played_first(concat([movies, tvshows]), options.limit))
    }

    pub async fn top250(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let (movies, tvshows) =
            tokio::try_join!(self.movies.top250(options), self.tvshows.top250(options))?;
        let mut items = concat([movies, tvshows]);
        items.sort_by_key(|item| item.info.top250);
        items.truncate(options.limit);
        Ok(items)
    }

    pub async fn randomtop250(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let (movies, tvshows) =
            tokio::try_join!(self.movies.top250(options), self.tvshows.top250(options))?;
        Ok(self.shuffled(concat([movies, tvshows]), options.limit))
    }

    pub async fn extended(&self, list: ExtendedList, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let (movies, tvshows) = tokio::try_join!(
            self.movies.extended(list, options),
            self.tvshows.extended(list, options)
        )?;
        let mut items = concat([movies, tvshows]);
        items.sort_by_key(|item| item.info.extended_index.unwrap_or(u32::MAX));
        items.truncate(options.limit);
        Ok(items)
    }

    pub async fn inprogressandrecommended(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let inprogress = self.inprogress(options).await?;
        let recommended = self.recommended(options).await?;
        Ok(append_missing(
            inprogress,
            recommended,
            |item| Some(item.info.title.clone()),
            options.limit,
        ))
    }

    pub async fn inprogressandrandom(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let inprogress = self.inprogress(options).await?;
        let random = self.random(options).await?;
        Ok(append_missing(inprogress, random, MediaItem::movie_id, options.limit))
    }

    /// Recently watched movies and watched or started shows, shuffled
    pub async fn watchagainshowsandmovies(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let movies = LibraryQuery::new()
            .filter(Filter::Watched)
            .tagged(options.tag())
            .sort(Sort::LastPlayed)
            .limit(options.limit);
        let tvshows = LibraryQuery::new()
            .filter(Filter::Any(vec![Filter::Watched, Filter::InProgress]))
            .tagged(options.tag())
            .sort(Sort::LastPlayed)
            .limit(options.limit);

        let (movies, tvshows) = tokio::try_join!(
            self.library.items(MediaType::Movie, &movies),
            self.library.items(MediaType::TvShow, &tvshows)
        )?;
        Ok(self.shuffled(concat([movies, tvshows]), options.limit))
    }

    async fn unwatched_shows_and_movies(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let query = LibraryQuery::new()
            .filter(Filter::Unwatched)
            .tagged(options.tag());
        let (movies, tvshows) = tokio::try_join!(
            self.library.items(MediaType::Movie, &query),
            self.library.items(MediaType::TvShow, &query)
        )?;
        Ok(concat([movies, tvshows]))
    }

    pub async fn unwatchedshowsandmovies(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let items = self.unwatched_shows_and_movies(options).await?;
        Ok(self.shuffled(items, options.limit))
    }

    /// Unwatched movies and shows, newest release first
    pub async fn newrelease(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let mut items = self.unwatched_shows_and_movies(options).await?;
        items.sort_by(|a, b| {
            b.year()
                .cmp(&a.year())
                .then_with(|| b.info.dateadded.cmp(&a.info.dateadded))
        });
        items.truncate(options.limit);
        Ok(items)
    }

    pub async fn toprated(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let candidates = self.items_for_recommended(options).await?;
        self.sort_by_recommended(candidates, None, options).await
    }

    /// Unwatched movies plus unwatched shows not yet started, both tag filtered
    pub async fn items_for_recommended(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let movies = LibraryQuery::new()
            .filter(Filter::Unwatched)
            .tagged(options.tag());
        let tvshows = movies.clone().filter(Filter::NotInProgress);

        let (movies, tvshows) = tokio::try_join!(
            self.library.items(MediaType::Movie, &movies),
            self.library.items(MediaType::TvShow, &tvshows)
        )?;
        Ok(concat([movies, tvshows]))
    }

    pub async fn recommended(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        if options.exp_recommended {
            let query = LibraryQuery::new().filter(Filter::Unwatched);
            let (movies, tvshows) = tokio::try_join!(
                self.library.items(MediaType::Movie, &query),
                self.library.items(MediaType::TvShow, &query)
            )?;
            return self
                .sort_by_recommended(concat([movies, tvshows]), None, options)
                .await;
        }

        let (movies, tvshows, albums, songs, episodes) = tokio::try_join!(
            self.movies.recommended(options),
            self.tvshows.recommended(options),
            self.albums.recommended(options),
            self.songs.recommended(options),
            self.episodes.recommended(options)
        )?;
        Ok(self.shuffled(
            concat([movies, tvshows, albums, songs, episodes]),
            options.limit,
        ))
    }

    pub async fn similar(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        if !options.exp_recommended {
            let (movies, tvshows, albums, songs) = tokio::try_join!(
                self.movies.similar(options),
                self.tvshows.similar(options),
                self.albums.similar(options),
                self.songs.similar(options)
            )?;
            return Ok(self.shuffled(concat([movies, tvshows, albums, songs]), options.limit));
        }

        let Some(reference) = self.recently_watched_item(options).await? else {
            tracing::debug!("No recently watched item to compare against");
            return Ok(Vec::new());
        };

        let mut query = LibraryQuery::new();
        if options.hide_watched_similar {
            query = query.filter(Filter::Unwatched);
        }
        let (movies, tvshows) = tokio::try_join!(
            self.library.items(MediaType::Movie, &query),
            self.library.items(MediaType::TvShow, &query)
        )?;

        let mut items: Vec<MediaItem> = concat([movies, tvshows])
            .into_iter()
            .map(|mut item| {
                item.similar_score = Some(similarity::score_against(&reference, &item));
                item.extra_properties
                    .insert("similartitle".to_string(), reference.info.title.clone());
                item.extra_properties
                    .insert("originalpath".to_string(), item.info.file.clone());
                item
            })
            .collect();

        items.sort_by(|a, b| {
            b.similar_score
                .unwrap_or(0.0)
                .total_cmp(&a.similar_score.unwrap_or(0.0))
        });
        items.truncate(options.limit);
        Ok(items)
    }

    /// Ranks candidates by weighted similarity to the references
    ///
    /// Without references (or with an empty set) the references are built
    /// from recent play history.
    pub async fn sort_by_recommended(
        &self,
        candidates: Vec<MediaItem>,
        references: Option<ReferenceSet>,
        options: &WidgetOptions,
    ) -> AppResult<Vec<MediaItem>> {
        let references = match references {
            Some(references) if !references.is_empty() => references,
            _ => self.history_references(options).await?,
        };

        tracing::debug!(
            candidates = candidates.len(),
            references = references.len(),
            total_weight = references.total_weight(),
            "Ranking recommendation candidates"
        );

        Ok(recommendations::rank_candidates(
            candidates,
            &references,
            options.limit,
        ))
    }

    /// Reference set built from recently watched movies and shows
    async fn history_references(&self, options: &WidgetOptions) -> AppResult<ReferenceSet> {
        let target = options.num_recent_similar;
        let (movies, episodes) = self.watched_history(2 * target).await?;
        let tvshows = self.tvshows_from_episodes(episodes).await?;

        let history = last_played_first(concat([movies, tvshows]), usize::MAX);
        Ok(ReferenceSet::from_history(history, target))
    }

    /// Watched movies and watched episodes, each most recently played first
    async fn watched_history(&self, limit: usize) -> AppResult<(Vec<MediaItem>, Vec<MediaItem>)> {
        let query = LibraryQuery::new()
            .filter(Filter::Watched)
            .sort(Sort::LastPlayed)
            .limit(limit);
        tokio::try_join!(
            self.library.items(MediaType::Movie, &query),
            self.library.items(MediaType::Episode, &query)
        )
    }

    /// Parent show of an episode, looked up by title
    async fn parent_show(&self, episode: &MediaItem) -> AppResult<Option<MediaItem>> {
        let Some(show_title) = episode.show_title() else {
            return Ok(None);
        };
        let query = LibraryQuery::new()
            .filter(Filter::Title(show_title.to_string()))
            .limit(1);
        Ok(self
            .library
            .items(MediaType::TvShow, &query)
            .await?
            .into_iter()
            .next())
    }

    /// Replaces each episode with its parent show, carrying over `lastplayed`
    ///
    /// Episodes whose show is missing from the library are dropped.
    pub async fn tvshows_from_episodes(&self, episodes: Vec<MediaItem>) -> AppResult<Vec<MediaItem>> {
        let mut shows: HashMap<String, Option<MediaItem>> = HashMap::new();
        let mut result = Vec::with_capacity(episodes.len());

        for episode in episodes {
            let show_title = episode.show_title().unwrap_or_default().to_string();
            if !shows.contains_key(&show_title) {
                let show = self.parent_show(&episode).await?;
                shows.insert(show_title.clone(), show);
            }
            if let Some(Some(show)) = shows.get(&show_title) {
                let mut show = show.clone();
                show.info.lastplayed = episode.info.lastplayed.clone();
                result.push(show);
            }
        }

        Ok(result)
    }

    /// A random pick among the most recently watched movies and episodes
    ///
    /// Episodes are replaced by their parent show.
    pub async fn recently_watched_item(&self, options: &WidgetOptions) -> AppResult<Option<MediaItem>> {
        let count = options.num_recent_similar;
        let (movies, episodes) = self.watched_history(count).await?;
        let recent = last_played_first(concat([movies, episodes]), count);

        let Some(index) = self.random.pick(recent.len()) else {
            return Ok(None);
        };
        let Some(item) = recent.into_iter().nth(index) else {
            return Ok(None);
        };

        if item.media_type() != MediaType::Episode {
            return Ok(Some(item));
        }

        let show = self.parent_show(&item).await?;
        if show.is_none() {
            tracing::warn!(
                episode = %item.title(),
                show = item.show_title().unwrap_or_default(),
                "Parent show of recently watched episode not found"
            );
        }
        Ok(show)
    }

    fn playlist_labels(options: &WidgetOptions) -> AppResult<(String, String)> {
        let movie_label = options
            .movie_label
            .clone()
            .ok_or_else(|| AppError::InvalidInput("movie_label is required".to_string()))?;
        let tv_label = options
            .tv_label
            .clone()
            .ok_or_else(|| AppError::InvalidInput("tv_label is required".to_string()))?;
        Ok((movie_label, tv_label))
    }

    /// Movies and shows of the two playlists in the requested order
    pub async fn playlist(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let (movie_label, tv_label) = Self::playlist_labels(options)?;
        let movies = LibraryQuery::new().filter(Filter::InPlaylist(movie_label));
        let tvshows = LibraryQuery::new().filter(Filter::InPlaylist(tv_label));
        let (movies, tvshows) = tokio::try_join!(
            self.library.items(MediaType::Movie, &movies),
            self.library.items(MediaType::TvShow, &tvshows)
        )?;
        let mut items = concat([movies, tvshows]);

        match options.playlist_sort {
            PlaylistSort::Recommended => {
                return self.sort_by_recommended(items, None, options).await
            }
            PlaylistSort::Random => return Ok(self.shuffled(items, options.limit)),
            PlaylistSort::Recent => return Ok(newest_added(items, options.limit)),
            PlaylistSort::Year => items.sort_by(|a, b| b.year().cmp(&a.year())),
            PlaylistSort::Title => items.sort_by(|a, b| a.info.title.cmp(&b.info.title)),
        }
        items.truncate(options.limit);
        Ok(items)
    }

    /// Items outside the two playlists, ranked against the playlists' contents
    pub async fn refplaylist(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let (movie_label, tv_label) = Self::playlist_labels(options)?;
        let in_movies = LibraryQuery::new().filter(Filter::InPlaylist(movie_label.clone()));
        let in_tvshows = LibraryQuery::new().filter(Filter::InPlaylist(tv_label.clone()));
        let out_movies = LibraryQuery::new().filter(Filter::NotInPlaylist(movie_label));
        let out_tvshows = LibraryQuery::new().filter(Filter::NotInPlaylist(tv_label));

        let (ref_movies, ref_tvshows, movies, tvshows) = tokio::try_join!(
            self.library.items(MediaType::Movie, &in_movies),
            self.library.items(MediaType::TvShow, &in_tvshows),
            self.library.items(MediaType::Movie, &out_movies),
            self.library.items(MediaType::TvShow, &out_tvshows)
        )?;

        let references = ReferenceSet::uniform(concat([ref_movies, ref_tvshows]));
        self.sort_by_recommended(concat([movies, tvshows]), Some(references), options)
            .await
    }
}
