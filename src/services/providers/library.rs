/// Library-backed widget provider
///
/// Serves the kind-specific lists of one library section straight from a
/// [`MediaLibrary`]. Every list is a single filtered/sorted/limited query,
/// except `similar`, `top250` and the extended lists which post-process the
/// query result locally.
use std::{collections::HashMap, sync::Arc};

use crate::{
    db::{ExtendedList, Filter, LibraryQuery, MediaLibrary, Sort},
    error::AppResult,
    models::{MediaItem, MediaType, WidgetOptions},
    services::{
        providers::{KindWidgets, RecordingsSource},
        similarity,
    },
};

#[derive(Clone)]
pub struct LibraryWidgets {
    media_type: MediaType,
    library: Arc<dyn MediaLibrary>,
}

impl LibraryWidgets {
    pub fn new(media_type: MediaType, library: Arc<dyn MediaLibrary>) -> Self {
        Self {
            media_type,
            library,
        }
    }

    fn is_video(&self) -> bool {
        matches!(self.media_type, MediaType::Movie | MediaType::TvShow)
    }

    fn is_music(&self) -> bool {
        matches!(self.media_type, MediaType::Album | MediaType::Song)
    }

    async fn query(&self, query: LibraryQuery) -> AppResult<Vec<MediaItem>> {
        self.library.items(self.media_type, &query).await
    }

    /// Most recently played item of this section
    async fn last_played(&self) -> AppResult<Option<MediaItem>> {
        let query = LibraryQuery::new()
            .filter(Filter::Watched)
            .sort(Sort::LastPlayed)
            .limit(1);
        Ok(self.query(query).await?.into_iter().next())
    }

    /// Movies or shows scored against the last played one
    async fn similar_video(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let Some(reference) = self.last_played().await? else {
            return Ok(Vec::new());
        };

        let mut query = LibraryQuery::new().tagged(options.tag());
        if options.hide_watched_similar {
            query = query.filter(Filter::Unwatched);
        }
        let candidates = self.query(query).await?;

        let mut scored: Vec<MediaItem> = candidates
            .into_iter()
            .filter_map(|mut item| {
                let score = similarity::score_against(&reference, &item);
                if score <= 0.0 {
                    return None;
                }
                item.similar_score = Some(score);
                item.extra_properties
                    .insert("similartitle".to_string(), reference.title().to_string());
                Some(item)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similar_score
                .unwrap_or(0.0)
                .total_cmp(&a.similar_score.unwrap_or(0.0))
        });
        scored.truncate(options.limit);

        tracing::debug!(
            media_type = %self.media_type,
            reference = %reference.title(),
            count = scored.len(),
            "Scored similar items"
        );

        Ok(scored)
    }

    /// Random items sharing the first genre of the last played one
    async fn similar_music(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let Some(reference) = self.last_played().await? else {
            return Ok(Vec::new());
        };
        let Some(genre) = reference.genres().first().cloned() else {
            return Ok(Vec::new());
        };

        let query = LibraryQuery::new()
            .filter(Filter::Genre(genre))
            .tagged(options.tag())
            .sort(Sort::Random);
        let mut items: Vec<MediaItem> = self
            .query(query)
            .await?
            .into_iter()
            .filter(|item| item.title() != reference.title())
            .collect();
        items.truncate(options.limit);
        Ok(items)
    }
}

#[async_trait::async_trait]
impl KindWidgets for LibraryWidgets {
    async fn recent(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let query = LibraryQuery::new()
            .tagged(options.tag())
            .sort(Sort::DateAdded)
            .limit(options.limit);
        self.query(query).await
    }

    async fn random(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let query = LibraryQuery::new()
            .tagged(options.tag())
            .sort(Sort::Random)
            .limit(options.limit);
        self.query(query).await
    }

    async fn inprogress(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        if self.is_music() {
            return Ok(Vec::new());
        }
        let query = LibraryQuery::new()
            .filter(Filter::InProgress)
            .tagged(options.tag())
            .sort(Sort::LastPlayed)
            .limit(options.limit);
        self.query(query).await
    }

    async fn recommended(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let mut query = LibraryQuery::new().tagged(options.tag());
        if !self.is_music() {
            query = query.filter(Filter::Unwatched);
        }
        self.query(query.sort(Sort::Rating).limit(options.limit))
            .await
    }

    async fn similar(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        if self.is_video() {
            self.similar_video(options).await
        } else if self.is_music() {
            self.similar_music(options).await
        } else {
            Ok(Vec::new())
        }
    }

    async fn top250(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        if !self.is_video() {
            return Ok(Vec::new());
        }
        let mut ranked: Vec<MediaItem> = self
            .query(LibraryQuery::new().tagged(options.tag()))
            .await?
            .into_iter()
            .filter(|item| item.top250_rank().is_some())
            .collect();
        ranked.sort_by_key(|item| item.info.top250);
        ranked.truncate(options.limit);
        Ok(ranked)
    }

    async fn extended(
        &self,
        list: ExtendedList,
        options: &WidgetOptions,
    ) -> AppResult<Vec<MediaItem>> {
        if !self.is_video() {
            return Ok(Vec::new());
        }

        let ranking = self.library.extended_ranking(self.media_type, list).await?;
        if ranking.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_title: HashMap<String, MediaItem> = HashMap::new();
        for item in self.query(LibraryQuery::new().tagged(options.tag())).await? {
            by_title.entry(item.info.title.clone()).or_insert(item);
        }

        let matched: Vec<MediaItem> = ranking
            .iter()
            .enumerate()
            .filter_map(|(rank, title)| {
                by_title.remove(title).map(|mut item| {
                    item.info.extended_index = Some(rank as u32 + 1);
                    item
                })
            })
            .take(options.limit)
            .collect();

        tracing::debug!(
            media_type = %self.media_type,
            list = ?list,
            ranked = ranking.len(),
            matched = matched.len(),
            "Matched extended ranking against library"
        );

        Ok(matched)
    }

    async fn nextshows(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        if self.media_type != MediaType::TvShow {
            return Ok(Vec::new());
        }
        let query = LibraryQuery::new()
            .filter(Filter::InProgress)
            .tagged(options.tag())
            .sort(Sort::LastPlayed)
            .limit(options.limit);
        self.query(query).await
    }

    async fn genre_items(&self, genre: &str, limit: usize) -> AppResult<Vec<MediaItem>> {
        let query = LibraryQuery::new()
            .filter(Filter::Genre(genre.to_string()))
            .sort(Sort::Random)
            .limit(limit);
        self.query(query).await
    }
}

#[async_trait::async_trait]
impl RecordingsSource for LibraryWidgets {
    async fn recordings(&self, options: &WidgetOptions) -> AppResult<Vec<MediaItem>> {
        let query = LibraryQuery::new()
            .sort(Sort::DateAdded)
            .limit(options.limit);
        self.library.items(MediaType::Recording, &query).await
    }
}
