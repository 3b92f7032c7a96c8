/// Kodi JSON-RPC library backend
///
/// Translates [`LibraryQuery`] values into Kodi's JSON filter syntax and
/// converts the returned records into [`MediaItem`]s.
///
/// API Flow:
/// 1. Library sections: `VideoLibrary.GetMovies` / `GetTVShows` / `GetEpisodes`,
///    `AudioLibrary.GetAlbums` / `GetSongs`, `PVR.GetRecordings`
/// 2. Genres: `VideoLibrary.GetGenres` / `AudioLibrary.GetGenres`
/// 3. Playlists: `Files.GetDirectory` on `special://videoplaylists/`
use reqwest::Client as HttpClient;
use serde_json::{json, Value};

use crate::{
    db::{Filter, LibraryQuery, MediaLibrary, Sort},
    error::{AppError, AppResult},
    models::{MediaItem, MediaType},
};

const MOVIE_PROPERTIES: &[&str] = &[
    "title", "year", "rating", "genre", "cast", "director", "writer", "mpaa", "top250",
    "dateadded", "lastplayed", "playcount", "file", "art", "uniqueid", "tag", "resume",
];
const TVSHOW_PROPERTIES: &[&str] = &[
    "title", "year", "rating", "genre", "cast", "mpaa", "dateadded", "lastplayed",
    "playcount", "file", "art", "tag", "episode", "watchedepisodes",
];
const EPISODE_PROPERTIES: &[&str] = &[
    "title", "showtitle", "tvshowid", "season", "episode", "rating", "dateadded",
    "lastplayed", "playcount", "file", "art", "resume",
];
const ALBUM_PROPERTIES: &[&str] = &[
    "title", "year", "rating", "genre", "artist", "dateadded", "lastplayed", "playcount", "art",
];
const SONG_PROPERTIES: &[&str] = &[
    "title", "year", "rating", "genre", "artist", "album", "albumid", "dateadded",
    "lastplayed", "playcount", "file", "art",
];
const RECORDING_PROPERTIES: &[&str] = &[
    "title", "channel", "file", "art", "resume", "playcount", "starttime",
];

/// JSON-RPC method, result field and properties for one library section
struct Section {
    method: &'static str,
    result_key: &'static str,
    properties: &'static [&'static str],
}

fn section(media_type: MediaType) -> Section {
    match media_type {
        MediaType::Movie => Section {
            method: "VideoLibrary.GetMovies",
            result_key: "movies",
            properties: MOVIE_PROPERTIES,
        },
        MediaType::TvShow => Section {
            method: "VideoLibrary.GetTVShows",
            result_key: "tvshows",
            properties: TVSHOW_PROPERTIES,
        },
        MediaType::Episode => Section {
            method: "VideoLibrary.GetEpisodes",
            result_key: "episodes",
            properties: EPISODE_PROPERTIES,
        },
        MediaType::Album => Section {
            method: "AudioLibrary.GetAlbums",
            result_key: "albums",
            properties: ALBUM_PROPERTIES,
        },
        MediaType::Song => Section {
            method: "AudioLibrary.GetSongs",
            result_key: "songs",
            properties: SONG_PROPERTIES,
        },
        MediaType::Recording => Section {
            method: "PVR.GetRecordings",
            result_key: "recordings",
            properties: RECORDING_PROPERTIES,
        },
    }
}

fn rule(field: &str, operator: &str, value: &str) -> Value {
    json!({ "field": field, "operator": operator, "value": value })
}

/// Kodi filter object for one filter
pub fn filter_json(filter: &Filter) -> Value {
    match filter {
        Filter::Watched => rule("playcount", "greaterthan", "0"),
        Filter::Unwatched => rule("playcount", "lessthan", "1"),
        Filter::InProgress => rule("inprogress", "true", ""),
        Filter::NotInProgress => rule("inprogress", "false", ""),
        Filter::Tag(tag) => rule("tag", "contains", tag),
        Filter::InPlaylist(label) => rule("playlist", "is", label),
        Filter::NotInPlaylist(label) => rule("playlist", "isnot", label),
        Filter::Title(title) => rule("title", "is", title),
        Filter::Genre(genre) => rule("genre", "is", genre),
        Filter::Any(filters) => json!({ "or": filters.iter().map(filter_json).collect::<Vec<_>>() }),
    }
}

/// Kodi sort object for one sort order
pub fn sort_json(sort: Sort) -> Value {
    match sort {
        Sort::LastPlayed => json!({ "method": "lastplayed", "order": "descending" }),
        Sort::DateAdded => json!({ "method": "dateadded", "order": "descending" }),
        Sort::Rating => json!({ "method": "rating", "order": "descending" }),
        Sort::Year => json!({ "method": "year", "order": "descending" }),
        Sort::Title => json!({ "method": "title", "order": "ascending", "ignorearticle": true }),
        Sort::Random => json!({ "method": "random" }),
    }
}

/// Request parameters for a section query
pub fn query_params(media_type: MediaType, query: &LibraryQuery) -> Value {
    let section = section(media_type);
    let mut params = json!({ "properties": section.properties });

    if let Some(limit) = query.limit {
        params["limits"] = json!({ "start": 0, "end": limit });
    }

    // PVR recordings accept neither filters nor sorting
    if media_type == MediaType::Recording {
        return params;
    }

    match query.filters.as_slice() {
        [] => {}
        [single] => params["filter"] = filter_json(single),
        many => {
            params["filter"] = json!({ "and": many.iter().map(filter_json).collect::<Vec<_>>() })
        }
    }

    if let Some(sort) = query.sort {
        params["sort"] = sort_json(sort);
    }

    params
}

#[derive(Clone)]
pub struct KodiLibrary {
    http_client: HttpClient,
    url: String,
    credentials: Option<(String, Option<String>)>,
}

impl KodiLibrary {
    /// Creates a client for the JSON-RPC endpoint at `url`
    pub fn new(url: String, username: Option<String>, password: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            url,
            credentials: username.map(|username| (username, password)),
        }
    }

    /// Sends one JSON-RPC call and returns its `result`
    async fn call(&self, method: &str, params: Value) -> AppResult<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });

        tracing::debug!(method = %method, "Calling Kodi JSON-RPC");

        let mut request = self.http_client.post(&self.url).json(&body);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, password.as_ref());
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                method = %method,
                status = %status,
                body = %body,
                "Kodi JSON-RPC request failed"
            );
            return Err(AppError::DataSource(format!(
                "Kodi returned status {}: {}",
                status, body
            )));
        }

        let payload: Value = response.json().await?;
        extract_result(method, payload)
    }
}

/// Pulls `result` out of a JSON-RPC response, turning `error` into a data source error
pub fn extract_result(method: &str, mut payload: Value) -> AppResult<Value> {
    if let Some(error) = payload.get("error") {
        let message = error["message"].as_str().unwrap_or("unknown error");
        return Err(AppError::DataSource(format!("{} failed: {}", method, message)));
    }
    Ok(payload
        .get_mut("result")
        .map(Value::take)
        .unwrap_or(Value::Null))
}

/// Converts the records under `result_key`; a missing key means no records
pub fn parse_records(media_type: MediaType, result_key: &str, mut result: Value) -> AppResult<Vec<MediaItem>> {
    let records = match result.get_mut(result_key).map(Value::take) {
        Some(Value::Array(records)) => records,
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(other) => {
            return Err(AppError::DataSource(format!(
                "Unexpected {} payload: {}",
                result_key, other
            )))
        }
    };

    records
        .into_iter()
        .map(|mut record| {
            // recordings carry their start time instead of a date added
            if media_type == MediaType::Recording && record.get("dateadded").is_none() {
                if let Some(start) = record.get("starttime").cloned() {
                    record["dateadded"] = start;
                }
            }
            MediaItem::from_library(media_type, record)
        })
        .collect()
}

/// Labels under `result_key`, each entry being an object with a `label`
fn parse_labels(result: &Value, result_key: &str) -> Vec<String> {
    result[result_key]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry["label"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl MediaLibrary for KodiLibrary {
    async fn items(&self, media_type: MediaType, query: &LibraryQuery) -> AppResult<Vec<MediaItem>> {
        let section = section(media_type);
        if media_type == MediaType::Recording && !query.filters.is_empty() {
            tracing::debug!(
                filters = query.filters.len(),
                "Ignoring filters on PVR recordings"
            );
        }

        let result = self.call(section.method, query_params(media_type, query)).await?;
        let items = parse_records(media_type, section.result_key, result)?;

        tracing::debug!(
            media_type = %media_type,
            count = items.len(),
            "Fetched library items from Kodi"
        );

        Ok(items)
    }

    async fn genres(&self, media_type: MediaType) -> AppResult<Vec<String>> {
        let result = match media_type {
            MediaType::Album | MediaType::Song => {
                self.call("AudioLibrary.GetGenres", json!({})).await?
            }
            MediaType::Movie | MediaType::TvShow | MediaType::Episode => {
                let kind = if media_type == MediaType::Movie {
                    "movie"
                } else {
                    "tvshow"
                };
                self.call("VideoLibrary.GetGenres", json!({ "type": kind }))
                    .await?
            }
            MediaType::Recording => return Ok(Vec::new()),
        };

        Ok(parse_labels(&result, "genres"))
    }

    async fn playlists(&self) -> AppResult<Vec<String>> {
        let result = self
            .call(
                "Files.GetDirectory",
                json!({ "directory": "special://videoplaylists/", "media": "video" }),
            )
            .await?;

        Ok(parse_labels(&result, "files"))
    }

    fn name(&self) -> &'static str {
        "kodi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_filter_is_not_wrapped() {
        let query = LibraryQuery::new().filter(Filter::Watched).limit(10);
        let params = query_params(MediaType::Movie, &query);

        assert_eq!(
            params["filter"],
            json!({"field": "playcount", "operator": "greaterthan", "value": "0"})
        );
        assert_eq!(params["limits"], json!({"start": 0, "end": 10}));
        assert!(params.get("sort").is_none());
    }

    #[test]
    fn test_multiple_filters_are_combined_with_and() {
        let query = LibraryQuery::new()
            .filter(Filter::Any(vec![Filter::Watched, Filter::InProgress]))
            .filter(Filter::Tag("Kids".to_string()))
            .sort(Sort::LastPlayed);
        let params = query_params(MediaType::TvShow, &query);

        assert_eq!(
            params["filter"],
            json!({"and": [
                {"or": [
                    {"field": "playcount", "operator": "greaterthan", "value": "0"},
                    {"field": "inprogress", "operator": "true", "value": ""}
                ]},
                {"field": "tag", "operator": "contains", "value": "Kids"}
            ]})
        );
        assert_eq!(
            params["sort"],
            json!({"method": "lastplayed", "order": "descending"})
        );
    }

    #[test]
    fn test_playlist_labels_are_passed_verbatim() {
        let filter = filter_json(&Filter::NotInPlaylist("Rock & Roll".to_string()));
        assert_eq!(filter["value"], "Rock & Roll");
        assert_eq!(filter["operator"], "isnot");
    }

    #[test]
    fn test_recordings_skip_filter_and_sort() {
        let query = LibraryQuery::new()
            .filter(Filter::Unwatched)
            .sort(Sort::DateAdded)
            .limit(5);
        let params = query_params(MediaType::Recording, &query);
        assert!(params.get("filter").is_none());
        assert!(params.get("sort").is_none());
        assert_eq!(params["limits"]["end"], 5);
    }

    #[test]
    fn test_extract_result_reports_rpc_error() {
        let payload = json!({"id": 1, "jsonrpc": "2.0", "error": {"code": -32602, "message": "Invalid params."}});
        let result = extract_result("VideoLibrary.GetMovies", payload);
        match result {
            Err(AppError::DataSource(message)) => assert!(message.contains("Invalid params.")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_records_movies() {
        let result = json!({
            "limits": {"start": 0, "end": 1, "total": 1},
            "movies": [{"movieid": 3, "label": "Alien", "title": "Alien", "year": 1979, "genre": ["Horror"], "uniqueid": {"imdb": "tt0078748"}}]
        });
        let items = parse_records(MediaType::Movie, "movies", result).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].movie_id(), Some(3));
        assert_eq!(items[0].year(), Some(1979));
    }

    #[test]
    fn test_parse_records_missing_key_is_empty() {
        let result = json!({"limits": {"start": 0, "end": 0, "total": 0}});
        let items = parse_records(MediaType::TvShow, "tvshows", result).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_recordings_use_start_time() {
        let result = json!({
            "recordings": [{"recordingid": 1, "title": "News", "channel": "BBC One", "starttime": "2024-03-01 18:00:00"}]
        });
        let items = parse_records(MediaType::Recording, "recordings", result).unwrap();
        assert_eq!(items[0].info.dateadded, "2024-03-01 18:00:00");
    }

    #[test]
    fn test_parse_labels() {
        let result = json!({"genres": [{"genreid": 1, "label": "Drama"}, {"genreid": 2, "label": "Comedy"}]});
        assert_eq!(parse_labels(&result, "genres"), vec!["Drama", "Comedy"]);
        assert!(parse_labels(&json!({}), "files").is_empty());
    }
}
