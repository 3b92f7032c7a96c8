//! Pairwise similarity between library records
//!
//! Movies and TV shows are compared on genre overlap, cast overlap, rating
//! closeness and release-year closeness. Same-kind pairs use the richer
//! movie or TV-show blend; a movie against a TV show uses the mixed blend,
//! whose maximum is 0.625.

use std::collections::HashSet;

use crate::models::{MediaItem, MediaKind};

/// TV-show genre labels and their movie-genre equivalents
const TV_GENRE_EQUIVALENTS: [(&str, &str); 8] = [
    ("TV Documentaries", "Documentary"),
    ("TV Sci-Fi & Fantasy", "Sci-Fi & Fantasy"),
    ("TV Action & Adventure", "Action & Adventure"),
    ("TV Comedies", "Comedy"),
    ("TV Mysteries", "Mystery"),
    ("TV Westerns", "Westerns"),
    ("TV Dramas", "Drama"),
    ("TV Crime Dramas", "Crime Dramas"),
];

/// Cast members compared by the movie and mixed blends
const CAST_WINDOW: usize = 5;
/// Cast members compared by the TV-show blend
const TVSHOW_CAST_WINDOW: usize = 10;

/// Largest score the mixed blend can produce
pub const MIXED_MAX_SCORE: f64 = 0.625;

/// Maps TV-show genre labels to movie equivalents, deduplicating the result
pub fn convert_tvshow_genres<'a>(genres: impl IntoIterator<Item = &'a String>) -> HashSet<&'a str> {
    genres
        .into_iter()
        .map(|genre| {
            TV_GENRE_EQUIVALENTS
                .iter()
                .find(|(tv, _)| *tv == genre.as_str())
                .map(|(_, movie)| *movie)
                .unwrap_or(genre.as_str())
        })
        .collect()
}

/// |reference ∩ other| / |reference ∪ other|, 0 when the reference set is empty
pub fn overlap_score(reference: &HashSet<&str>, other: &HashSet<&str>) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    let union = reference.union(other).count();
    if union == 0 {
        return 0.0;
    }
    reference.intersection(other).count() as f64 / union as f64
}

/// sqrt(shared billed names / window), with a fixed denominator
pub fn cast_score(reference: &MediaItem, other: &MediaItem, window: usize) -> f64 {
    let reference_cast = top_billed(reference, window);
    let other_cast = top_billed(other, window);
    let shared = reference_cast.intersection(&other_cast).count();
    (shared as f64 / window as f64).sqrt()
}

/// 1 - |Δ|/3 for ratings less than 3 points apart
pub fn rating_score(reference: &MediaItem, other: &MediaItem) -> f64 {
    match (reference.rating(), other.rating()) {
        (Some(a), Some(b)) if (a - b).abs() < 3.0 => 1.0 - (a - b).abs() / 3.0,
        _ => 0.0,
    }
}

/// 1 - |Δ|/10 for release years less than a decade apart
pub fn year_score(reference: &MediaItem, other: &MediaItem) -> f64 {
    match (reference.year(), other.year()) {
        (Some(a), Some(b)) if a.abs_diff(b) < 10 => 1.0 - f64::from(a.abs_diff(b)) / 10.0,
        _ => 0.0,
    }
}

fn mpaa_score(reference: &MediaItem, other: &MediaItem) -> f64 {
    if !reference.mpaa().is_empty() && reference.mpaa() == other.mpaa() {
        1.0
    } else {
        0.0
    }
}

fn top_billed(item: &MediaItem, window: usize) -> HashSet<&str> {
    item.cast()
        .iter()
        .take(window)
        .map(|member| member.name.as_str())
        .collect()
}

fn label_set(labels: &[String]) -> HashSet<&str> {
    labels.iter().map(String::as_str).collect()
}

fn genre_set(item: &MediaItem) -> HashSet<&str> {
    match item.kind {
        MediaKind::TvShow(_) => convert_tvshow_genres(item.genres()),
        _ => label_set(item.genres()),
    }
}

/// Score between a movie and a TV show, in `[0, 0.625]`
///
/// Whichever side is the TV show has its genres mapped to movie equivalents
/// before comparing.
pub fn mixed_score(reference: &MediaItem, other: &MediaItem) -> f64 {
    let genre = overlap_score(&genre_set(reference), &genre_set(other));
    let cast = cast_score(reference, other, CAST_WINDOW);
    let rating = rating_score(reference, other);
    let year = year_score(reference, other);

    0.5 * genre + 0.05 * cast + 0.025 * rating + 0.05 * year
}

/// Score between two movies, in `[0, 1]`
pub fn movie_score(reference: &MediaItem, other: &MediaItem) -> f64 {
    let (reference_movie, other_movie) = match (&reference.kind, &other.kind) {
        (MediaKind::Movie(a), MediaKind::Movie(b)) => (a, b),
        _ => return 0.0,
    };

    let genre = overlap_score(&label_set(reference.genres()), &label_set(other.genres()));
    let director = overlap_score(
        &label_set(&reference_movie.director),
        &label_set(&other_movie.director),
    );
    let writer = overlap_score(
        &label_set(&reference_movie.writer),
        &label_set(&other_movie.writer),
    );
    let cast = cast_score(reference, other, CAST_WINDOW);
    let rating = rating_score(reference, other);
    let year = year_score(reference, other);
    let mpaa = mpaa_score(reference, other);

    0.5 * genre
        + 0.15 * director
        + 0.125 * writer
        + 0.05 * cast
        + 0.025 * rating
        + 0.075 * year
        + 0.075 * mpaa
}

/// Score between two TV shows, in `[0, 1]`
pub fn tvshow_score(reference: &MediaItem, other: &MediaItem) -> f64 {
    let genre = overlap_score(&label_set(reference.genres()), &label_set(other.genres()));
    let cast = cast_score(reference, other, TVSHOW_CAST_WINDOW);
    let rating = rating_score(reference, other);
    let year = year_score(reference, other);
    let mpaa = mpaa_score(reference, other);

    0.65 * genre + 0.15 * cast + 0.025 * rating + 0.075 * year + 0.1 * mpaa
}

/// Picks the blend for the pair from their kinds
///
/// Pairs involving anything other than movies and TV shows score 0.
pub fn score(reference: &MediaItem, other: &MediaItem) -> f64 {
    match (&reference.kind, &other.kind) {
        (MediaKind::Movie(_), MediaKind::Movie(_)) => movie_score(reference, other),
        (MediaKind::TvShow(_), MediaKind::TvShow(_)) => tvshow_score(reference, other),
        (MediaKind::Movie(_), MediaKind::TvShow(_)) | (MediaKind::TvShow(_), MediaKind::Movie(_)) => {
            mixed_score(reference, other)
        }
        _ => 0.0,
    }
}

/// Like [`score`], but a candidate with the reference's title and year scores 0
pub fn score_against(reference: &MediaItem, candidate: &MediaItem) -> f64 {
    if reference.is_same_title_and_year(candidate) {
        return 0.0;
    }
    score(reference, candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;
    use crate::models::MovieDetails;

    const EPSILON: f64 = 1e-9;

    fn genres(labels: &[&'static str]) -> HashSet<&'static str> {
        labels.iter().copied().collect()
    }

    #[test]
    fn test_genre_overlap_identical_sets() {
        let a = genres(&["Drama", "Crime"]);
        assert!((overlap_score(&a, &a.clone()) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_genre_overlap_disjoint_sets() {
        let a = genres(&["Drama"]);
        let b = genres(&["Comedy", "Family"]);
        assert_eq!(overlap_score(&a, &b), 0.0);
    }

    #[test]
    fn test_genre_overlap_empty_reference() {
        let b = genres(&["Comedy"]);
        assert_eq!(overlap_score(&HashSet::new(), &b), 0.0);
        assert_eq!(overlap_score(&HashSet::new(), &HashSet::new()), 0.0);
    }

    #[test]
    fn test_convert_tvshow_genres_maps_and_dedups() {
        let labels = vec![
            "TV Dramas".to_string(),
            "Drama".to_string(),
            "Anime".to_string(),
        ];
        let converted = convert_tvshow_genres(&labels);
        assert_eq!(converted, genres(&["Drama", "Anime"]));
    }

    #[test]
    fn test_cast_score_identical_top_five() {
        let names = ["A", "B", "C", "D", "E", "F"];
        let a = movie("One").with_cast(&names);
        let b = tvshow("Two").with_cast(&names);
        assert!((cast_score(&a, &b, CAST_WINDOW) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_cast_score_no_overlap() {
        let a = movie("One").with_cast(&["A", "B"]);
        let b = movie("Two").with_cast(&["C", "D"]);
        assert_eq!(cast_score(&a, &b, CAST_WINDOW), 0.0);
    }

    #[test]
    fn test_cast_score_one_of_five_shared() {
        let a = movie("One").with_cast(&["A", "B", "C", "D", "E"]);
        let b = movie("Two").with_cast(&["A", "X", "Y", "Z", "W"]);
        let expected = 0.2_f64.sqrt();
        assert!((cast_score(&a, &b, CAST_WINDOW) - expected).abs() < EPSILON);
        assert!((expected - 0.447).abs() < 0.001);
    }

    #[test]
    fn test_cast_score_ignores_members_past_window() {
        let a = movie("One").with_cast(&["A", "B", "C", "D", "E", "F"]);
        let b = movie("Two").with_cast(&["F"]);
        assert_eq!(cast_score(&a, &b, CAST_WINDOW), 0.0);
    }

    #[test]
    fn test_rating_and_year_closeness() {
        let a = movie("One").with_rating(7.0).with_year(2000);
        let b = movie("Two").with_rating(5.5).with_year(2004);
        assert!((rating_score(&a, &b) - 0.5).abs() < EPSILON);
        assert!((year_score(&a, &b) - 0.6).abs() < EPSILON);

        let far = movie("Three").with_rating(3.0).with_year(1980);
        assert_eq!(rating_score(&a, &far), 0.0);
        assert_eq!(year_score(&a, &far), 0.0);

        let unknown = movie("Four");
        assert_eq!(rating_score(&a, &unknown), 0.0);
        assert_eq!(year_score(&a, &unknown), 0.0);
    }

    #[test]
    fn test_year_score_with_extreme_years() {
        let ancient = movie("Ancient").with_year(i32::MIN);
        let distant = movie("Distant").with_year(i32::MAX);
        assert_eq!(year_score(&ancient, &distant), 0.0);
        assert_eq!(year_score(&distant, &ancient), 0.0);
    }

    #[test]
    fn test_mixed_score_end_to_end() {
        let x = movie("X")
            .with_genres(&["Drama"])
            .with_cast(&["A"])
            .with_rating(7.0)
            .with_year(2000);
        let y = tvshow("Y")
            .with_genres(&["TV Dramas"])
            .with_cast(&["A"])
            .with_rating(7.0)
            .with_year(2001);

        let expected = 0.5 + 0.05 * 0.2_f64.sqrt() + 0.025 + 0.05 * 0.9;
        assert!((mixed_score(&x, &y) - expected).abs() < EPSILON);
        assert!((score(&x, &y) - 0.59236).abs() < 0.0001);
        // tv show as the reference maps its own genres
        assert!((score(&y, &x) - expected).abs() < EPSILON);
    }

    #[test]
    fn test_mixed_score_stays_in_range() {
        let names = ["A", "B", "C", "D", "E"];
        let best_movie = movie("M")
            .with_genres(&["Drama", "Comedy"])
            .with_cast(&names)
            .with_rating(8.0)
            .with_year(2010);
        let best_show = tvshow("S")
            .with_genres(&["TV Dramas", "TV Comedies"])
            .with_cast(&names)
            .with_rating(8.0)
            .with_year(2010);
        let top = mixed_score(&best_movie, &best_show);
        assert!((top - MIXED_MAX_SCORE).abs() < EPSILON);

        let worst = mixed_score(&movie("Empty"), &tvshow("Blank"));
        assert_eq!(worst, 0.0);
    }

    #[test]
    fn test_movie_score_uses_crew_overlap() {
        let mut a = movie("Heat").with_genres(&["Crime"]);
        let mut b = movie("Thief").with_genres(&["Crime"]);
        if let MediaKind::Movie(details) = &mut a.kind {
            *details = MovieDetails {
                director: vec!["Michael Mann".to_string()],
                writer: vec!["Michael Mann".to_string()],
                mpaa: "R".to_string(),
                ..details.clone()
            };
        }
        if let MediaKind::Movie(details) = &mut b.kind {
            *details = MovieDetails {
                director: vec!["Michael Mann".to_string()],
                writer: vec!["Michael Mann".to_string(), "Frank Hohimer".to_string()],
                mpaa: "R".to_string(),
                ..details.clone()
            };
        }

        let expected = 0.5 + 0.15 + 0.125 * 0.5 + 0.075;
        assert!((movie_score(&a, &b) - expected).abs() < EPSILON);
    }

    #[test]
    fn test_tvshow_score_full_match_is_one() {
        let names = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];
        let mut a = tvshow("One")
            .with_genres(&["Drama"])
            .with_cast(&names)
            .with_rating(8.0)
            .with_year(2015);
        if let MediaKind::TvShow(details) = &mut a.kind {
            details.mpaa = "TV-MA".to_string();
        }
        let mut b = a.clone();
        b.info.title = "Two".to_string();
        assert!((tvshow_score(&a, &b) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_score_dispatch_ignores_music() {
        let a = album("Blue").with_genres(&["Jazz"]);
        let b = movie("Blue").with_genres(&["Jazz"]);
        assert_eq!(score(&a, &b), 0.0);
    }

    #[test]
    fn test_score_against_self_is_zero() {
        let a = movie("Heat").with_year(1995).with_genres(&["Crime"]);
        assert!(score(&a, &a) > 0.0);
        assert_eq!(score_against(&a, &a.clone()), 0.0);

        let remake = movie("Heat").with_year(1986).with_genres(&["Crime"]);
        assert!(score_against(&a, &remake) > 0.0);
    }
}
