use crate::{models::MediaItem, services::similarity};

/// Weight added when a title shows up again in the play history
const REPEAT_WEIGHT: f64 = 0.5;

/// Reference item with its contribution to the averaged score
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedReference {
    pub item: MediaItem,
    pub weight: f64,
}

/// Weighted set of reference items used to rank recommendation candidates
///
/// A history-built set holds one entry per distinct title; repeated titles
/// raise the existing entry's weight instead of adding a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSet {
    entries: Vec<WeightedReference>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `item` with weight 1, or bumps the weight of the entry with the
    /// same title. Returns the weight added to the set.
    pub fn add_or_bump(&mut self, item: MediaItem) -> f64 {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.item.title() == item.title())
        {
            Some(entry) => {
                entry.weight += REPEAT_WEIGHT;
                REPEAT_WEIGHT
            }
            None => {
                self.entries.push(WeightedReference { item, weight: 1.0 });
                1.0
            }
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }

    /// Builds the set from play history, most recent first
    ///
    /// Items are consumed until the running weight exceeds `target`, so a
    /// title watched again right after the cut-off still gets its bump.
    pub fn from_history(history: impl IntoIterator<Item = MediaItem>, target: usize) -> Self {
        let mut set = Self::new();
        let mut running = 0.0;
        for item in history {
            running += set.add_or_bump(item);
            if running > target as f64 {
                break;
            }
        }
        set
    }

    /// Every item as its own entry with a flat weight of 1
    pub fn uniform(items: impl IntoIterator<Item = MediaItem>) -> Self {
        Self {
            entries: items
                .into_iter()
                .map(|item| WeightedReference { item, weight: 1.0 })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedReference> {
        self.entries.iter()
    }

    /// Weighted similarity averaged over the entries, damped by the
    /// candidate's play count. 0 for an empty set.
    pub fn score(&self, candidate: &MediaItem) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .entries
            .iter()
            .map(|entry| entry.weight * similarity::score_against(&entry.item, candidate))
            .sum();
        total / (1.0 + candidate.info.playcount as f64) / self.entries.len() as f64
    }
}

/// Annotates candidates with `recommendedscore` and returns the best `limit`
///
/// With no references the candidates come back unscored in merge
/// order.
pub fn rank_candidates(
    candidates: Vec<MediaItem>,
    references: &ReferenceSet,
    limit: usize,
) -> Vec<MediaItem> {
    let mut ranked: Vec<MediaItem> = candidates
        .into_iter()
        .map(|mut item| {
            item.recommended_score = Some(references.score(&item));
            item
        })
        .collect();

    if !references.is_empty() {
        ranked.sort_by(|a, b| {
            b.recommended_score
                .unwrap_or(0.0)
                .total_cmp(&a.recommended_score.unwrap_or(0.0))
        });
    }
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;

    fn weights(set: &ReferenceSet) -> Vec<(&str, f64)> {
        set.iter()
            .map(|entry| (entry.item.title(), entry.weight))
            .collect()
    }

    #[test]
    fn test_history_repeats_bump_weight() {
        let history = vec![movie("A"), movie("B"), movie("A"), movie("C")];
        let set = ReferenceSet::from_history(history, 2);

        assert_eq!(weights(&set), vec![("A", 1.5), ("B", 1.0)]);
        assert_eq!(set.total_weight(), 2.5);
    }

    #[test]
    fn test_history_stops_only_after_exceeding_target() {
        let history = vec![movie("A"), movie("B"), movie("C"), movie("D")];
        let set = ReferenceSet::from_history(history, 2);

        // reaching the target exactly keeps consuming
        assert_eq!(weights(&set), vec![("A", 1.0), ("B", 1.0), ("C", 1.0)]);
    }

    #[test]
    fn test_history_shorter_than_target() {
        let set = ReferenceSet::from_history(vec![movie("A"), tvshow("B")], 5);
        assert_eq!(set.len(), 2);
        assert_eq!(set.total_weight(), 2.0);
    }

    #[test]
    fn test_uniform_keeps_every_item() {
        let set = ReferenceSet::uniform(vec![movie("A"), movie("A"), tvshow("B")]);
        assert_eq!(weights(&set), vec![("A", 1.0), ("A", 1.0), ("B", 1.0)]);
    }

    #[test]
    fn test_playcount_damps_score() {
        let references = ReferenceSet::uniform(vec![movie("Ref")
            .with_year(2000)
            .with_genres(&["Drama"])]);
        let fresh = movie("Fresh").with_year(2000).with_genres(&["Drama"]);
        let watched = fresh.clone().with_playcount(3);

        let fresh_score = references.score(&fresh);
        assert!(fresh_score > 0.0);
        assert!((references.score(&watched) - fresh_score / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_rank_candidates_orders_by_score() {
        let references = ReferenceSet::uniform(vec![movie("Ref")
            .with_year(2000)
            .with_genres(&["Drama", "Crime"])]);
        let candidates = vec![
            movie("Far").with_genres(&["Comedy"]),
            movie("Watched Twin")
                .with_year(2000)
                .with_genres(&["Drama", "Crime"])
                .with_playcount(3),
            movie("Twin").with_year(2000).with_genres(&["Drama", "Crime"]),
        ];

        let ranked = rank_candidates(candidates, &references, 2);
        assert_eq!(
            ranked.iter().map(MediaItem::title).collect::<Vec<_>>(),
            vec!["Twin", "Watched Twin"]
        );
        assert!(ranked[0].recommended_score > ranked[1].recommended_score);
    }

    #[test]
    fn test_reference_itself_scores_zero() {
        let reference = movie("Heat").with_year(1995).with_genres(&["Crime"]);
        let references = ReferenceSet::uniform(vec![reference.clone()]);
        assert_eq!(references.score(&reference), 0.0);
    }

    #[test]
    fn test_empty_references_keep_merge_order() {
        let ranked = rank_candidates(
            vec![movie("B"), movie("A"), movie("C")],
            &ReferenceSet::new(),
            2,
        );
        assert_eq!(
            ranked.iter().map(MediaItem::title).collect::<Vec<_>>(),
            vec!["B", "A"]
        );
        assert!(ranked.iter().all(|item| item.recommended_score == Some(0.0)));
    }
}
