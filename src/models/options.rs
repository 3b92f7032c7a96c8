use serde::{Deserialize, Serialize};

/// Ordering applied to the contents of a playlist widget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistSort {
    #[default]
    Recommended,
    Random,
    Recent,
    Year,
    Title,
}

/// Options consulted (read-only) by every widget action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetOptions {
    /// Maximum number of results
    pub limit: usize,
    /// Tag filter; empty means no filter
    #[serde(default)]
    pub tag: Option<String>,
    /// Number of recently watched items used as references
    pub num_recent_similar: usize,
    pub extended_info: bool,
    pub exp_recommended: bool,
    pub hide_watched_similar: bool,
    #[serde(default)]
    pub movie_label: Option<String>,
    #[serde(default)]
    pub tv_label: Option<String>,
    #[serde(default)]
    pub playlist_sort: PlaylistSort,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        WidgetDefaults::default().options()
    }
}

impl WidgetOptions {
    /// Active tag filter, if any
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref().filter(|tag| !tag.is_empty())
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Service-wide defaults for options a request leaves unset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetDefaults {
    pub limit: usize,
    pub num_recent_similar: usize,
    pub extended_info: bool,
    pub exp_recommended: bool,
    pub hide_watched_similar: bool,
}

impl Default for WidgetDefaults {
    fn default() -> Self {
        Self {
            limit: 25,
            num_recent_similar: 5,
            extended_info: false,
            exp_recommended: false,
            hide_watched_similar: false,
        }
    }
}

impl WidgetDefaults {
    /// Options with every field taken from the defaults
    pub fn options(&self) -> WidgetOptions {
        WidgetOptions {
            limit: self.limit,
            tag: None,
            num_recent_similar: self.num_recent_similar,
            extended_info: self.extended_info,
            exp_recommended: self.exp_recommended,
            hide_watched_similar: self.hide_watched_similar,
            movie_label: None,
            tv_label: None,
            playlist_sort: PlaylistSort::default(),
        }
    }
}

/// Partially specified options, as received on a request or carried by a menu entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_recent_similar: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_info: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_recommended: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_watched_similar: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tv_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_sort: Option<PlaylistSort>,
}

impl WidgetQuery {
    /// Fills unset fields from the defaults
    pub fn resolve(self, defaults: &WidgetDefaults) -> WidgetOptions {
        WidgetOptions {
            limit: self.limit.unwrap_or(defaults.limit),
            tag: self.tag.filter(|tag| !tag.is_empty()),
            num_recent_similar: self
                .num_recent_similar
                .unwrap_or(defaults.num_recent_similar),
            extended_info: self.extended_info.unwrap_or(defaults.extended_info),
            exp_recommended: self.exp_recommended.unwrap_or(defaults.exp_recommended),
            hide_watched_similar: self
                .hide_watched_similar
                .unwrap_or(defaults.hide_watched_similar),
            movie_label: self.movie_label,
            tv_label: self.tv_label,
            playlist_sort: self.playlist_sort.unwrap_or_default(),
        }
    }

    /// Query carrying only a tag (omitted when empty)
    pub fn tagged(tag: Option<&str>) -> Self {
        Self {
            tag: tag.filter(|tag| !tag.is_empty()).map(str::to_string),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_defaults_for_unset_fields() {
        let defaults = WidgetDefaults {
            limit: 10,
            num_recent_similar: 3,
            extended_info: true,
            exp_recommended: false,
            hide_watched_similar: true,
        };
        let query = WidgetQuery {
            limit: Some(4),
            exp_recommended: Some(true),
            ..WidgetQuery::default()
        };

        let options = query.resolve(&defaults);
        assert_eq!(options.limit, 4);
        assert_eq!(options.num_recent_similar, 3);
        assert!(options.extended_info);
        assert!(options.exp_recommended);
        assert!(options.hide_watched_similar);
        assert_eq!(options.playlist_sort, PlaylistSort::Recommended);
    }

    #[test]
    fn test_empty_tag_means_no_filter() {
        let query = WidgetQuery {
            tag: Some(String::new()),
            ..WidgetQuery::default()
        };
        let options = query.resolve(&WidgetDefaults::default());
        assert_eq!(options.tag(), None);

        let options = WidgetOptions {
            tag: Some("Kids".to_string()),
            ..WidgetOptions::default()
        };
        assert_eq!(options.tag(), Some("Kids"));
    }

    #[test]
    fn test_labels_with_ampersand_survive_round_trip() {
        let query = WidgetQuery {
            movie_label: Some("Action & Adventure".to_string()),
            ..WidgetQuery::default()
        };
        let json = serde_json::to_string(&query).unwrap();
        let parsed: WidgetQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.movie_label.as_deref(), Some("Action & Adventure"));
        assert!(!json.contains("limit"));
    }
}
