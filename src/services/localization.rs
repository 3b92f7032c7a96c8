/// Looks up display strings by numeric id
pub trait Localizer: Send + Sync {
    fn localize(&self, id: u32) -> String;
}

/// Built-in English labels for the menu entries
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishStrings;

impl EnglishStrings {
    fn lookup(id: u32) -> Option<&'static str> {
        let label = match id {
            32004 => "Recommended",
            32080 => "In Progress Episodes & Movies",
            32081 => "Random IMDb Top 250",
            32086 => "Watch Again",
            32087 => "New Releases",
            32088 => "Unwatched Shows & Movies",
            32090 => "Popular",
            32100 => "TMDb",
            32101 => "Trakt",
            32102 => "Trending",
            32105 => "Most Played",
            32108 => "Most Watched",
            _ => return None,
        };
        Some(label)
    }
}

impl Localizer for EnglishStrings {
    fn localize(&self, id: u32) -> String {
        match Self::lookup(id) {
            Some(label) => label.to_string(),
            None => {
                tracing::warn!(id, "Missing localized string");
                id.to_string()
            }
        }
    }
}
