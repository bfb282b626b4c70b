use serde::{Deserialize, Serialize};

/// Sort order for discover mode
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "vote_average.desc")]
    RatingDesc,
    #[serde(rename = "vote_average.asc")]
    RatingAsc,
    #[serde(rename = "release_date.desc")]
    ReleaseDesc,
    #[serde(rename = "release_date.asc")]
    ReleaseAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::PopularityDesc,
        SortKey::RatingDesc,
        SortKey::RatingAsc,
        SortKey::ReleaseDesc,
        SortKey::ReleaseAsc,
    ];

    /// Token accepted by the catalog's `sort_by` parameter
    pub fn as_api_token(&self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "popularity.desc",
            SortKey::RatingDesc => "vote_average.desc",
            SortKey::RatingAsc => "vote_average.asc",
            SortKey::ReleaseDesc => "release_date.desc",
            SortKey::ReleaseAsc => "release_date.asc",
        }
    }

    /// Rating sorts are noisy at the extremes without a vote-count floor
    pub fn is_rating_sort(&self) -> bool {
        matches!(self, SortKey::RatingDesc | SortKey::RatingAsc)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "Popularity",
            SortKey::RatingDesc => "Rating (High → Low)",
            SortKey::RatingAsc => "Rating (Low → High)",
            SortKey::ReleaseDesc => "Release Date (New → Old)",
            SortKey::ReleaseAsc => "Release Date (Old → New)",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BrowseMode {
    #[default]
    Discover,
    NowPlaying,
}
