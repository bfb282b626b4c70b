use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w342";
pub const BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/w1280";
pub const PROFILE_BASE_URL: &str = "https://image.tmdb.org/t/p/w185";

/// Hard cap on `total_pages` imposed by the catalog
pub const MAX_TOTAL_PAGES: u32 = 500;

/// Catalog-assigned movie identifier
pub type MovieId = u64;

/// A movie as it appears in catalog listings and in the liked set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub popularity: f64,
}

// Identity is the catalog id; snapshots taken at different times are the same movie.
impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Movie {}

impl Movie {
    pub fn poster_url(&self) -> Option<String> {
        image_url(POSTER_BASE_URL, self.poster_path.as_deref())
    }

    pub fn release_year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Full movie record backing the detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub tagline: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
}

impl MovieDetail {
    /// Listing snapshot of this movie, the form kept in the liked set
    pub fn to_movie(&self) -> Movie {
        Movie {
            id: self.id,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            release_date: self.release_date.clone(),
            vote_average: self.vote_average,
            popularity: self.popularity,
        }
    }

    pub fn backdrop_url(&self) -> Option<String> {
        image_url(BACKDROP_BASE_URL, self.backdrop_path.as_deref())
    }

    pub fn poster_url(&self) -> Option<String> {
        image_url(POSTER_BASE_URL, self.poster_path.as_deref())
    }

    pub fn release_year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }

    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A cast or crew member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Character played (cast only)
    #[serde(default)]
    pub character: Option<String>,
    /// Job on the production (crew only)
    #[serde(default)]
    pub job: Option<String>,
}

impl Person {
    pub fn role(&self) -> Option<&str> {
        self.character.as_deref().or(self.job.as_deref())
    }

    pub fn profile_url(&self) -> Option<String> {
        image_url(PROFILE_BASE_URL, self.profile_path.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<Person>,
    #[serde(default)]
    pub crew: Vec<Person>,
}

impl Credits {
    pub fn directors(&self) -> Vec<&Person> {
        self.crew
            .iter()
            .filter(|person| person.job.as_deref() == Some("Director"))
            .collect()
    }
}

/// One page of catalog listing results
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MoviePage {
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
}

impl MoviePage {
    /// Drops repeated ids (first occurrence wins) and applies the page cap
    pub fn normalized(mut self) -> Self {
        self.results = unique_by_id(self.results);
        self.total_pages = self.total_pages.min(MAX_TOTAL_PAGES);
        self
    }
}

pub fn unique_by_id(movies: Vec<Movie>) -> Vec<Movie> {
    let mut seen = HashSet::new();
    movies.into_iter().filter(|m| seen.insert(m.id)).collect()
}

fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", base, p))
}

fn release_year(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.year())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
