use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, only required when the proxy resolves recommendations
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Ollama base URL
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Model used for generation
    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,

    /// Resolve generated titles against the catalog and return movies
    #[serde(default)]
    pub resolve_recommendations: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the recommendation proxy, as seen by the client
    #[serde(default = "default_recommend_api_url")]
    pub recommend_api_url: String,

    /// File holding the persisted liked set
    #[serde(default = "default_liked_movies_path")]
    pub liked_movies_path: PathBuf,

    /// Quiet interval before search input becomes the effective query
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_recommend_api_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_liked_movies_path() -> PathBuf {
    PathBuf::from("liked_movies.json")
}

fn default_search_debounce_ms() -> u64 {
    400
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
