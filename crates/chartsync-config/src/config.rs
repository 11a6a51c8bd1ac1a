use std::path::Path;

use anyhow::{Context, Result};
use chartsync_models::{AccountName, ChartTask, ListSpec, MediaType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub accounts: AccountKeys,
    #[serde(default)]
    pub charts: ChartUrls,
    #[serde(default)]
    pub sections: SectionTitles,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerConfig>,
}

/// API application keys per logical account. Tokens live in the credential
/// store, not here.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountKeys {
    pub netflix: AppKeys,
    pub prime: AppKeys,
    pub others: AppKeys,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppKeys {
    pub client_id: String,
    pub client_secret: String,
}

impl AccountKeys {
    pub fn get(&self, name: AccountName) -> &AppKeys {
        match name {
            AccountName::Netflix => &self.netflix,
            AccountName::Prime => &self.prime,
            AccountName::Others => &self.others,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChartUrls {
    #[serde(default = "default_netflix_url")]
    pub netflix: String,
    #[serde(default = "default_hotstar_url")]
    pub hotstar: String,
    #[serde(default = "default_zee5_url")]
    pub zee5: String,
    #[serde(default = "default_prime_url")]
    pub prime: String,
}

fn default_netflix_url() -> String {
    "https://flixpatrol.com/top10/netflix/india/".to_string()
}

fn default_hotstar_url() -> String {
    "https://flixpatrol.com/top10/hotstar/india/".to_string()
}

fn default_zee5_url() -> String {
    "https://flixpatrol.com/top10/zee5/india/".to_string()
}

fn default_prime_url() -> String {
    "https://flixpatrol.com/top10/amazon-prime/india/".to_string()
}

impl Default for ChartUrls {
    fn default() -> Self {
        Self {
            netflix: default_netflix_url(),
            hotstar: default_hotstar_url(),
            zee5: default_zee5_url(),
            prime: default_prime_url(),
        }
    }
}

/// Section headings as they appear on the chart pages. Shared by all
/// services except the Hotstar overall chart, which is Hindi-scoped.
#[derive(Debug, Serialize, Deserialize)]
pub struct SectionTitles {
    #[serde(default = "default_movies_section")]
    pub movies: String,
    #[serde(default = "default_shows_section")]
    pub shows: String,
    #[serde(default = "default_overall_section")]
    pub overall: String,
    #[serde(default = "default_overall_hindi_section")]
    pub overall_hindi: String,
}

fn default_movies_section() -> String {
    "TOP 10 Movies".to_string()
}

fn default_shows_section() -> String {
    "TOP 10 TV Shows".to_string()
}

fn default_overall_section() -> String {
    "TOP 10 Overall".to_string()
}

fn default_overall_hindi_section() -> String {
    "TOP 10 Overall (in Hindi)".to_string()
}

impl Default for SectionTitles {
    fn default() -> Self {
        Self {
            movies: default_movies_section(),
            shows: default_shows_section(),
            overall: default_overall_section(),
            overall_hindi: default_overall_hindi_section(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    10
}

fn default_backoff_factor() -> u64 {
    2
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_schedule")]
    pub schedule: String,
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

fn default_schedule() -> String {
    // Daily at 06:00 UTC, after the chart site publishes the new day.
    "0 0 6 * * *".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
            run_on_startup: default_true(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// The six default chart-to-list assignments: type-scoped movie/show
    /// lists for Netflix and Prime, mixed overall lists for Zee5 and
    /// Hotstar on the shared account.
    pub fn tasks(&self) -> Vec<ChartTask> {
        vec![
            ChartTask {
                id: "netflix_movies".to_string(),
                url: self.charts.netflix.clone(),
                section: self.sections.movies.clone(),
                scope: Some(MediaType::Movie),
                account: AccountName::Netflix,
                list: ListSpec::public(
                    "top-india-netflix-movies",
                    "Top India Netflix Movies",
                    "List that contains the top 10 movies on Netflix India right now, updated daily",
                ),
            },
            ChartTask {
                id: "netflix_shows".to_string(),
                url: self.charts.netflix.clone(),
                section: self.sections.shows.clone(),
                scope: Some(MediaType::Show),
                account: AccountName::Netflix,
                list: ListSpec::public(
                    "top-india-netflix-shows",
                    "Top India Netflix Shows",
                    "List that contains the top 10 TV shows on Netflix India right now, updated daily",
                ),
            },
            ChartTask {
                id: "zee5_overall".to_string(),
                url: self.charts.zee5.clone(),
                section: self.sections.overall.clone(),
                scope: None,
                account: AccountName::Others,
                list: ListSpec::public(
                    "top-india-zee5-overall",
                    "Top India Zee5 Overall",
                    "List that contains the top 10 overall content on Zee5 India right now, updated daily",
                ),
            },
            ChartTask {
                id: "hotstar_overall".to_string(),
                url: self.charts.hotstar.clone(),
                section: self.sections.overall_hindi.clone(),
                scope: None,
                account: AccountName::Others,
                list: ListSpec::public(
                    "top-india-hotstar-overall",
                    "Top India Hotstar Overall",
                    "List that contains the top 10 overall content on Hotstar India (in Hindi) right now, updated daily",
                ),
            },
            ChartTask {
                id: "prime_movies".to_string(),
                url: self.charts.prime.clone(),
                section: self.sections.movies.clone(),
                scope: Some(MediaType::Movie),
                account: AccountName::Prime,
                list: ListSpec::public(
                    "top-india-amazon-prime-video-movies",
                    "Top India Amazon Prime Video Movies",
                    "List that contains the top 10 movies on Amazon Prime Video India right now, updated daily",
                ),
            },
            ChartTask {
                id: "prime_shows".to_string(),
                url: self.charts.prime.clone(),
                section: self.sections.shows.clone(),
                scope: Some(MediaType::Show),
                account: AccountName::Prime,
                list: ListSpec::public(
                    "top-india-amazon-prime-video-shows",
                    "Top India Amazon Prime Video Shows",
                    "List that contains the top 10 TV shows on Amazon Prime Video India right now, updated daily",
                ),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[accounts.netflix]
client_id = "nf-id"
client_secret = "nf-secret"

[accounts.prime]
client_id = "pr-id"
client_secret = "pr-secret"

[accounts.others]
client_id = "ot-id"
client_secret = "ot-secret"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();

        assert_eq!(config.request.timeout_secs, 30);
        assert_eq!(config.request.max_retries, 10);
        assert_eq!(config.request.backoff_factor, 2);
        assert_eq!(config.sections.movies, "TOP 10 Movies");
        assert!(config.charts.netflix.contains("flixpatrol.com"));
        assert!(config.scheduler.is_none());
    }

    #[test]
    fn test_default_tasks() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        let tasks = config.tasks();

        assert_eq!(tasks.len(), 6);
        let mixed: Vec<_> = tasks.iter().filter(|t| t.scope.is_none()).collect();
        assert_eq!(mixed.len(), 2);
        for task in &mixed {
            assert_eq!(task.account, AccountName::Others);
        }

        let netflix_movies = tasks.iter().find(|t| t.id == "netflix_movies").unwrap();
        assert_eq!(netflix_movies.scope, Some(MediaType::Movie));
        assert_eq!(netflix_movies.list.slug, "top-india-netflix-movies");
        assert_eq!(netflix_movies.section, "TOP 10 Movies");
    }

    #[test]
    fn test_config_round_trip() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        let file = NamedTempFile::new().unwrap();
        config.save_to_file(file.path()).unwrap();

        let loaded = Config::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.accounts.netflix.client_id, "nf-id");
        assert_eq!(loaded.accounts.others.client_secret, "ot-secret");
        assert_eq!(loaded.request.max_retries, 10);
    }

    #[test]
    fn test_missing_accounts_fails() {
        let result: Result<Config, _> = toml::from_str("[request]\ntimeout_secs = 5\n");
        assert!(result.is_err());
    }
}
