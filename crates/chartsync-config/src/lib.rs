pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{AccountKeys, ChartUrls, Config, RequestConfig, SchedulerConfig, SectionTitles};
pub use credentials::CredentialStore;
pub use paths::{container_base_path, PathManager};
