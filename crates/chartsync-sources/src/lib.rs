pub mod charts;
pub mod error;
pub mod traits;
pub mod trakt;

pub use charts::{extract_ranked, HttpChartClient};
pub use error::SourceError;
pub use traits::{Catalog, ChartFetcher, IdentityStatus, WriteStatus};
pub use trakt::api::ItemsPayload;
pub use trakt::TraktCatalog;
