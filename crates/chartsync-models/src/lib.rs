pub mod account;
pub mod chart;
pub mod desired;
pub mod list;
pub mod media;
pub mod resolved;

pub use account::{Account, AccountName, AccountSet, TokenPair};
pub use chart::{ChartTask, RankedItem};
pub use desired::DesiredSet;
pub use list::{ListSpec, ListSummary};
pub use media::MediaType;
pub use resolved::{CatalogCandidate, ResolvedEntry};
