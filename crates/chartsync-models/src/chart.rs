use serde::{Deserialize, Serialize};

use crate::account::AccountName;
use crate::list::ListSpec;
use crate::media::MediaType;

/// One row of a scraped top-10 chart. Row order on the page is rank order;
/// the rank value is carried through but never used to re-sort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankedItem {
    pub rank: u32,
    pub title: String,
    /// Second-to-last path segment of the chart row's link target.
    pub slug: String,
}

/// One (chart page, section) to be mirrored into one remote list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartTask {
    /// Stable identifier used in logs and the run report.
    pub id: String,
    pub url: String,
    pub section: String,
    /// `Some` restricts the catalog search to one media type; `None` is a
    /// mixed movie+show chart.
    pub scope: Option<MediaType>,
    pub account: AccountName,
    pub list: ListSpec,
}
