pub mod extract;
pub mod fetch;

pub use extract::extract_ranked;
pub use fetch::HttpChartClient;
