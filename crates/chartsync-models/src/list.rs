use serde::{Deserialize, Serialize};

/// Static description of one remote list: the create payload plus the slug
/// the catalog derives from its name, used for create-if-missing matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSpec {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub privacy: String,
    pub display_numbers: bool,
}

impl ListSpec {
    pub fn public(slug: &str, name: &str, description: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            privacy: "public".to_string(),
            display_numbers: true,
        }
    }
}

/// One entry of a user's remote list collection, as returned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSummary {
    pub slug: String,
    pub trakt_id: u64,
}
