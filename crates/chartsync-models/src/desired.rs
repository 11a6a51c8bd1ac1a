use serde::{Deserialize, Serialize};

use crate::media::MediaType;
use crate::resolved::ResolvedEntry;

/// The full target contents computed for one list in the current run.
/// Insertion order is rank order; duplicate ids are dropped on push.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DesiredSet {
    pub movies: Vec<u64>,
    pub shows: Vec<u64>,
}

impl DesiredSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ResolvedEntry) {
        let ids = match entry.media_type {
            MediaType::Movie => &mut self.movies,
            MediaType::Show => &mut self.shows,
        };
        if !ids.contains(&entry.trakt_id) {
            ids.push(entry.trakt_id);
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len() + self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.shows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(media_type: MediaType, trakt_id: u64, rank: u32) -> ResolvedEntry {
        ResolvedEntry {
            media_type,
            trakt_id,
            rank,
        }
    }

    #[test]
    fn test_push_preserves_insertion_order() {
        let mut set = DesiredSet::new();
        set.push(entry(MediaType::Movie, 30, 1));
        set.push(entry(MediaType::Movie, 10, 2));
        set.push(entry(MediaType::Movie, 20, 3));

        assert_eq!(set.movies, vec![30, 10, 20]);
    }

    #[test]
    fn test_push_drops_duplicates() {
        let mut set = DesiredSet::new();
        set.push(entry(MediaType::Show, 7, 1));
        set.push(entry(MediaType::Show, 7, 5));
        set.push(entry(MediaType::Movie, 7, 2));

        assert_eq!(set.shows, vec![7]);
        assert_eq!(set.movies, vec![7]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_is_empty() {
        let mut set = DesiredSet::new();
        assert!(set.is_empty());
        set.push(entry(MediaType::Movie, 1, 1));
        assert!(!set.is_empty());
    }
}
