/// Search filtering over the browse views
use cadence_core::{Album, Artist, Track};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which result groups a search returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchFilter {
    Songs,
    Artists,
    Albums,
    #[default]
    All,
}

impl SearchFilter {
    pub(crate) fn includes_songs(self) -> bool {
        matches!(self, Self::Songs | Self::All)
    }

    pub(crate) fn includes_artists(self) -> bool {
        matches!(self, Self::Artists | Self::All)
    }

    pub(crate) fn includes_albums(self) -> bool {
        matches!(self, Self::Albums | Self::All)
    }
}

impl FromStr for SearchFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "songs" => Ok(Self::Songs),
            "artists" => Ok(Self::Artists),
            "albums" => Ok(Self::Albums),
            "all" => Ok(Self::All),
            other => Err(format!("unknown search filter: {other}")),
        }
    }
}

/// Matches grouped by kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub songs: Vec<Track>,
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty() && self.artists.is_empty() && self.albums.is_empty()
    }
}

/// Trimmed, lowercased search term; `None` for a blank query
pub(crate) fn normalize_query(query: &str) -> Option<String> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        None
    } else {
        Some(term)
    }
}

pub(crate) fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_is_none() {
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(" Beat "), Some("beat".to_string()));
    }

    #[test]
    fn parse_filter() {
        assert_eq!("ALBUMS".parse::<SearchFilter>(), Ok(SearchFilter::Albums));
        assert!("tracks".parse::<SearchFilter>().is_err());
    }
}
