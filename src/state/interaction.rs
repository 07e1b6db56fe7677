/// Mutable interaction state owned by the controller
///
/// Holds the active category filter, the search text as typed and the
/// position of the single user-location marker.

use super::data::{Coordinate, FacilityKind, FacilityRecord};

/// Active category filter. Each variant corresponds to one filter tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    Kind(FacilityKind),
}

impl Filter {
    /// Filter tabs in display order
    pub const TABS: [Filter; 4] = [
        Filter::All,
        Filter::Kind(FacilityKind::Hospital),
        Filter::Kind(FacilityKind::Clinic),
        Filter::Kind(FacilityKind::HealthCenter),
    ];

    pub fn accepts(self, record: &FacilityRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::Kind(kind) => record.kind == kind,
        }
    }

    pub fn tab_label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Kind(FacilityKind::Hospital) => "Hospitals",
            Filter::Kind(FacilityKind::Clinic) => "Clinics",
            Filter::Kind(FacilityKind::HealthCenter) => "Health Centers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub filter: Filter,
    /// Raw text of the search field
    pub search_text: String,
    /// Position of the user-location marker, if one is placed
    pub user_location: Option<Coordinate>,
}

impl InteractionState {
    /// Trimmed, lowercased search term used for matching
    pub fn search_term(&self) -> String {
        normalize_term(&self.search_text)
    }

    pub fn is_searching(&self) -> bool {
        !self.search_term().is_empty()
    }
}

pub fn normalize_term(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures;

    #[test]
    fn test_default_state() {
        let state = InteractionState::default();
        assert_eq!(state.filter, Filter::All);
        assert!(state.search_text.is_empty());
        assert!(state.user_location.is_none());
        assert!(!state.is_searching());
    }

    #[test]
    fn test_whitespace_only_search_is_not_searching() {
        let state = InteractionState {
            search_text: "   ".to_string(),
            ..Default::default()
        };
        assert!(!state.is_searching());
        assert_eq!(normalize_term("  Surgery "), "surgery");
    }

    #[test]
    fn test_filter_accepts() {
        let records = fixtures::sample();
        assert!(records.iter().all(|r| Filter::All.accepts(r)));
        assert!(Filter::Kind(FacilityKind::Clinic).accepts(&records[3]));
        assert!(!Filter::Kind(FacilityKind::Clinic).accepts(&records[0]));
    }
}
