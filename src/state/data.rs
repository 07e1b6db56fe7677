/// Shared data structures for the application state
///
/// These structs represent the facility dataset as it is loaded from JSON
/// and handed to the map, the list panel and the popup views.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique facility identifier
pub type FacilityId = i64;

/// A WGS84 coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// The closed set of facility kinds shown on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacilityKind {
    Hospital,
    Clinic,
    HealthCenter,
}

impl FacilityKind {
    /// The dataset slug ("hospital", "clinic", "health-center").
    /// Search matches against this, not against the display label.
    pub fn slug(self) -> &'static str {
        match self {
            FacilityKind::Hospital => "hospital",
            FacilityKind::Clinic => "clinic",
            FacilityKind::HealthCenter => "health-center",
        }
    }

    /// Human readable label used in the list and popups
    pub fn label(self) -> &'static str {
        match self {
            FacilityKind::Hospital => "Hospital",
            FacilityKind::Clinic => "Medical Clinic",
            FacilityKind::HealthCenter => "Health Center",
        }
    }
}

/// A single health facility record
///
/// Records are immutable once loaded. `has_emergency` and `emergency` are
/// supplied independently by the dataset and are not derived from each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRecord {
    pub id: FacilityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FacilityKind,
    pub address: String,
    pub contact: String,
    pub hours: String,
    /// Emergency line, present only when the facility offers emergency services
    #[serde(default)]
    pub emergency: Option<String>,
    /// Counted in the "emergency" statistic
    #[serde(default)]
    pub has_emergency: bool,
    #[serde(default)]
    pub services: Vec<String>,
    pub lat: f64,
    pub lng: f64,
}

impl FacilityRecord {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// Case-insensitive substring match over name, kind, services and address.
    ///
    /// `needle` must already be lowercased; an empty needle matches everything.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }

        self.name.to_lowercase().contains(needle)
            || self.kind.slug().contains(needle)
            || self
                .services
                .iter()
                .any(|service| service.to_lowercase().contains(needle))
            || self.address.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn facility(id: FacilityId, name: &str, kind: FacilityKind) -> FacilityRecord {
        FacilityRecord {
            id,
            name: name.to_string(),
            kind,
            address: format!("{} Road, Kampala", name),
            contact: "+256 414 000000".to_string(),
            hours: "24/7".to_string(),
            emergency: None,
            has_emergency: false,
            services: vec!["General Medicine".to_string()],
            lat: 0.3 + id as f64 * 0.01,
            lng: 32.5 + id as f64 * 0.01,
        }
    }

    /// Small mixed dataset used across the module tests
    pub fn sample() -> Vec<FacilityRecord> {
        let mut mulago = facility(1, "Mulago National Referral Hospital", FacilityKind::Hospital);
        mulago.services = vec![
            "Emergency Care".to_string(),
            "Surgery".to_string(),
            "Maternity".to_string(),
        ];
        mulago.emergency = Some("+256 414 554001".to_string());
        mulago.has_emergency = true;

        let mut nsambya = facility(2, "Nsambya Hospital", FacilityKind::Hospital);
        nsambya.services = vec!["Pediatrics".to_string(), "Surgery".to_string()];
        nsambya.has_emergency = true;

        let mut kisenyi = facility(3, "Kisenyi Health Centre IV", FacilityKind::HealthCenter);
        kisenyi.services = vec!["Immunization".to_string(), "Maternity".to_string()];

        let mut case_clinic = facility(4, "Case Medical Clinic", FacilityKind::Clinic);
        case_clinic.services = vec!["Dental".to_string(), "Laboratory".to_string()];
        case_clinic.address = "Buganda Road, Kampala".to_string();

        vec![mulago, nsambya, kisenyi, case_clinic]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_dataset_record() {
        let json = r#"{
            "id": 7,
            "name": "Rubaga Hospital",
            "type": "health-center",
            "address": "Rubaga Hill",
            "contact": "+256 414 270 012",
            "hours": "24/7",
            "emergency": "+256 414 270 013",
            "hasEmergency": false,
            "services": ["Maternity"],
            "lat": 0.3030,
            "lng": 32.5530
        }"#;

        let record: FacilityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, FacilityKind::HealthCenter);
        assert_eq!(record.emergency.as_deref(), Some("+256 414 270 013"));
        // Independent fields: the string does not imply the flag
        assert!(!record.has_emergency);
    }

    #[test]
    fn test_matches_is_case_insensitive_across_fields() {
        let records = fixtures::sample();
        let mulago = &records[0];

        assert!(mulago.matches("mulago"));
        assert!(mulago.matches("hospital"));
        assert!(mulago.matches("surgery"));
        assert!(mulago.matches("kampala"));
        assert!(!mulago.matches("dental"));
    }

    #[test]
    fn test_matches_kind_slug_not_label() {
        let records = fixtures::sample();
        let kisenyi = &records[2];

        assert!(kisenyi.matches("health-center"));
        // "Health Center" is only the display label
        assert!(!kisenyi.matches("health center"));
    }
}
