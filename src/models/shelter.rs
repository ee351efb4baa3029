//! Shelter model and its moderation vocabulary.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and inside their geographic bounds.
    pub fn validate(&self) -> Result<(), String> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("Latitude {} is out of range", self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!("Longitude {} is out of range", self.longitude));
        }
        Ok(())
    }

    /// Format as `lat,lng`, the form place-search providers expect.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Moderation state of a shelter.
///
/// `Pending` is the only state with outgoing transitions. A rejected shelter is deleted from the
/// store, so `Rejected` is only ever observed as the result of a transition.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ModerationStatus::Pending),
            "approved" => Some(ModerationStatus::Approved),
            "rejected" => Some(ModerationStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ModerationStatus::Pending)
    }
}

/// Where a shelter record came from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Backend,
    External,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Backend => "backend",
            Source::External => "external",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical shelter, either from the backend registry or an external provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub moderation_status: ModerationStatus,
    #[serde(default)]
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Shelter {
    /// Build a shelter from a provider result. External shelters are trusted and never pending.
    pub fn external(
        place_id: impl Into<String>,
        name: impl Into<String>,
        coordinates: Coordinates,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: place_id.into(),
            name: name.into(),
            coordinates,
            description: description.into(),
            moderation_status: ModerationStatus::Approved,
            source: Source::External,
            created_at: None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.moderation_status == ModerationStatus::Approved
    }
}

/// Request body for `POST /api/shelters`.
///
/// Coordinates are optional on the wire so a missing field becomes a validation error rather
/// than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShelterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl CreateShelterRequest {
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            name: name.into(),
            latitude: Some(coordinates.latitude),
            longitude: Some(coordinates.longitude),
        }
    }

    /// Validate required fields and return the coordinates they describe.
    pub fn validate(&self) -> Result<Coordinates, String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return Err("Latitude and longitude are required".to_string());
        };
        let coordinates = Coordinates::new(latitude, longitude);
        coordinates.validate()?;
        Ok(coordinates)
    }
}
