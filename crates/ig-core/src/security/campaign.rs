//! Validation of the campaign-creation form.
//!
//! A [`CampaignDraft`] comes straight from the form. [`validate_campaign_data`]
//! checks every field independently, collects one error per failing field,
//! and fills a [`SanitizedCampaign`] with the fields that passed, each run
//! through the matching sanitizer. Only the sanitized record should be sent on.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::sanitize::{sanitize_description, sanitize_name, utf16_len, MAX_NAME_CHARS};

pub const CAMPAIGN_NAME_REQUIRED: &str = "Campaign name is required";
pub const CAMPAIGN_NAME_TOO_LONG: &str = "Campaign name too long (max 100 characters)";
pub const INVALID_GAME_SYSTEM: &str = "Invalid game system";

/// Returned when a string does not name a supported game system.
#[derive(Debug, Error)]
#[error("Unknown game system: {0}")]
pub struct UnknownGameSystem(pub String);

/// The closed set of supported game systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameSystem {
    Vampire,
    Werewolf,
    Mage,
    Changeling,
    Hunter,
    Dnd,
    Other,
}

impl GameSystem {
    pub const ALL: [GameSystem; 7] = [
        Self::Vampire,
        Self::Werewolf,
        Self::Mage,
        Self::Changeling,
        Self::Hunter,
        Self::Dnd,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vampire => "vampire",
            Self::Werewolf => "werewolf",
            Self::Mage => "mage",
            Self::Changeling => "changeling",
            Self::Hunter => "hunter",
            Self::Dnd => "dnd",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for GameSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameSystem {
    type Err = UnknownGameSystem;

    /// Case-insensitive; surrounding whitespace is not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|system| system.as_str() == lowered)
            .ok_or_else(|| UnknownGameSystem(s.to_string()))
    }
}

/// Raw campaign form input. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub game_system: Option<String>,
    pub setting: Option<String>,
}

/// The fields of a campaign that passed validation, sanitized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedCampaign {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_system: Option<GameSystem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setting: Option<String>,
}

/// Campaign fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignField {
    Name,
    GameSystem,
}

impl fmt::Display for CampaignField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::GameSystem => write!(f, "game_system"),
        }
    }
}

/// Outcome of validating a campaign draft. Valid iff there are no errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignValidation {
    valid: bool,
    errors: BTreeMap<CampaignField, String>,
    sanitized: SanitizedCampaign,
}

impl CampaignValidation {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &BTreeMap<CampaignField, String> {
        &self.errors
    }

    pub fn error(&self, field: CampaignField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn sanitized(&self) -> &SanitizedCampaign {
        &self.sanitized
    }

    pub fn into_sanitized(self) -> SanitizedCampaign {
        self.sanitized
    }
}

/// Validate a campaign draft field by field.
///
/// - `name` is required, must not be blank, and may be at most 100 UTF-16
///   code units.
/// - `game_system` is required and must name a [`GameSystem`], in any case.
/// - `description` and `setting` are optional and never fail; when present
///   and non-empty they are run through [`sanitize_description`].
pub fn validate_campaign_data(draft: &CampaignDraft) -> CampaignValidation {
    let mut errors = BTreeMap::new();
    let mut sanitized = SanitizedCampaign::default();

    match draft.name.as_deref() {
        None => {
            errors.insert(CampaignField::Name, CAMPAIGN_NAME_REQUIRED.to_string());
        }
        Some(name) if name.trim().is_empty() => {
            errors.insert(CampaignField::Name, CAMPAIGN_NAME_REQUIRED.to_string());
        }
        Some(name) if utf16_len(name) > MAX_NAME_CHARS => {
            errors.insert(CampaignField::Name, CAMPAIGN_NAME_TOO_LONG.to_string());
        }
        Some(name) => sanitized.name = Some(sanitize_name(name)),
    }

    if let Some(description) = non_empty(&draft.description) {
        sanitized.description = Some(sanitize_description(description));
    }

    match draft.game_system.as_deref().map(str::parse::<GameSystem>) {
        Some(Ok(system)) => sanitized.game_system = Some(system),
        _ => {
            errors.insert(CampaignField::GameSystem, INVALID_GAME_SYSTEM.to_string());
        }
    }

    if let Some(setting) = non_empty(&draft.setting) {
        sanitized.setting = Some(sanitize_description(setting));
    }

    CampaignValidation {
        valid: errors.is_empty(),
        errors,
        sanitized,
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
