//! Screening and scoring results
//!
//! These types are decoded from model output, so decoding is lenient: unknown
//! enum strings fall back to the catch-all variant, scores accept numbers or
//! numeric strings and are clamped to 0-100, and null text becomes empty.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Rule that disqualified a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisqualifierType {
    WorkersComp,
    CurrentRepresentation,
    StatuteExpired,
    Jurisdiction,
    MinimalCase,
    #[default]
    None,
}

impl DisqualifierType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisqualifierType::WorkersComp => "workers_comp",
            DisqualifierType::CurrentRepresentation => "current_representation",
            DisqualifierType::StatuteExpired => "statute_expired",
            DisqualifierType::Jurisdiction => "jurisdiction",
            DisqualifierType::MinimalCase => "minimal_case",
            DisqualifierType::None => "none",
        }
    }

    /// Case-insensitive parse; anything unrecognised is `None`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "workers_comp" => DisqualifierType::WorkersComp,
            "current_representation" => DisqualifierType::CurrentRepresentation,
            "statute_expired" => DisqualifierType::StatuteExpired,
            "jurisdiction" => DisqualifierType::Jurisdiction,
            "minimal_case" => DisqualifierType::MinimalCase,
            _ => DisqualifierType::None,
        }
    }
}

impl Serialize for DisqualifierType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DisqualifierType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|v| Self::parse(&v)).unwrap_or_default())
    }
}

/// Outcome of the disqualification screen
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default, deserialize_with = "flag")]
    pub disqualified: bool,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub reason: String,
    #[serde(default)]
    pub disqualifier_type: DisqualifierType,
}

impl Verdict {
    /// A non-disqualifying verdict carrying an explanation
    pub fn cleared(reason: impl Into<String>) -> Self {
        Self {
            disqualified: false,
            reason: reason.into(),
            disqualifier_type: DisqualifierType::None,
        }
    }

    pub fn disqualify(disqualifier_type: DisqualifierType, reason: impl Into<String>) -> Self {
        Self {
            disqualified: true,
            reason: reason.into(),
            disqualifier_type,
        }
    }
}

/// Priority tier assigned by the scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum PriorityLevel {
    Urgent,
    High,
    Medium,
    Low,
    Unlikely,
    #[default]
    Unknown,
}

impl PriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Urgent => "URGENT",
            PriorityLevel::High => "HIGH",
            PriorityLevel::Medium => "MEDIUM",
            PriorityLevel::Low => "LOW",
            PriorityLevel::Unlikely => "UNLIKELY",
            PriorityLevel::Unknown => "UNKNOWN",
        }
    }

    /// Case-insensitive parse; anything unrecognised is `Unknown`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "URGENT" => PriorityLevel::Urgent,
            "HIGH" => PriorityLevel::High,
            "MEDIUM" => PriorityLevel::Medium,
            "LOW" => PriorityLevel::Low,
            "UNLIKELY" => PriorityLevel::Unlikely,
            _ => PriorityLevel::Unknown,
        }
    }

    /// When staff will reach out, as promised in the qualification summary
    pub fn response_window(&self) -> &'static str {
        match self {
            PriorityLevel::Urgent => "within 2 hours during business hours",
            PriorityLevel::High => "within 24 hours",
            PriorityLevel::Medium => "within 2-3 business days",
            _ => "within a week",
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PriorityLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PriorityLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|v| Self::parse(&v)).unwrap_or_default())
    }
}

/// Per-dimension scores, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreComponents {
    #[serde(default, deserialize_with = "score")]
    pub injury: u8,
    #[serde(default, deserialize_with = "score")]
    pub liability: u8,
    #[serde(default, deserialize_with = "score")]
    pub damages: u8,
    #[serde(default, deserialize_with = "score")]
    pub documentation: u8,
}

/// Case priority assessment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriorityScore {
    #[serde(default, deserialize_with = "score")]
    pub total_score: u8,
    #[serde(default)]
    pub priority_level: PriorityLevel,
    #[serde(default, deserialize_with = "components_or_default")]
    pub components: ScoreComponents,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub case_type: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub suggested_action: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub estimated_value_range: String,
    #[serde(default, deserialize_with = "flag")]
    pub matches_firm_specialty: bool,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub specialty_matched: String,
}

impl PriorityScore {
    /// `{UNKNOWN, 0}`, used when scoring fails
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_unlikely(&self) -> bool {
        self.priority_level == PriorityLevel::Unlikely
    }
}

/// Verdict of the content safety screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyCheck {
    pub safe: bool,
    #[serde(default)]
    pub flagged_categories: Vec<String>,
}

impl SafetyCheck {
    pub fn safe() -> Self {
        Self {
            safe: true,
            flagged_categories: Vec::new(),
        }
    }

    pub fn flagged(categories: Vec<String>) -> Self {
        Self {
            safe: false,
            flagged_categories: categories,
        }
    }
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(raw
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0))
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn components_or_default<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<ScoreComponents, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
