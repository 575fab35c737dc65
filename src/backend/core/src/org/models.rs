//! Organization data models: unit identifiers, unit records, rank levels, and risk bands.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ═══════════════════════════════════════════════════════════════════════════════

/// Strongly-typed unit identifier.
///
/// Borrows as `&str`, so maps keyed by `UnitId` can be queried with plain
/// string slices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UnitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for UnitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UnitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for UnitId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UnitId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Levels
// ═══════════════════════════════════════════════════════════════════════════════

/// Rank label of a unit within the chain of command.
///
/// Purely descriptive: scoping is derived from tree structure, never from
/// this label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitLevel {
    Headquarters,
    Command,
    Corps,
    Division,
    Brigade,
    Regiment,
    Battalion,
    Company,
}

impl UnitLevel {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Headquarters => "Headquarters",
            Self::Command => "Command",
            Self::Corps => "Corps",
            Self::Division => "Division",
            Self::Brigade => "Brigade",
            Self::Regiment => "Regiment",
            Self::Battalion => "Battalion",
            Self::Company => "Company",
        }
    }
}

impl fmt::Display for UnitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Risk
// ═══════════════════════════════════════════════════════════════════════════════

/// Coarse classification of a unit's 0-100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    /// Below 25.
    Safe,
    /// 25 up to 50.
    Attention,
    /// 50 up to 75.
    Caution,
    /// 75 and above.
    Warning,
}

impl RiskBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            75..=u8::MAX => Self::Warning,
            50..=74 => Self::Caution,
            25..=49 => Self::Attention,
            _ => Self::Safe,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Attention => "Attention",
            Self::Caution => "Caution",
            Self::Warning => "Warning",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Unit
// ═══════════════════════════════════════════════════════════════════════════════

/// A node in the organization tree.
///
/// Everything besides `id`, `name`, and `parent_id` is payload carried
/// through lookups for display; the access engine never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique unit identifier.
    pub id: UnitId,
    /// Display name.
    pub name: String,
    /// Immediate parent, `None` for the root.
    #[serde(default, alias = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<UnitId>,
    /// Rank label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<UnitLevel>,
    /// Branch or unit type (infantry, armor, ...).
    #[serde(default, alias = "unitType", skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<String>,
    /// Garrison region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Current risk score, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<u8>,
    /// Any further attributes supplied by the data source.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Unit {
    /// Create a unit with only the structural fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: UnitId::new(id),
            name: name.into(),
            parent_id: None,
            level: None,
            unit_type: None,
            region: None,
            risk: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Attach this unit under a parent.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(UnitId::new(parent_id));
        self
    }

    pub fn with_level(mut self, level: UnitLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_risk(mut self, risk: u8) -> Self {
        self.risk = Some(risk.min(100));
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn risk_band(&self) -> Option<RiskBand> {
        self.risk.map(RiskBand::from_score)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_unit_id_borrows_as_str() {
        let mut map = HashMap::new();
        map.insert(UnitId::new("div-1"), 1);
        assert_eq!(map.get("div-1"), Some(&1));
        assert_eq!(UnitId::new("div-1"), "div-1");
    }

    #[test]
    fn test_risk_band_thresholds() {
        assert_eq!(RiskBand::from_score(0), RiskBand::Safe);
        assert_eq!(RiskBand::from_score(24), RiskBand::Safe);
        assert_eq!(RiskBand::from_score(25), RiskBand::Attention);
        assert_eq!(RiskBand::from_score(50), RiskBand::Caution);
        assert_eq!(RiskBand::from_score(74), RiskBand::Caution);
        assert_eq!(RiskBand::from_score(75), RiskBand::Warning);
        assert_eq!(RiskBand::from_score(100), RiskBand::Warning);
    }

    #[test]
    fn test_unit_deserialize_accepts_camel_case_parent() {
        let unit: Unit = serde_json::from_str(
            r#"{"id":"bn-1-1","name":"1st Battalion","parentId":"div-1","unitType":"infantry","commander":"Lt. Col. Choi"}"#,
        )
        .unwrap();

        assert_eq!(unit.parent_id, Some(UnitId::new("div-1")));
        assert_eq!(unit.unit_type.as_deref(), Some("infantry"));
        assert_eq!(unit.extra.get("commander").and_then(|v| v.as_str()), Some("Lt. Col. Choi"));
        assert!(unit.risk_band().is_none());
    }

    #[test]
    fn test_unit_builder() {
        let unit = Unit::new("div-1", "1st Division")
            .with_parent("corps-1")
            .with_level(UnitLevel::Division)
            .with_risk(130);

        assert!(!unit.is_root());
        assert_eq!(unit.risk, Some(100));
        assert_eq!(unit.risk_band(), Some(RiskBand::Warning));
        assert_eq!(unit.level.map(|l| l.label()), Some("Division"));
    }
}
