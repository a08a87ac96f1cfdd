use std::str::FromStr;

use sangathan_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Organizational level a samiti committee operates at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitteeLevel {
    /// State-level committee.
    State,
    /// District-level committee.
    District,
    /// Division-level committee.
    Division,
    /// Booth-level committee.
    Booth,
}

impl CommitteeLevel {
    /// Returns a stable storage value for this level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::District => "district",
            Self::Division => "division",
            Self::Booth => "booth",
        }
    }
}

impl FromStr for CommitteeLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "state" => Ok(Self::State),
            "district" => Ok(Self::District),
            "division" => Ok(Self::Division),
            "booth" => Ok(Self::Booth),
            _ => Err(AppError::Validation(format!(
                "unknown committee level '{value}'"
            ))),
        }
    }
}

/// Samiti committee attached to an organizational unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Samiti {
    name: NonEmptyString,
    level: CommitteeLevel,
    unit_name: NonEmptyString,
    description: Option<String>,
}

impl Samiti {
    /// Creates a validated committee.
    pub fn new(
        name: impl Into<String>,
        level: CommitteeLevel,
        unit_name: impl Into<String>,
        description: Option<String>,
    ) -> AppResult<Self> {
        let description = description.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            name: NonEmptyString::new(name)?,
            level,
            unit_name: NonEmptyString::new(unit_name)?,
            description,
        })
    }

    /// Returns the committee name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the level the committee operates at.
    #[must_use]
    pub fn level(&self) -> CommitteeLevel {
        self.level
    }

    /// Returns the name of the unit the committee serves.
    #[must_use]
    pub fn unit_name(&self) -> &str {
        self.unit_name.as_str()
    }

    /// Returns an optional free-form description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{CommitteeLevel, Samiti};

    #[test]
    fn level_roundtrips_through_storage_value() {
        for level in [
            CommitteeLevel::State,
            CommitteeLevel::District,
            CommitteeLevel::Division,
            CommitteeLevel::Booth,
        ] {
            assert_eq!(CommitteeLevel::from_str(level.as_str()).ok(), Some(level));
        }
    }

    #[test]
    fn blank_description_is_dropped() {
        let samiti = Samiti::new("Yuva Samiti", CommitteeLevel::District, "Nashik", Some("  ".to_owned()));
        assert_eq!(samiti.ok().and_then(|s| s.description().map(str::to_owned)), None);
    }

    #[test]
    fn committee_requires_a_unit() {
        assert!(Samiti::new("Yuva Samiti", CommitteeLevel::Booth, "", None).is_err());
    }
}
