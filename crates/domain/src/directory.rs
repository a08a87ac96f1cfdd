//! Geographic directory units managed by the dashboard.
//!
//! A state contains districts, a district contains divisions, and a
//! division contains polling booths. Parent references are validated at the
//! service layer; the types here enforce field-level invariants only.

use sangathan_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level state unit, keyed by a short uppercase code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUnit {
    code: NonEmptyString,
    name: NonEmptyString,
}

impl StateUnit {
    /// Creates a validated state unit. The code is normalized to uppercase.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> AppResult<Self> {
        let code = code.into().trim().to_uppercase();
        if code.len() < 2 || code.len() > 8 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(AppError::Validation(
                "state code must be 2-8 ASCII letters".to_owned(),
            ));
        }

        Ok(Self {
            code: NonEmptyString::new(code)?,
            name: NonEmptyString::new(name)?,
        })
    }

    /// Returns the stable state code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Returns the state display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Administrative district within a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    name: NonEmptyString,
    state_code: NonEmptyString,
}

impl District {
    /// Creates a validated district.
    pub fn new(name: impl Into<String>, state_code: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            state_code: NonEmptyString::new(state_code.into().trim().to_uppercase())?,
        })
    }

    /// Returns the district name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the code of the parent state.
    #[must_use]
    pub fn state_code(&self) -> &str {
        self.state_code.as_str()
    }
}

/// Organizational division within a district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    name: NonEmptyString,
    district_id: Uuid,
}

impl Division {
    /// Creates a validated division.
    pub fn new(name: impl Into<String>, district_id: Uuid) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            district_id,
        })
    }

    /// Returns the division name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the parent district identifier.
    #[must_use]
    pub fn district_id(&self) -> Uuid {
        self.district_id
    }
}

/// Polling booth within a division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booth {
    number: i32,
    name: NonEmptyString,
    division_id: Uuid,
}

impl Booth {
    /// Creates a validated booth. Booth numbers are positive.
    pub fn new(
        number: i32,
        name: impl Into<String>,
        division_id: Uuid,
    ) -> AppResult<Self> {
        if number <= 0 {
            return Err(AppError::Validation(
                "booth number must be positive".to_owned(),
            ));
        }

        Ok(Self {
            number,
            name: NonEmptyString::new(name)?,
            division_id,
        })
    }

    /// Returns the booth number unique within its division.
    #[must_use]
    pub fn number(&self) -> i32 {
        self.number
    }

    /// Returns the booth name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the parent division identifier.
    #[must_use]
    pub fn division_id(&self) -> Uuid {
        self.division_id
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{Booth, District, StateUnit};

    #[test]
    fn state_code_is_normalized_to_uppercase() {
        let state = StateUnit::new("mh", "Maharashtra");
        assert_eq!(state.map(|unit| unit.code().to_owned()).ok().as_deref(), Some("MH"));
    }

    #[test]
    fn numeric_state_code_is_rejected() {
        assert!(StateUnit::new("M1", "Maharashtra").is_err());
    }

    #[test]
    fn district_normalizes_parent_code() {
        let district = District::new("Nashik", " mh ");
        assert_eq!(
            district.map(|unit| unit.state_code().to_owned()).ok().as_deref(),
            Some("MH")
        );
    }

    #[test]
    fn booth_number_must_be_positive() {
        assert!(Booth::new(0, "Ward 4 School", Uuid::new_v4()).is_err());
        assert!(Booth::new(104, "Ward 4 School", Uuid::new_v4()).is_ok());
    }
}
