use chrono::{DateTime, Utc};
use sangathan_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Organizational event shown on the dashboard calendar surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgEvent {
    title: NonEmptyString,
    venue: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
    description: Option<String>,
}

impl OrgEvent {
    /// Creates a validated event. When an end time is given it must be
    /// strictly after the start time.
    pub fn new(
        title: impl Into<String>,
        venue: Option<String>,
        starts_at: DateTime<Utc>,
        ends_at: Option<DateTime<Utc>>,
        description: Option<String>,
    ) -> AppResult<Self> {
        if let Some(ends_at) = ends_at
            && ends_at <= starts_at
        {
            return Err(AppError::Validation(
                "event end time must be after the start time".to_owned(),
            ));
        }

        let venue = venue.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });
        let description = description.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            title: NonEmptyString::new(title)?,
            venue,
            starts_at,
            ends_at,
            description,
        })
    }

    /// Returns the event title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the venue, if recorded.
    #[must_use]
    pub fn venue(&self) -> Option<&str> {
        self.venue.as_deref()
    }

    /// Returns the start time.
    #[must_use]
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    /// Returns the optional end time.
    #[must_use]
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.ends_at
    }

    /// Returns an optional free-form description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::OrgEvent;

    #[test]
    fn end_before_start_is_rejected() {
        let starts_at = Utc::now();
        let event = OrgEvent::new(
            "Booth Worker Meeting",
            None,
            starts_at,
            Some(starts_at - Duration::hours(1)),
            None,
        );
        assert!(event.is_err());
    }

    #[test]
    fn open_ended_event_is_accepted() {
        let event = OrgEvent::new("Booth Worker Meeting", None, Utc::now(), None, None);
        assert!(event.is_ok());
    }

    #[test]
    fn zero_length_event_is_rejected() {
        let starts_at = Utc::now();
        let event = OrgEvent::new("Rally", None, starts_at, Some(starts_at), None);
        assert!(event.is_err());
    }
}
