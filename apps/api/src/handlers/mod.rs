pub mod committees;
pub mod directory;
pub mod events;
pub mod health;
pub mod navigation;
pub mod security;
pub mod users;

use sangathan_core::AppError;
use uuid::Uuid;

pub(crate) fn parse_uuid(value: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value)
        .map_err(|error| AppError::Validation(format!("invalid {what} id '{value}': {error}")))
}
