//! MongoDB repositories

mod catalog;
mod events;
pub mod indexes;
mod registrations;
mod users;

pub use catalog::{MongoCompanyRepository, MongoTopicRepository};
pub use events::MongoEventRepository;
pub use registrations::MongoRegistrationRepository;
pub use users::{MongoOrganizerRepository, MongoParticipantRepository, MongoUserRepository};

use mongodb::error::{ErrorKind, WriteFailure};

use crate::error::PlatformError;

const DUPLICATE_KEY_CODE: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY_CODE
    )
}

/// Map a write error, turning unique index violations into `Duplicate`.
///
/// `fields` pairs each unique field of the collection with the value being
/// written; the field whose index name shows up in the server message wins.
fn map_write_error(
    err: mongodb::error::Error,
    entity_type: &str,
    fields: &[(&str, &str)],
) -> PlatformError {
    if !is_duplicate_key(&err) {
        return PlatformError::Database(err);
    }
    let message = err.to_string();
    let (field, value) = fields
        .iter()
        .find(|(field, _)| message.contains(&format!("{}_1", field)))
        .or_else(|| fields.first())
        .copied()
        .unwrap_or(("id", ""));
    PlatformError::duplicate(entity_type, field, value)
}
