//! Index creation
//!
//! Unique indexes back the uniqueness rules the services check up front,
//! so concurrent writers still cannot slip a duplicate in.

use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Database, IndexModel,
};
use tracing::info;

use crate::error::Result;

fn unique(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().name(name.to_string()).unique(true).build())
        .build()
}

fn plain(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().name(name.to_string()).build())
        .build()
}

/// Ensure all required indexes exist. Called on startup.
pub async fn ensure_indexes(db: &Database) -> Result<()> {
    let plan: Vec<(&str, Vec<IndexModel>)> = vec![
        (
            "users",
            vec![
                unique(doc! { "email": 1 }, "email_1"),
                unique(doc! { "phone": 1 }, "phone_1"),
            ],
        ),
        ("participants", vec![unique(doc! { "user_id": 1 }, "user_id_1")]),
        ("organizers", vec![unique(doc! { "user_id": 1 }, "user_id_1")]),
        ("companies", vec![unique(doc! { "slug": 1 }, "slug_1")]),
        ("topics", vec![unique(doc! { "name": 1 }, "name_1")]),
        (
            "events",
            vec![
                unique(doc! { "slug": 1 }, "slug_1"),
                plain(doc! { "company_id": 1 }, "idx_company"),
                plain(doc! { "organizer_id": 1 }, "idx_organizer"),
                plain(doc! { "event_start_date": -1, "event_start_time": 1 }, "idx_schedule"),
            ],
        ),
        (
            "registrations",
            vec![
                unique(
                    doc! { "participant_id": 1, "event_id": 1 },
                    "participant_id_1_event_id_1",
                ),
                plain(doc! { "event_id": 1, "status": 1 }, "idx_event_status"),
            ],
        ),
    ];

    for (collection, models) in plan {
        db.collection::<Document>(collection)
            .create_indexes(models)
            .await?;
        info!(collection, "Ensured indexes");
    }
    Ok(())
}
