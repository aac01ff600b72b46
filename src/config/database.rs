//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`; the composite unique constraints the
//! exchange relies on (one membership per user and event, one assignment per giver
//! and per receiver) are added as separate indexes.

use crate::entities::{
    Assignment, AssignmentColumn, Event, Friendship, FriendshipColumn, ListCollaborator,
    ListCollaboratorColumn, Notification, Participant, ParticipantColumn, User, Wishlist,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables and unique indexes if they do not exist yet.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, User).await?;
    create_table(db, Friendship).await?;
    create_table(db, Wishlist).await?;
    create_table(db, ListCollaborator).await?;
    create_table(db, Event).await?;
    create_table(db, Participant).await?;
    create_table(db, Assignment).await?;
    create_table(db, Notification).await?;

    let builder = db.get_database_backend();
    for index in unique_indexes() {
        db.execute(builder.build(&index)).await?;
    }

    info!("Database tables ensured.");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}

fn unique_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_participants_event_user")
            .table(Participant)
            .col(ParticipantColumn::EventId)
            .col(ParticipantColumn::UserId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_assignments_event_giver")
            .table(Assignment)
            .col(AssignmentColumn::EventId)
            .col(AssignmentColumn::GiverId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_assignments_event_receiver")
            .table(Assignment)
            .col(AssignmentColumn::EventId)
            .col(AssignmentColumn::ReceiverId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_list_collaborators_list_user")
            .table(ListCollaborator)
            .col(ListCollaboratorColumn::ListId)
            .col(ListCollaboratorColumn::UserId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_friendships_pair")
            .table(Friendship)
            .col(FriendshipColumn::RequesterId)
            .col(FriendshipColumn::AddresseeId)
            .unique()
            .if_not_exists()
            .to_owned(),
    ]
}
