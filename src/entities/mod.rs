//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod assignment;
pub mod event;
pub mod friendship;
pub mod list_collaborator;
pub mod notification;
pub mod participant;
pub mod user;
pub mod wishlist;

// Re-export specific types to avoid conflicts
pub use assignment::{Column as AssignmentColumn, Entity as Assignment, Model as AssignmentModel};
pub use event::{Column as EventColumn, Entity as Event, EventStatus, Model as EventModel};
pub use friendship::{
    Column as FriendshipColumn, Entity as Friendship, FriendshipStatus, Model as FriendshipModel,
};
pub use list_collaborator::{
    Column as ListCollaboratorColumn, Entity as ListCollaborator, Model as ListCollaboratorModel,
};
pub use notification::{
    Column as NotificationColumn, Entity as Notification, Model as NotificationModel,
};
pub use participant::{
    Column as ParticipantColumn, Entity as Participant, Model as ParticipantModel,
    ParticipantStatus,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use wishlist::{Column as WishlistColumn, Entity as Wishlist, Model as WishlistModel};
