//! Domain model (IDs, records, write payloads, errors, events).
//!
//! - ids: phantom-typed identifiers
//! - status: publication status / work type
//! - kind: `ResourceKind` trait と `Draft` / `Patch`
//! - post, work: the two resource kinds
//! - slug: slug derivation for posts
//! - errors, events

pub mod errors;
pub mod events;
pub mod ids;
pub mod kind;
pub mod post;
pub mod slug;
pub mod status;
pub mod work;

pub use self::errors::{ErrorInfo, StoreError, StoreErrorKind, SyncError};
pub use self::events::{MutationOp, SyncEvent};
pub use self::ids::{Id, IdMarker, User, UserId};
pub use self::kind::{Draft, Patch, ResourceKind, Row, timestamp_value, to_row};
pub use self::post::{BlogPost, Post, PostDraft, PostFields, PostId, PostPatch, PostPatchFields};
pub use self::slug::slugify_title;
pub use self::status::{PublicationStatus, WorkType};
pub use self::work::{LiteraryWork, Work, WorkDraft, WorkFields, WorkId, WorkPatch, WorkPatchFields};
