pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use domain::error::{DomainError, EntityKind};
pub use domain::model::{Campus, Pos, PosType, Review, ReviewDraft, User};
pub use domain::pos::PosService;
pub use domain::reviews::{ApprovalConfig, ReviewService};
pub use domain::users::UserService;
