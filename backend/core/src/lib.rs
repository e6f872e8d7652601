pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::BridgeError;
pub use memory::{
    AccountEntry, InMemoryRoster, RecordingChannel, RecordingSender, RecordingSession, Report, RosterSnapshot,
    SessionEvent,
};
pub use traits::{
    ControlChannel, IdentityResolver, MessageSender, RosterService, Services, SessionController,
};
pub use types::{
    Category, Discussion, DiscussionRoster, Friend, FriendRoster, Group, GroupRoster, IdKind,
    Presence, RefreshOutcome, ResolvedId,
};
