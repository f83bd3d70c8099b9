//! vote-core
//!
//! Pure voting state machine:
//! - connection registry (who is online, which color they hold)
//! - identity resolution policy (connection-scoped vs color-scoped)
//! - vote store (group -> attribution key -> option)
//! - broadcast coordinator (turns input events into snapshot events)

pub mod connection;
pub mod registry;
pub mod identity;
pub mod vote_store;
pub mod messages;
pub mod coordinator;
pub mod error;

pub use connection::{Connection, ConnectionId};
pub use registry::{ConnectionRegistry, UsersSnapshot};
pub use identity::{ColorScoped, ConnectionScoped, IdentityMode, IdentityPolicy};
pub use vote_store::{GroupVotes, VoteChange, VoteStore, VotesSnapshot};

pub use messages::{
    Audience,
    InputMessage,
    OutputMessage,
    SetColor,
    Vote,
    VoteUpdate,
};

pub use coordinator::VoteCoordinator;
pub use error::CoreError;
