//! Broadcast coordinator.
//!
//! Owns the [`ConnectionRegistry`] and the [`VoteStore`] and is the only
//! thing allowed to mutate them. Every input is applied to completion
//! before the resulting snapshots are computed, so no output ever
//! reflects state older than the event that produced it.
//!
//! Outputs per input:
//! - `Connect`      => `UserCount`, `UsersUpdate`
//! - `Disconnect`   => `UserCount`, `UsersUpdate`
//! - `SetColor`     => `UsersUpdate`, `SyncVotes` (to the claimant)
//! - `RequestVotes` => `SyncVotes` (to the requester)
//! - `Vote`         => `VoteUpdate`, or nothing if the voter has no key
//!
//! Events from connections the registry doesn't know produce nothing.

use tracing::debug;

use crate::connection::ConnectionId;
use crate::identity::{IdentityMode, IdentityPolicy};
use crate::messages::{InputMessage, OutputMessage, SetColor, Vote, VoteUpdate};
use crate::registry::{ConnectionRegistry, UsersSnapshot};
use crate::vote_store::VoteStore;

#[derive(Debug)]
pub struct VoteCoordinator {
    registry: ConnectionRegistry,
    votes: VoteStore,
    policy: Box<dyn IdentityPolicy + Send>,
}

impl VoteCoordinator {
    /// Create an empty coordinator running the given identity mode.
    pub fn new(mode: IdentityMode) -> Self {
        VoteCoordinator::with_policy(mode.policy())
    }

    pub fn with_policy(policy: Box<dyn IdentityPolicy + Send>) -> Self {
        VoteCoordinator {
            registry: ConnectionRegistry::new(),
            votes: VoteStore::new(),
            policy,
        }
    }

    pub fn mode(&self) -> IdentityMode {
        self.policy.mode()
    }

    /// Apply one input from `id` and return the events to deliver.
    pub fn process_message(&mut self, id: ConnectionId, msg: InputMessage) -> Vec<OutputMessage> {
        match msg {
            InputMessage::Connect => self.process_connect(id),
            InputMessage::Disconnect => self.process_disconnect(id),
            InputMessage::SetColor(claim) => self.process_set_color(id, claim),
            InputMessage::RequestVotes => self.process_request_votes(id),
            InputMessage::Vote(vote) => self.process_vote(id, vote),
        }
    }

    // -------------------------------------------------------------------------
    // Internal handlers
    // -------------------------------------------------------------------------

    fn process_connect(&mut self, id: ConnectionId) -> Vec<OutputMessage> {
        if !self.registry.on_connect(id) {
            return Vec::new();
        }

        vec![
            OutputMessage::UserCount(self.registry.count()),
            OutputMessage::UsersUpdate(self.users_snapshot()),
        ]
    }

    /// Under connection identity the departed connection's votes are
    /// deleted without a vote broadcast; clients re-request votes after
    /// the `users-update`.
    fn process_disconnect(&mut self, id: ConnectionId) -> Vec<OutputMessage> {
        if self.registry.on_disconnect(id).is_none() {
            return Vec::new();
        }

        let removed = self.policy.on_disconnect(&mut self.votes, id);
        if removed > 0 {
            debug!(conn = %id, removed, "votes dropped with connection");
        }

        vec![
            OutputMessage::UserCount(self.registry.count()),
            OutputMessage::UsersUpdate(self.users_snapshot()),
        ]
    }

    fn process_set_color(&mut self, id: ConnectionId, claim: SetColor) -> Vec<OutputMessage> {
        if !self.registry.contains(id) {
            return Vec::new();
        }

        let color = Some(claim.color).filter(|c| !c.is_empty());
        let revoked = self.policy.claim_color(&mut self.registry, id, color);
        for other in revoked {
            debug!(from = %other, to = %id, color = ?self.registry.color_of(id), "color taken over");
        }

        vec![
            OutputMessage::UsersUpdate(self.users_snapshot()),
            OutputMessage::SyncVotes(self.votes.get_all().clone()),
        ]
    }

    fn process_request_votes(&mut self, id: ConnectionId) -> Vec<OutputMessage> {
        if !self.registry.contains(id) {
            return Vec::new();
        }

        vec![OutputMessage::SyncVotes(self.votes.get_all().clone())]
    }

    fn process_vote(&mut self, id: ConnectionId, vote: Vote) -> Vec<OutputMessage> {
        // Unknown connection, or a colorless one under color identity.
        let Some(key) = self.policy.attribution_key(&self.registry, id) else {
            return Vec::new();
        };

        let option = vote.option.filter(|o| !o.is_empty());
        self.votes.set_vote(&vote.group, &key, option.as_deref());

        vec![OutputMessage::VoteUpdate(VoteUpdate {
            group: vote.group,
            option,
            key,
            color: self.registry.color_of(id).map(str::to_owned),
            all_votes: self.votes.get_all().clone(),
            users: self.users_snapshot(),
        })]
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn users_snapshot(&self) -> UsersSnapshot {
        self.registry.snapshot()
    }

    /// For tests or admin queries: the connection registry.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// For tests or admin queries: the vote store.
    pub fn votes(&self) -> &VoteStore {
        &self.votes
    }

    /// Number of live connections.
    pub fn count(&self) -> usize {
        self.registry.count()
    }
}
