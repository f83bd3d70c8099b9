//! Vote storage: group -> attribution key -> option.
//!
//! Groups are created lazily on the first recorded vote and are never
//! removed, so a group whose last vote was cleared stays behind as an
//! empty map. A key is present in a group iff it has a non-empty
//! selection there; deselection removes the entry.

use std::collections::BTreeMap;

/// Votes within a single group: attribution key -> option.
pub type GroupVotes = BTreeMap<String, String>;

/// Every group's votes. This is also the `sync-votes` payload.
pub type VotesSnapshot = BTreeMap<String, GroupVotes>;

/// Outcome of [`VoteStore::set_vote`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VoteChange {
    /// A new option was stored (fresh vote or a changed selection).
    Recorded,

    /// An existing vote was removed.
    Cleared,

    /// The store already held exactly this state.
    Unchanged,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VoteStore {
    votes: VotesSnapshot,
}

impl VoteStore {
    pub fn new() -> Self {
        VoteStore::default()
    }

    /// Set or clear the vote of `key` in `group`.
    ///
    /// - non-empty `option`: store it, creating the group if needed.
    /// - `None` or `""`: remove the key from the group (no-op if absent;
    ///   does not create the group).
    pub fn set_vote(&mut self, group: &str, key: &str, option: Option<&str>) -> VoteChange {
        match option.filter(|o| !o.is_empty()) {
            Some(option) => {
                let group_votes = self.votes.entry(group.to_string()).or_default();
                match group_votes.insert(key.to_string(), option.to_string()) {
                    Some(previous) if previous == option => VoteChange::Unchanged,
                    _ => VoteChange::Recorded,
                }
            }
            None => {
                if self.clear_key(group, key) {
                    VoteChange::Cleared
                } else {
                    VoteChange::Unchanged
                }
            }
        }
    }

    /// Full current mapping.
    pub fn get_all(&self) -> &VotesSnapshot {
        &self.votes
    }

    /// Option chosen by `key` in `group`, if any.
    pub fn get(&self, group: &str, key: &str) -> Option<&str> {
        self.votes.get(group)?.get(key).map(String::as_str)
    }

    pub fn group(&self, group: &str) -> Option<&GroupVotes> {
        self.votes.get(group)
    }

    /// Number of groups ever voted in (including emptied ones).
    pub fn num_groups(&self) -> usize {
        self.votes.len()
    }

    /// Remove `key`'s vote from one group. Returns whether a record existed.
    pub fn clear_key(&mut self, group: &str, key: &str) -> bool {
        self.votes
            .get_mut(group)
            .and_then(|group_votes| group_votes.remove(key))
            .is_some()
    }

    /// Remove `key`'s vote from every group. Returns how many records were removed.
    pub fn clear_key_everywhere(&mut self, key: &str) -> usize {
        self.votes
            .values_mut()
            .filter_map(|group_votes| group_votes.remove(key))
            .count()
    }
}
