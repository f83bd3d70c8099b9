//! Terse text commands.
//!
//! A human-friendly spelling of the input events, used by the example
//! client and by session replay files. Tokens are separated by
//! whitespace.
//!
//! Input format (line -> `InputMessage`):
//!
//! - `connect` / `disconnect` (replay only; not sendable over the wire)
//! - `color <color>`   claim a color; bare `color` drops the current one
//! - `sync`            request the vote table
//! - `vote <group> <option>`
//! - `unvote <group>`  deselect (same as `vote <group>`)
//!
//! Output format (`OutputMessage` -> line):
//!
//! - UserCount:   `count <n>`
//! - UsersUpdate: `users 1:red 2:-`
//! - SyncVotes:   `sync g1{blue=no,red=yes} g2{}`
//! - VoteUpdate:  `voted <group> <key>=<option or ->`

use vote_core::{InputMessage, OutputMessage, SetColor, Vote, VotesSnapshot};

/// Parse a single command line into an `InputMessage`.
///
/// Returns `None` for blank lines, comments (starting with `#`) and
/// anything that doesn't parse.
pub fn parse_command_line(line: &str) -> Option<InputMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();

    match (tokens[0], &tokens[1..]) {
        ("connect", []) => Some(InputMessage::Connect),
        ("disconnect", []) => Some(InputMessage::Disconnect),
        ("sync", []) => Some(InputMessage::RequestVotes),
        ("color", []) => Some(set_color("")),
        ("color", [color]) => Some(set_color(color)),
        ("vote", [group]) | ("unvote", [group]) => Some(vote(group, None)),
        ("vote", [group, option]) => Some(vote(group, Some(*option))),
        _ => None,
    }
}

/// Format an `OutputMessage` as a one-line summary.
pub fn format_output_summary(msg: &OutputMessage) -> String {
    match msg {
        OutputMessage::UserCount(n) => format!("count {}", n),
        OutputMessage::UsersUpdate(users) => {
            let mut line = String::from("users");
            for (id, color) in users {
                line.push_str(&format!(" {}:{}", id, color.as_deref().unwrap_or("-")));
            }
            line
        }
        OutputMessage::SyncVotes(votes) => format!("sync{}", format_votes(votes)),
        OutputMessage::VoteUpdate(update) => format!(
            "voted {} {}={}",
            update.group,
            update.key,
            update.option.as_deref().unwrap_or("-")
        ),
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn set_color(color: &str) -> InputMessage {
    InputMessage::SetColor(SetColor {
        color: color.to_string(),
    })
}

fn vote(group: &str, option: Option<&str>) -> InputMessage {
    InputMessage::Vote(Vote {
        group: group.to_string(),
        option: option.map(str::to_string),
    })
}

fn format_votes(votes: &VotesSnapshot) -> String {
    let mut out = String::new();
    for (group, group_votes) in votes {
        let entries: Vec<String> = group_votes
            .iter()
            .map(|(key, option)| format!("{}={}", key, option))
            .collect();
        out.push_str(&format!(" {}{{{}}}", group, entries.join(",")));
    }
    out
}
