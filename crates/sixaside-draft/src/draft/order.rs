// Draft order: the fixed team sequence a session snakes through.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::DraftError;
use super::sequencer::{compute_on_clock, Clock};
use crate::league::Team;

/// One slot of a session's draft order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub session_id: String,
    /// 1-based position in the first round.
    pub order_index: u32,
    pub team_id: String,
    /// Display name of the team.
    pub team_name: String,
    /// User who manages the team.
    pub manager_id: String,
}

/// A validated draft order: indices are exactly 1..=N in sequence and every
/// team appears once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftOrder {
    entries: Vec<OrderEntry>,
}

impl DraftOrder {
    /// Build the order for a new session from teams already sorted the way
    /// they should pick in round one.
    pub fn from_teams(session_id: &str, teams: &[Team]) -> Self {
        let entries = teams
            .iter()
            .enumerate()
            .map(|(idx, team)| OrderEntry {
                session_id: session_id.to_string(),
                order_index: idx as u32 + 1,
                team_id: team.id.clone(),
                team_name: team.name.clone(),
                manager_id: team.user_id.clone(),
            })
            .collect();
        DraftOrder { entries }
    }

    /// Rebuild an order from persisted entries (sorted by index), checking
    /// that the permutation is still dense and duplicate-free.
    pub fn from_entries(session_id: &str, entries: Vec<OrderEntry>) -> Result<Self, DraftError> {
        let corrupt = |reason: String| DraftError::CorruptOrder {
            session_id: session_id.to_string(),
            reason,
        };

        if entries.is_empty() {
            return Err(corrupt("no order entries".into()));
        }

        let mut seen = HashSet::new();
        for (idx, entry) in entries.iter().enumerate() {
            let expected = idx as u32 + 1;
            if entry.order_index != expected {
                return Err(corrupt(format!(
                    "expected order index {expected}, found {}",
                    entry.order_index
                )));
            }
            if !seen.insert(entry.team_id.as_str()) {
                return Err(corrupt(format!("team {} appears twice", entry.team_id)));
            }
        }

        Ok(DraftOrder { entries })
    }

    pub fn entries(&self) -> &[OrderEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<OrderEntry> {
        self.entries
    }

    /// The entry on the clock after `picks_so_far` picks.
    pub fn on_clock(&self, picks_so_far: u32, picks_per_team: u32) -> Clock<&OrderEntry> {
        compute_on_clock(&self.entries, picks_so_far, picks_per_team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn teams(ids: &[&str]) -> Vec<Team> {
        ids.iter()
            .map(|id| Team {
                id: id.to_string(),
                league_id: "l1".into(),
                user_id: format!("user-{id}"),
                name: format!("{id} FC"),
                created_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn from_teams_assigns_dense_indices() {
        let order = DraftOrder::from_teams("s1", &teams(&["a", "b", "c"]));
        let indices: Vec<u32> = order.entries().iter().map(|e| e.order_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(order.entries()[1].manager_id, "user-b");
        assert_eq!(order.entries().len(), 3);
    }

    #[test]
    fn from_entries_accepts_valid_order() {
        let built = DraftOrder::from_teams("s1", &teams(&["a", "b"]));
        let rebuilt = DraftOrder::from_entries("s1", built.clone().into_entries()).unwrap();
        assert_eq!(rebuilt, built);
    }

    #[test]
    fn from_entries_rejects_gap() {
        let mut entries = DraftOrder::from_teams("s1", &teams(&["a", "b", "c"])).into_entries();
        entries[2].order_index = 4;
        let err = DraftOrder::from_entries("s1", entries).unwrap_err();
        assert_eq!(err.kind(), "CorruptOrder");
    }

    #[test]
    fn from_entries_rejects_repeated_team() {
        let mut entries = DraftOrder::from_teams("s1", &teams(&["a", "b"])).into_entries();
        entries[1].team_id = "a".into();
        assert!(DraftOrder::from_entries("s1", entries).is_err());
    }

    #[test]
    fn from_entries_rejects_empty() {
        assert!(DraftOrder::from_entries("s1", vec![]).is_err());
    }

    #[test]
    fn on_clock_snakes_over_entries() {
        let order = DraftOrder::from_teams("s1", &teams(&["a", "b"]));
        let second = order.on_clock(1, 6).into_on_clock().unwrap();
        let third = order.on_clock(2, 6).into_on_clock().unwrap();
        assert_eq!(second.team.team_id, "b");
        assert_eq!(third.team.team_id, "b");
        assert_eq!(third.round, 2);
        assert!(order.on_clock(12, 6).is_complete());
    }
}
