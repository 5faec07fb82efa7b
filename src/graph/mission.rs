//! Mission state machine: a user's declared goal of reaching a target
//! person within six degrees.
//!
//! The mission record is owned by the external store; the engine computes
//! the values written into it and enforces the transitions here.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PersonId;
use crate::error::{KingraphError, Result};

/// The six-degrees ceiling on `current_degree`.
pub const MAX_DEGREE: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Active,
    /// Terminal: the target was reached.
    Completed,
    /// Terminal: the user gave up or deleted the mission.
    Abandoned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub mission_id: String,
    pub source_id: PersonId,
    pub target_id: PersonId,
    pub current_degree: u8,
    pub status: MissionStatus,
    /// Ordered route discovered so far, starting at the source.
    pub path: Vec<PersonId>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Mission {
    pub fn new(source_id: PersonId, target_id: PersonId) -> Self {
        let path = vec![source_id.clone()];
        Self {
            mission_id: Uuid::new_v4().to_string(),
            source_id,
            target_id,
            current_degree: 0,
            status: MissionStatus::Active,
            path,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status != MissionStatus::Active
    }

    /// Record a successful connection action against a suggested person.
    ///
    /// Advances `current_degree` by exactly one, appends the person to the
    /// path, and completes the mission when the person is the target.
    /// Rejected on terminal missions and at the six-degree ceiling.
    pub fn record_connection(&mut self, person: PersonId) -> Result<()> {
        if self.is_terminal() {
            return Err(KingraphError::InvalidInput(format!(
                "mission {} is no longer active",
                self.mission_id
            )));
        }
        if self.current_degree >= MAX_DEGREE {
            return Err(KingraphError::InvalidInput(format!(
                "mission {} already at the {}-degree ceiling",
                self.mission_id, MAX_DEGREE
            )));
        }

        self.current_degree += 1;
        if person == self.target_id {
            self.status = MissionStatus::Completed;
            self.completed_at = Some(Utc::now());
        }
        self.path.push(person);
        Ok(())
    }

    /// `Active → Abandoned`. Rejected from terminal states.
    pub fn abandon(&mut self) -> Result<()> {
        if self.is_terminal() {
            return Err(KingraphError::InvalidInput(format!(
                "mission {} is no longer active",
                self.mission_id
            )));
        }
        self.status = MissionStatus::Abandoned;
        Ok(())
    }

    /// The exclusion set for suggestion ranking: the requesting user, the
    /// target, and everyone already actioned on the path.
    pub fn exclusions(&self) -> HashSet<PersonId> {
        let mut exclude: HashSet<PersonId> = self.path.iter().cloned().collect();
        exclude.insert(self.source_id.clone());
        exclude.insert(self.target_id.clone());
        exclude
    }

    /// Current frontier: the most recently connected person (the source
    /// before any action is recorded).
    pub fn frontier(&self) -> &PersonId {
        self.path.last().unwrap_or(&self.source_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission() -> Mission {
        Mission::new("src".to_string(), "tgt".to_string())
    }

    #[test]
    fn test_new_mission_starts_at_degree_zero() {
        let m = mission();
        assert_eq!(m.current_degree, 0);
        assert_eq!(m.status, MissionStatus::Active);
        assert_eq!(m.path, vec!["src".to_string()]);
        assert_eq!(m.frontier(), "src");
        assert!(m.completed_at.is_none());
    }

    #[test]
    fn test_record_connection_advances_degree_and_frontier() {
        let mut m = mission();
        m.record_connection("p1".to_string()).unwrap();
        assert_eq!(m.current_degree, 1);
        assert_eq!(m.frontier(), "p1");
        assert_eq!(m.status, MissionStatus::Active);

        m.record_connection("p2".to_string()).unwrap();
        assert_eq!(m.current_degree, 2);
        assert_eq!(m.path, vec!["src", "p1", "p2"]);
    }

    #[test]
    fn test_reaching_target_completes() {
        let mut m = mission();
        m.record_connection("p1".to_string()).unwrap();
        m.record_connection("tgt".to_string()).unwrap();
        assert_eq!(m.status, MissionStatus::Completed);
        assert_eq!(m.current_degree, 2);
        assert!(m.completed_at.is_some());
        // Terminal: further actions rejected
        assert!(m.record_connection("p2".to_string()).is_err());
        assert!(m.abandon().is_err());
    }

    #[test]
    fn test_abandon_is_terminal() {
        let mut m = mission();
        m.abandon().unwrap();
        assert_eq!(m.status, MissionStatus::Abandoned);
        assert!(m.record_connection("p1".to_string()).is_err());
        assert!(m.abandon().is_err());
    }

    #[test]
    fn test_degree_ceiling_enforced() {
        let mut m = mission();
        for i in 0..usize::from(MAX_DEGREE) {
            m.record_connection(format!("p{}", i)).unwrap();
        }
        assert_eq!(m.current_degree, MAX_DEGREE);
        let err = m.record_connection("p6".to_string()).unwrap_err();
        assert!(matches!(err, KingraphError::InvalidInput(_)));
    }

    #[test]
    fn test_exclusions_cover_endpoints_and_path() {
        let mut m = mission();
        m.record_connection("p1".to_string()).unwrap();
        let exclude = m.exclusions();
        assert!(exclude.contains("src"));
        assert!(exclude.contains("tgt"));
        assert!(exclude.contains("p1"));
        assert_eq!(exclude.len(), 3);
    }
}
