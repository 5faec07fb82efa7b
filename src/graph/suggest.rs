//! Next-hop suggestion ranking for mission frontiers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{ConnectionGraph, PersonId};

/// Default number of suggestions surfaced per degree.
pub const DEFAULT_LIMIT: usize = 3;

/// A ranked next-hop candidate. Strength and common-connection counts come
/// from the graph provider; this engine only orders and truncates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub person_id: PersonId,
    pub strength: f32,
    pub common_connections: u32,
}

/// Rank the frontier's neighbors as next-hop candidates.
///
/// Ordering: strength descending, ties by common_connections descending,
/// remaining ties by person id ascending. `exclude` must carry the
/// requesting user, the target, and everyone already actioned in the
/// mission, so dead ends are never suggested. A frontier with no accepted
/// connections yields an empty list, not an error.
///
/// Pure over its inputs: identical calls return identical output.
pub fn rank_suggestions(
    graph: &ConnectionGraph,
    frontier: &str,
    exclude: &HashSet<PersonId>,
    limit: usize,
) -> Vec<Suggestion> {
    let mut candidates: Vec<Suggestion> = graph
        .neighbors(frontier)
        .iter()
        .filter(|n| !exclude.contains(&n.id))
        .map(|n| Suggestion {
            person_id: n.id.clone(),
            strength: n.strength,
            common_connections: n.common_connections,
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.strength
            .partial_cmp(&a.strength)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.common_connections.cmp(&a.common_connections))
            .then_with(|| a.person_id.cmp(&b.person_id))
    });

    candidates.truncate(limit);
    candidates
}
