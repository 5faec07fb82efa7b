//! Connection graph model: people, accepted-connection edges, and the
//! in-memory adjacency structure the path and suggestion engines run on.
//!
//! The graph is rebuilt fresh from store data on every query; nothing here
//! is cached or persisted.

mod mission;
mod path;
mod suggest;

pub use mission::{Mission, MissionStatus, MAX_DEGREE};
pub use path::{find_shortest_path, PathOutcome, DEFAULT_MAX_DEPTH};
pub use suggest::{rank_suggestions, Suggestion, DEFAULT_LIMIT};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::kinship::RelationshipLabel;

/// Opaque person identifier, owned by the external profile store.
pub type PersonId = String;

/// Kind of connection between two people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Family,
    Friend,
}

impl ConnectionType {
    /// Total mapping from raw store text. Anything that isn't "family" is
    /// treated as a friend edge: it still participates in path finding but
    /// never in kinship deduction.
    pub fn normalize_lossy(raw: &str) -> ConnectionType {
        if raw.trim().eq_ignore_ascii_case("family") {
            ConnectionType::Family
        } else {
            ConnectionType::Friend
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Family => "family",
            ConnectionType::Friend => "friend",
        }
    }
}

/// Lifecycle status of a connection. Only accepted edges participate in
/// graph algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Rejected => "rejected",
        }
    }
}

/// An edge between two people, as handed over by the graph data provider.
///
/// `strength` and `common_connections` are computed externally (shared
/// accepted connections); the engine treats them as opaque ordering keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub connection_id: String,
    pub person_a: PersonId,
    pub person_b: PersonId,
    pub connection_type: ConnectionType,
    pub status: ConnectionStatus,
    /// How person_a relates to person_b. `Other` when missing or malformed.
    pub relation_a_to_b: RelationshipLabel,
    /// The inverse label. The surrounding app never enforced consistency
    /// between the two, so this may disagree with `relation_a_to_b`.
    pub relation_b_to_a: RelationshipLabel,
    pub strength: f32,
    pub common_connections: u32,
}

impl Connection {
    /// The other endpoint, if `person` is on this edge.
    pub fn counterpart(&self, person: &str) -> Option<&PersonId> {
        if self.person_a == person {
            Some(&self.person_b)
        } else if self.person_b == person {
            Some(&self.person_a)
        } else {
            None
        }
    }

    /// Directional label from `person`'s side, if `person` is on this edge.
    pub fn relation_from(&self, person: &str) -> Option<RelationshipLabel> {
        if self.person_a == person {
            Some(self.relation_a_to_b)
        } else if self.person_b == person {
            Some(self.relation_b_to_a)
        } else {
            None
        }
    }

    /// Order-independent pair key, for deduplicating candidate pairs.
    pub fn pair_key(&self) -> (PersonId, PersonId) {
        pair_key(&self.person_a, &self.person_b)
    }
}

/// Sorted id tuple; the same pair yields the same key from either side.
pub fn pair_key(a: &str, b: &str) -> (PersonId, PersonId) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// A neighbor entry in the adjacency structure, carrying the ranking keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: PersonId,
    pub strength: f32,
    pub common_connections: u32,
}

/// Undirected adjacency over accepted connections.
///
/// Neighbor lists are sorted by person id after construction; BFS visits
/// them in that order, which is the documented stable iteration order for
/// test reproducibility.
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    adjacency: HashMap<PersonId, Vec<Neighbor>>,
}

impl ConnectionGraph {
    /// Build the graph from a set of connections. Pending and rejected
    /// edges are dropped; every accepted edge is bidirectional regardless of
    /// which side requested the connection. Duplicate edges between the same
    /// pair keep the stronger one.
    pub fn from_connections(connections: &[Connection]) -> Self {
        let mut adjacency: HashMap<PersonId, Vec<Neighbor>> = HashMap::new();

        for conn in connections {
            if conn.status != ConnectionStatus::Accepted {
                continue;
            }
            adjacency
                .entry(conn.person_a.clone())
                .or_default()
                .push(Neighbor {
                    id: conn.person_b.clone(),
                    strength: conn.strength,
                    common_connections: conn.common_connections,
                });
            adjacency
                .entry(conn.person_b.clone())
                .or_default()
                .push(Neighbor {
                    id: conn.person_a.clone(),
                    strength: conn.strength,
                    common_connections: conn.common_connections,
                });
        }

        for neighbors in adjacency.values_mut() {
            neighbors.sort_by(|a, b| {
                a.id.cmp(&b.id).then_with(|| {
                    b.strength
                        .partial_cmp(&a.strength)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
            });
            // Same pair connected twice: keep the first (stronger) entry
            neighbors.dedup_by(|next, kept| next.id == kept.id);
        }

        Self { adjacency }
    }

    /// Whether `id` has at least one accepted connection. A person with
    /// zero accepted connections is absent from the graph, a legitimate
    /// state rather than an error.
    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Neighbors of `id` in stable (id-sorted) order; empty if absent.
    pub fn neighbors(&self, id: &str) -> &[Neighbor] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn test_edge(a: &str, b: &str, strength: f32, common: u32) -> Connection {
    Connection {
        connection_id: format!("{}-{}", a, b),
        person_a: a.to_string(),
        person_b: b.to_string(),
        connection_type: ConnectionType::Friend,
        status: ConnectionStatus::Accepted,
        relation_a_to_b: RelationshipLabel::Other,
        relation_b_to_a: RelationshipLabel::Other,
        strength,
        common_connections: common,
    }
}
