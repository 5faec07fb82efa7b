//! Shortest path over the accepted-connection graph, bounded at six hops.

use std::collections::{HashMap, HashSet, VecDeque};

use super::{ConnectionGraph, PersonId};

/// Default traversal bound: the "six degrees" ceiling.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Result of a bounded shortest-path search. The two absence cases are
/// distinct so the caller can render different messaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    /// Minimum-hop path from source to target, both endpoints included.
    Found(Vec<PersonId>),
    /// Source or target has no accepted connections at all.
    NodeAbsent,
    /// Both nodes exist but no path was found within the depth bound.
    Unreachable,
}

impl PathOutcome {
    /// The discovered path, if any.
    pub fn path(&self) -> Option<&[PersonId]> {
        match self {
            PathOutcome::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PathOutcome::Found(_))
    }
}

/// Breadth-first search from `source` to `target`, treating every accepted
/// edge as bidirectional. BFS guarantees the first path found has minimum
/// hop count; among equal-length paths the one discovered first in the
/// graph's id-sorted neighbor order wins, which keeps results reproducible.
///
/// `source == target` (node present) is a trivial zero-hop path.
pub fn find_shortest_path(
    graph: &ConnectionGraph,
    source: &str,
    target: &str,
    max_depth: usize,
) -> PathOutcome {
    if !graph.contains(source) || !graph.contains(target) {
        return PathOutcome::NodeAbsent;
    }
    if source == target {
        return PathOutcome::Found(vec![source.to_string()]);
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut parent: HashMap<&str, &str> = HashMap::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();

    visited.insert(source);
    queue.push_back((source, 0));

    while let Some((person, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for neighbor in graph.neighbors(person) {
            let id = neighbor.id.as_str();
            if !visited.insert(id) {
                continue;
            }
            parent.insert(id, person);
            if id == target {
                return PathOutcome::Found(reconstruct(&parent, source, target));
            }
            queue.push_back((id, depth + 1));
        }
    }

    PathOutcome::Unreachable
}

/// Walk the parent map back from target to source.
fn reconstruct(parent: &HashMap<&str, &str>, source: &str, target: &str) -> Vec<PersonId> {
    let mut path = vec![target.to_string()];
    let mut current = target;
    while current != source {
        // Every visited node except the source has a parent
        current = parent[current];
        path.push(current.to_string());
    }
    path.reverse();
    path
}
