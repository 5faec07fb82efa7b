//! Suggestion sweep: scan a user's two-hop family neighborhood and deduce
//! new relationships through each pivot.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::labels::RelationshipLabel;
use super::rules::deduce;
use crate::graph::{pair_key, Connection, ConnectionStatus, ConnectionType, PersonId};

/// A deduced kinship suggestion: connect to `candidate_id`, discovered
/// through `pivot_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KinSuggestion {
    pub candidate_id: PersonId,
    pub pivot_id: PersonId,
    pub relation_to_candidate: RelationshipLabel,
    pub candidate_relation_to_me: RelationshipLabel,
}

/// Sweep the user's neighborhood for deducible relationships.
///
/// `connections` is the user's two-hop neighborhood as supplied by the graph
/// provider; `existing` carries counterpart ids of the user's pending or
/// accepted connections (pending edges may fall outside the accepted-only
/// neighborhood fetch, so the caller supplies them explicitly).
///
/// Only accepted family edges are considered. Candidates are deduplicated by
/// order-independent pair key so the same person is never suggested twice
/// through two different pivots, and anyone already connected to the user is
/// skipped. Labels that fail to normalize arrive here as `Other` and simply
/// never deduce. Output is sorted by candidate id for determinism.
pub fn sweep_kin_suggestions(
    user: &str,
    connections: &[Connection],
    existing: &HashSet<PersonId>,
) -> Vec<KinSuggestion> {
    // Anyone sharing any edge with the user is off the table, whatever the
    // status; `existing` extends this with edges outside the slice.
    let mut ineligible: HashSet<&str> = existing.iter().map(String::as_str).collect();
    ineligible.insert(user);

    // Direct family pivots: pivot id -> my relation to the pivot.
    // Ordered map so pivot attribution is deterministic when two pivots
    // reach the same candidate.
    let mut pivots: BTreeMap<&str, RelationshipLabel> = BTreeMap::new();
    for conn in connections {
        if let Some(counterpart) = conn.counterpart(user) {
            ineligible.insert(counterpart.as_str());
            if conn.status == ConnectionStatus::Accepted
                && conn.connection_type == ConnectionType::Family
            {
                if let Some(label) = conn.relation_from(user) {
                    pivots.insert(counterpart.as_str(), label);
                }
            }
        }
    }

    let mut seen_pairs: HashSet<(PersonId, PersonId)> = HashSet::new();
    let mut suggestions = Vec::new();

    for conn in connections {
        if conn.status != ConnectionStatus::Accepted
            || conn.connection_type != ConnectionType::Family
        {
            continue;
        }
        for (pivot, my_to_pivot) in &pivots {
            let Some(candidate) = conn.counterpart(pivot) else {
                continue;
            };
            if ineligible.contains(candidate.as_str()) {
                continue;
            }
            let Some(pivot_to_candidate) = conn.relation_from(pivot) else {
                continue;
            };
            let Some(deduction) = deduce(*my_to_pivot, pivot_to_candidate) else {
                continue;
            };
            if !seen_pairs.insert(pair_key(user, candidate)) {
                continue;
            }
            suggestions.push(KinSuggestion {
                candidate_id: candidate.clone(),
                pivot_id: pivot.to_string(),
                relation_to_candidate: deduction.relation_to_candidate,
                candidate_relation_to_me: deduction.candidate_relation_to_me,
            });
        }
    }

    suggestions.sort_by(|a, b| a.candidate_id.cmp(&b.candidate_id));
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::RelationshipLabel::*;

    fn family_edge(
        a: &str,
        b: &str,
        a_to_b: RelationshipLabel,
        b_to_a: RelationshipLabel,
    ) -> Connection {
        Connection {
            connection_id: format!("{}-{}", a, b),
            person_a: a.to_string(),
            person_b: b.to_string(),
            connection_type: ConnectionType::Family,
            status: ConnectionStatus::Accepted,
            relation_a_to_b: a_to_b,
            relation_b_to_a: b_to_a,
            strength: 1.0,
            common_connections: 0,
        }
    }

    #[test]
    fn test_deduces_sibling_through_father() {
        // me --pai--> dad, dad --filho--> kid  =>  kid is my brother
        let connections = vec![
            family_edge("me", "dad", Father, Son),
            family_edge("dad", "kid", Son, Father),
        ];
        let out = sweep_kin_suggestions("me", &connections, &HashSet::new());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].candidate_id, "kid");
        assert_eq!(out[0].pivot_id, "dad");
        assert_eq!(out[0].relation_to_candidate, Brother);
        assert_eq!(out[0].candidate_relation_to_me, Brother);
    }

    #[test]
    fn test_same_candidate_through_two_pivots_suggested_once() {
        // Both parents lead to the same sibling
        let connections = vec![
            family_edge("me", "dad", Father, Son),
            family_edge("me", "mom", Mother, Son),
            family_edge("dad", "kid", Son, Father),
            family_edge("mom", "kid", Son, Mother),
        ];
        let out = sweep_kin_suggestions("me", &connections, &HashSet::new());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].candidate_id, "kid");
    }

    #[test]
    fn test_existing_counterpart_excluded() {
        let connections = vec![
            family_edge("me", "dad", Father, Son),
            family_edge("dad", "kid", Son, Father),
        ];
        let existing: HashSet<PersonId> = ["kid".to_string()].into_iter().collect();
        assert!(sweep_kin_suggestions("me", &connections, &existing).is_empty());
    }

    #[test]
    fn test_direct_connections_never_suggested() {
        // kid is already directly connected to me within the slice
        let connections = vec![
            family_edge("me", "dad", Father, Son),
            family_edge("me", "kid", Brother, Brother),
            family_edge("dad", "kid", Son, Father),
        ];
        let out = sweep_kin_suggestions("me", &connections, &HashSet::new());
        assert!(out.is_empty());
    }

    #[test]
    fn test_pending_edge_still_blocks_candidate() {
        let mut pending = family_edge("me", "kid", Other, Other);
        pending.status = ConnectionStatus::Pending;
        let connections = vec![
            family_edge("me", "dad", Father, Son),
            pending,
            family_edge("dad", "kid", Son, Father),
        ];
        assert!(sweep_kin_suggestions("me", &connections, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_other_labels_tolerated_without_deduction() {
        // Missing reverse labels normalize to Other upstream; the sweep must
        // not crash, it just produces nothing
        let connections = vec![
            family_edge("me", "dad", Other, Other),
            family_edge("dad", "kid", Other, Other),
        ];
        assert!(sweep_kin_suggestions("me", &connections, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_friend_edges_ignored() {
        let mut friend = family_edge("dad", "kid", Son, Father);
        friend.connection_type = ConnectionType::Friend;
        let connections = vec![family_edge("me", "dad", Father, Son), friend];
        assert!(sweep_kin_suggestions("me", &connections, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_output_sorted_by_candidate_id() {
        let connections = vec![
            family_edge("me", "sis", Sister, Brother),
            family_edge("sis", "zoe", Daughter, Mother),
            family_edge("sis", "ana", Daughter, Mother),
        ];
        let out = sweep_kin_suggestions("me", &connections, &HashSet::new());
        let ids: Vec<_> = out.iter().map(|s| s.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["ana", "zoe"]);
        assert!(out.iter().all(|s| s.relation_to_candidate == Niece));
        assert!(out.iter().all(|s| s.candidate_relation_to_me == Aunt));
    }
}
