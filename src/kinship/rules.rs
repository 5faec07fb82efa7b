//! Transitive kinship deduction over a curated rule table.
//!
//! Given my relation to a pivot person and the pivot's relation to a
//! candidate, the table deduces the relationship pair between me and the
//! candidate. Only hand-enumerated, high-confidence one-hop compositions are
//! covered; kinship composition is not closed under a simple algebra (a
//! cousin of my cousin could be almost anyone), so anything off the table is
//! `None` — absence, not an error.

use serde::{Deserialize, Serialize};

use super::labels::RelationshipLabel;

/// A deduced relationship pair between the user and a candidate.
///
/// Both labels take the grammatical gender of the pivot→candidate label;
/// the user's own gender is unknown to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    /// How the user relates to the candidate ("minha sobrinha").
    pub relation_to_candidate: RelationshipLabel,
    /// The inverse label, written from the candidate's side.
    pub candidate_relation_to_me: RelationshipLabel,
}

/// Role of the pivot relative to the user, collapsing gendered label pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PivotRole {
    Parent,
    Child,
    Sibling,
    Spouse,
    UncleAunt,
}

fn pivot_role(label: RelationshipLabel) -> Option<PivotRole> {
    use RelationshipLabel::*;
    match label {
        Father | Mother => Some(PivotRole::Parent),
        Son | Daughter => Some(PivotRole::Child),
        Brother | Sister => Some(PivotRole::Sibling),
        Husband | Wife => Some(PivotRole::Spouse),
        Uncle | Aunt => Some(PivotRole::UncleAunt),
        _ => None,
    }
}

/// Deduce the user↔candidate relationship pair, if the table covers the
/// combination. Total over the closed vocabulary: every input pair maps to
/// `Some(deduction)` or `None`, never a panic.
pub fn deduce(
    my_to_pivot: RelationshipLabel,
    pivot_to_candidate: RelationshipLabel,
) -> Option<Deduction> {
    use RelationshipLabel::*;

    let role = pivot_role(my_to_pivot)?;

    let (relation_to_candidate, candidate_relation_to_me) = match (role, pivot_to_candidate) {
        // My parent's child is my sibling; their parent my grandparent;
        // their sibling my uncle/aunt.
        (PivotRole::Parent, Son) => (Brother, Brother),
        (PivotRole::Parent, Daughter) => (Sister, Sister),
        (PivotRole::Parent, Father) => (Grandfather, Grandson),
        (PivotRole::Parent, Mother) => (Grandmother, Granddaughter),
        (PivotRole::Parent, Brother) => (Uncle, Nephew),
        (PivotRole::Parent, Sister) => (Aunt, Niece),

        // My child's child is my grandchild; their spouse my child-in-law.
        (PivotRole::Child, Son) => (Grandson, Grandfather),
        (PivotRole::Child, Daughter) => (Granddaughter, Grandmother),
        (PivotRole::Child, Husband) => (SonInLaw, FatherInLaw),
        (PivotRole::Child, Wife) => (DaughterInLaw, MotherInLaw),

        // My sibling's child is my nephew/niece; their sibling my sibling;
        // their spouse my sibling-in-law.
        (PivotRole::Sibling, Son) => (Nephew, Uncle),
        (PivotRole::Sibling, Daughter) => (Niece, Aunt),
        (PivotRole::Sibling, Brother) => (Brother, Brother),
        (PivotRole::Sibling, Sister) => (Sister, Sister),
        (PivotRole::Sibling, Husband) => (BrotherInLaw, BrotherInLaw),
        (PivotRole::Sibling, Wife) => (SisterInLaw, SisterInLaw),

        // My spouse's parent is my parent-in-law; their sibling my
        // sibling-in-law.
        (PivotRole::Spouse, Father) => (FatherInLaw, SonInLaw),
        (PivotRole::Spouse, Mother) => (MotherInLaw, DaughterInLaw),
        (PivotRole::Spouse, Brother) => (BrotherInLaw, BrotherInLaw),
        (PivotRole::Spouse, Sister) => (SisterInLaw, SisterInLaw),

        // My uncle/aunt's child is my cousin.
        (PivotRole::UncleAunt, Son) => (CousinMale, CousinMale),
        (PivotRole::UncleAunt, Daughter) => (CousinFemale, CousinFemale),

        // Everything else (grandparent's child could be my own parent,
        // cousin chains lose the generation, step-relations are not in the
        // vocabulary) stays off the table.
        _ => return None,
    };

    Some(Deduction {
        relation_to_candidate,
        candidate_relation_to_me,
    })
}
