//! Kinship deduction engine: closed relationship vocabulary, the static
//! transitive-deduction rule table, and the neighborhood sweep that turns
//! deductions into connection suggestions.

mod labels;
mod rules;
mod sweep;

pub use labels::RelationshipLabel;
pub use rules::{deduce, Deduction};
pub use sweep::{sweep_kin_suggestions, KinSuggestion};
