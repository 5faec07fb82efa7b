//! Closed vocabulary of canonical relationship tags.
//!
//! The surrounding app stores relationship labels as free text (locale
//! variants, stray accents, the occasional typo). Everything entering the
//! deduction engine is normalized here first: known synonyms map to one
//! canonical tag, anything else maps to `Other`, which never deduces.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{KingraphError, Result};

/// Canonical relationship tag.
///
/// Tags are ASCII-folded Portuguese except the grandparent pair, where the
/// diacritic is the only thing telling the two tags apart ("avô" vs "avó").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipLabel {
    #[serde(rename = "pai")]
    Father,
    #[serde(rename = "mae")]
    Mother,
    #[serde(rename = "filho")]
    Son,
    #[serde(rename = "filha")]
    Daughter,
    #[serde(rename = "irmao")]
    Brother,
    #[serde(rename = "irma")]
    Sister,
    #[serde(rename = "avô")]
    Grandfather,
    #[serde(rename = "avó")]
    Grandmother,
    #[serde(rename = "neto")]
    Grandson,
    #[serde(rename = "neta")]
    Granddaughter,
    #[serde(rename = "tio")]
    Uncle,
    #[serde(rename = "tia")]
    Aunt,
    #[serde(rename = "sobrinho")]
    Nephew,
    #[serde(rename = "sobrinha")]
    Niece,
    #[serde(rename = "primo")]
    CousinMale,
    #[serde(rename = "prima")]
    CousinFemale,
    #[serde(rename = "marido")]
    Husband,
    #[serde(rename = "esposa")]
    Wife,
    #[serde(rename = "sogro")]
    FatherInLaw,
    #[serde(rename = "sogra")]
    MotherInLaw,
    #[serde(rename = "genro")]
    SonInLaw,
    #[serde(rename = "nora")]
    DaughterInLaw,
    #[serde(rename = "cunhado")]
    BrotherInLaw,
    #[serde(rename = "cunhada")]
    SisterInLaw,
    /// Catch-all for anything outside the closed vocabulary.
    /// Never matches a deduction rule.
    #[serde(rename = "outro")]
    Other,
}

impl RelationshipLabel {
    /// Every member of the closed vocabulary, in a stable order.
    pub const ALL: [RelationshipLabel; 25] = [
        RelationshipLabel::Father,
        RelationshipLabel::Mother,
        RelationshipLabel::Son,
        RelationshipLabel::Daughter,
        RelationshipLabel::Brother,
        RelationshipLabel::Sister,
        RelationshipLabel::Grandfather,
        RelationshipLabel::Grandmother,
        RelationshipLabel::Grandson,
        RelationshipLabel::Granddaughter,
        RelationshipLabel::Uncle,
        RelationshipLabel::Aunt,
        RelationshipLabel::Nephew,
        RelationshipLabel::Niece,
        RelationshipLabel::CousinMale,
        RelationshipLabel::CousinFemale,
        RelationshipLabel::Husband,
        RelationshipLabel::Wife,
        RelationshipLabel::FatherInLaw,
        RelationshipLabel::MotherInLaw,
        RelationshipLabel::SonInLaw,
        RelationshipLabel::DaughterInLaw,
        RelationshipLabel::BrotherInLaw,
        RelationshipLabel::SisterInLaw,
        RelationshipLabel::Other,
    ];

    /// Canonical tag string (the serde wire form).
    pub fn canonical_tag(&self) -> &'static str {
        match self {
            RelationshipLabel::Father => "pai",
            RelationshipLabel::Mother => "mae",
            RelationshipLabel::Son => "filho",
            RelationshipLabel::Daughter => "filha",
            RelationshipLabel::Brother => "irmao",
            RelationshipLabel::Sister => "irma",
            RelationshipLabel::Grandfather => "avô",
            RelationshipLabel::Grandmother => "avó",
            RelationshipLabel::Grandson => "neto",
            RelationshipLabel::Granddaughter => "neta",
            RelationshipLabel::Uncle => "tio",
            RelationshipLabel::Aunt => "tia",
            RelationshipLabel::Nephew => "sobrinho",
            RelationshipLabel::Niece => "sobrinha",
            RelationshipLabel::CousinMale => "primo",
            RelationshipLabel::CousinFemale => "prima",
            RelationshipLabel::Husband => "marido",
            RelationshipLabel::Wife => "esposa",
            RelationshipLabel::FatherInLaw => "sogro",
            RelationshipLabel::MotherInLaw => "sogra",
            RelationshipLabel::SonInLaw => "genro",
            RelationshipLabel::DaughterInLaw => "nora",
            RelationshipLabel::BrotherInLaw => "cunhado",
            RelationshipLabel::SisterInLaw => "cunhada",
            RelationshipLabel::Other => "outro",
        }
    }

    /// Strict boundary parse: unrecognized input is an input-validation
    /// error, distinct from "no deduction."
    pub fn parse(raw: &str) -> Result<RelationshipLabel> {
        lookup(raw).ok_or_else(|| KingraphError::UnrecognizedLabel(raw.to_string()))
    }

    /// Total normalization: unrecognized input becomes `Other`.
    ///
    /// Used when ingesting edge labels from the store, which never enforced
    /// the vocabulary at write time; a label that fails to normalize must
    /// not crash traversal, it just never deduces.
    pub fn normalize_lossy(raw: &str) -> RelationshipLabel {
        lookup(raw).unwrap_or(RelationshipLabel::Other)
    }
}

impl std::fmt::Display for RelationshipLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_tag())
    }
}

impl std::str::FromStr for RelationshipLabel {
    type Err = KingraphError;

    fn from_str(s: &str) -> Result<Self> {
        RelationshipLabel::parse(s)
    }
}

/// Lowercase and strip everything that isn't a letter.
/// "Irmão!" -> "irmão", " Tia " -> "tia".
fn clean(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let letters_only = Regex::new(r"[^a-zà-öø-ÿ]+").expect("Invalid regex pattern");
    letters_only.replace_all(&lower, "").into_owned()
}

/// Fold Portuguese diacritics to ASCII.
fn fold_diacritics(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn lookup(raw: &str) -> Option<RelationshipLabel> {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return None;
    }

    // The grandparent pair must match before folding: "avô" and "avó"
    // collapse to the same ASCII form.
    match cleaned.as_str() {
        "avô" | "vovô" => return Some(RelationshipLabel::Grandfather),
        "avó" | "vovó" | "avoa" => return Some(RelationshipLabel::Grandmother),
        _ => {}
    }

    let folded = fold_diacritics(&cleaned);
    let label = match folded.as_str() {
        "pai" | "papai" => RelationshipLabel::Father,
        "mae" | "mamae" => RelationshipLabel::Mother,
        "filho" => RelationshipLabel::Son,
        "filha" => RelationshipLabel::Daughter,
        "irmao" => RelationshipLabel::Brother,
        "irma" => RelationshipLabel::Sister,
        // Bare "avo" lost its accent somewhere upstream; masculine by
        // convention (see DESIGN.md).
        "avo" | "vovo" => RelationshipLabel::Grandfather,
        "neto" => RelationshipLabel::Grandson,
        "neta" => RelationshipLabel::Granddaughter,
        "tio" => RelationshipLabel::Uncle,
        "tia" => RelationshipLabel::Aunt,
        "sobrinho" => RelationshipLabel::Nephew,
        "sobrinha" => RelationshipLabel::Niece,
        "primo" => RelationshipLabel::CousinMale,
        "prima" => RelationshipLabel::CousinFemale,
        "marido" | "esposo" => RelationshipLabel::Husband,
        "esposa" => RelationshipLabel::Wife,
        "sogro" => RelationshipLabel::FatherInLaw,
        "sogra" => RelationshipLabel::MotherInLaw,
        "genro" => RelationshipLabel::SonInLaw,
        "nora" => RelationshipLabel::DaughterInLaw,
        "cunhado" => RelationshipLabel::BrotherInLaw,
        "cunhada" => RelationshipLabel::SisterInLaw,
        "outro" | "outra" => RelationshipLabel::Other,
        _ => return None,
    };
    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_tags() {
        for label in RelationshipLabel::ALL {
            let parsed = RelationshipLabel::parse(label.canonical_tag()).unwrap();
            assert_eq!(parsed, label, "round trip failed for {}", label);
        }
    }

    #[test]
    fn test_parse_accented_variants() {
        assert_eq!(
            RelationshipLabel::parse("irmão").unwrap(),
            RelationshipLabel::Brother
        );
        assert_eq!(
            RelationshipLabel::parse("irmã").unwrap(),
            RelationshipLabel::Sister
        );
        assert_eq!(
            RelationshipLabel::parse("mãe").unwrap(),
            RelationshipLabel::Mother
        );
    }

    #[test]
    fn test_grandparent_diacritic_is_load_bearing() {
        assert_eq!(
            RelationshipLabel::parse("avô").unwrap(),
            RelationshipLabel::Grandfather
        );
        assert_eq!(
            RelationshipLabel::parse("avó").unwrap(),
            RelationshipLabel::Grandmother
        );
        // Bare form defaults to grandfather
        assert_eq!(
            RelationshipLabel::parse("avo").unwrap(),
            RelationshipLabel::Grandfather
        );
        assert_eq!(
            RelationshipLabel::parse("vovó").unwrap(),
            RelationshipLabel::Grandmother
        );
    }

    #[test]
    fn test_parse_strips_noise() {
        assert_eq!(
            RelationshipLabel::parse("  Tia!  ").unwrap(),
            RelationshipLabel::Aunt
        );
        assert_eq!(
            RelationshipLabel::parse("PRIMO").unwrap(),
            RelationshipLabel::CousinMale
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = RelationshipLabel::parse("padrinho").unwrap_err();
        assert!(matches!(err, KingraphError::UnrecognizedLabel(_)));
        assert!(RelationshipLabel::parse("").is_err());
        assert!(RelationshipLabel::parse("123").is_err());
    }

    #[test]
    fn test_normalize_lossy_falls_back_to_other() {
        assert_eq!(
            RelationshipLabel::normalize_lossy("padrinho"),
            RelationshipLabel::Other
        );
        assert_eq!(
            RelationshipLabel::normalize_lossy(""),
            RelationshipLabel::Other
        );
        assert_eq!(
            RelationshipLabel::normalize_lossy("sobrinha"),
            RelationshipLabel::Niece
        );
    }

    #[test]
    fn test_serde_uses_canonical_tags() {
        let json = serde_json::to_string(&RelationshipLabel::Niece).unwrap();
        assert_eq!(json, "\"sobrinha\"");
        let back: RelationshipLabel = serde_json::from_str("\"cunhada\"").unwrap();
        assert_eq!(back, RelationshipLabel::SisterInLaw);
    }
}
