use crate::shared::constants::NEUTRAL_LABEL;
use crate::shared::score::ScoreEntry;

/// Ordered keyword table. The first keyword found as a substring of the
/// lower-cased text wins, so `"unhappy"` resolves through `"happy"`.
const KEYWORDS: &[(&str, &str)] = &[
    ("happy", "joy"),
    ("joy", "joy"),
    ("glad", "joy"),
    ("love", "joy"),
    ("excited", "joy"),
    ("sad", "sadness"),
    ("unhappy", "sadness"),
    ("depressed", "sadness"),
    ("angry", "anger"),
    ("mad", "anger"),
    ("furious", "anger"),
    ("scared", "fear"),
    ("afraid", "fear"),
    ("nervous", "fear"),
    ("surprised", "surprise"),
    ("wow", "surprise"),
    ("neutral", "neutral"),
    ("okay", "neutral"),
    ("fine", "neutral"),
];

pub const KEYWORD_SCORE: f64 = 0.9;
pub const EXCLAMATION_SCORE: f64 = 0.6;
pub const QUESTION_SCORE: f64 = 0.55;
pub const NO_MATCH_SCORE: f64 = 0.5;

/// Deterministic rule-based text classifier, the last resort of the
/// fallback chain. It always produces a result.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordHeuristic;

impl KeywordHeuristic {
    pub fn classify(&self, text: &str) -> ScoreEntry {
        let lowered = text.to_lowercase();
        if let Some((_, label)) = KEYWORDS.iter().find(|(kw, _)| lowered.contains(kw)) {
            return ScoreEntry::new(*label, KEYWORD_SCORE);
        }
        if text.contains('!') {
            ScoreEntry::new("joy", EXCLAMATION_SCORE)
        } else if text.contains('?') {
            ScoreEntry::new(NEUTRAL_LABEL, QUESTION_SCORE)
        } else {
            ScoreEntry::new(NEUTRAL_LABEL, NO_MATCH_SCORE)
        }
    }
}
