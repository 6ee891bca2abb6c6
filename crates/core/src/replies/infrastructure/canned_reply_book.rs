use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::replies::domain::reply_book::ReplyBook;
use crate::shared::constants::NEUTRAL_LABEL;

const REPLIES: &[(&str, &[&str])] = &[
    (
        "joy",
        &[
            "I can feel your positive energy 😊 What’s been going well?",
            "That’s lovely to hear. Want to tell me more?",
            "Happiness suits you.",
        ],
    ),
    (
        "sadness",
        &[
            "I’m really sorry you’re feeling this way. I’m here with you.",
            "It’s okay to feel low sometimes. What’s been weighing on you?",
            "You don’t have to go through this alone.",
        ],
    ),
    (
        "anger",
        &[
            "That sounds frustrating. Want to talk about what happened?",
            "Strong emotions are valid. Let’s slow this down together.",
            "I’m listening — tell me what’s bothering you.",
        ],
    ),
    (
        "fear",
        &[
            "That sounds scary. You’re safe here.",
            "Do you want to share what’s worrying you?",
            "Let’s take this one step at a time.",
        ],
    ),
    (
        "surprise",
        &[
            "That sounds unexpected!",
            "Wow — what happened?",
            "Tell me more about that.",
        ],
    ),
    (
        "neutral",
        &[
            "I’m listening.",
            "Tell me more.",
            "How are you feeling right now?",
        ],
    ),
];

/// Fixed reply lists with an injectable random source.
pub struct CannedReplyBook {
    rng: Mutex<StdRng>,
}

impl CannedReplyBook {
    /// Same seed, same sequence of replies.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// The candidate replies for `emotion`, falling back to the neutral list.
    pub fn replies_for(emotion: &str) -> &'static [&'static str] {
        let lookup = |label: &str| {
            REPLIES
                .iter()
                .find(|(known, _)| *known == label)
                .map(|(_, replies)| *replies)
        };
        lookup(emotion).or_else(|| lookup(NEUTRAL_LABEL)).unwrap_or(&[])
    }
}

impl ReplyBook for CannedReplyBook {
    fn reply(&self, emotion: &str) -> String {
        let replies = Self::replies_for(emotion);
        let mut rng = self.rng.lock();
        replies
            .choose(&mut *rng)
            .map(|r| r.to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("joy")]
    #[case("sadness")]
    #[case("anger")]
    #[case("fear")]
    #[case("surprise")]
    #[case("neutral")]
    fn test_every_emotion_has_three_replies(#[case] emotion: &str) {
        assert_eq!(CannedReplyBook::replies_for(emotion).len(), 3);
    }

    #[test]
    fn test_reply_text_is_verbatim() {
        assert_eq!(
            CannedReplyBook::replies_for("anger")[2],
            "I’m listening — tell me what’s bothering you."
        );
        assert_eq!(
            CannedReplyBook::replies_for("surprise"),
            &["That sounds unexpected!", "Wow — what happened?", "Tell me more about that."]
        );
    }

    #[test]
    fn test_reply_comes_from_emotion_list() {
        let book = CannedReplyBook::from_entropy();
        for _ in 0..20 {
            let reply = book.reply("fear");
            assert!(CannedReplyBook::replies_for("fear").contains(&reply.as_str()));
        }
    }

    #[test]
    fn test_unknown_emotion_uses_neutral_list() {
        let book = CannedReplyBook::seeded(7);
        let reply = book.reply("disgust");
        assert!(CannedReplyBook::replies_for("neutral").contains(&reply.as_str()));
    }

    #[test]
    fn test_same_seed_same_replies() {
        let a = CannedReplyBook::seeded(42);
        let b = CannedReplyBook::seeded(42);
        let from_a: Vec<String> = (0..10).map(|_| a.reply("joy")).collect();
        let from_b: Vec<String> = (0..10).map(|_| b.reply("joy")).collect();
        assert_eq!(from_a, from_b);
    }
}
