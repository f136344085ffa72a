use rand::seq::SliceRandom;
use rand::Rng;

/// Sample prompts offered to a user who has nothing in mind yet.
pub const INSPIRATION_PROMPTS: [&str; 6] = [
    "A mysterious letter arrives at midnight...",
    "In a world where magic and technology coexist...",
    "The last person on Earth discovers they're not alone...",
    "A love story told through handwritten notes...",
    "The detective's biggest case becomes personal...",
    "Write about a color that doesn't exist...",
];

/// Returns true when a prompt has something other than whitespace in it.
///
/// This is the only validation prompts receive; the text itself is passed
/// along untouched.
pub fn is_blank(prompt: &str) -> bool {
    prompt.trim().is_empty()
}

/// Pick a random inspiration prompt.
pub fn random_inspiration<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    INSPIRATION_PROMPTS
        .choose(rng)
        .copied()
        .unwrap_or(INSPIRATION_PROMPTS[0])
}
