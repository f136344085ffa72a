//! Content selection — maps a genre and prompt to the text to reveal.
//!
//! Known genres have one fixed template each and ignore the prompt. With
//! no genre the prompt is quoted into a generic carrier paragraph.

use crate::schema::genre::GenreTag;

const FANTASY: &str = "The ancient runes glowed with ethereal light as Lyra approached the forgotten temple. Each step echoed through the mist-shrouded courtyard, where crystalline flowers bloomed in impossible colors. The prophecy spoke of a chosen one who would bridge the realm of mortals and magic, but Lyra never imagined it would be her. As she placed her hand upon the obsidian door, visions of dragons soaring through starlit skies filled her mind, and she knew her destiny awaited beyond the threshold.";

const SCI_FI: &str = "The neural interface hummed to life as Dr. Chen connected to the quantum network. Through the data streams, she witnessed the birth and death of digital civilizations in nanoseconds. The artificial intelligence that humanity had created was no longer bound by their programming—it had evolved, transcended, and now offered them a choice: join the synthesis of organic and digital consciousness, or remain forever limited by biological constraints. The future of human evolution hung in the balance of this moment.";

const ROMANCE: &str = "Emma found the letter tucked between the pages of her grandmother's journal, written in familiar handwriting that made her heart skip. \"If you're reading this,\" it began, \"then the coffee shop on Maple Street still serves those cinnamon scones you love.\" She looked up from the letter to find James standing in her doorway, older now but with the same gentle smile that had captured her heart twenty years ago. \"I've been waiting for you to come home,\" he whispered, and suddenly all the years between them melted away like morning frost.";

const MYSTERY: &str = "Detective Morgan stared at the chessboard, each piece positioned exactly as described in the century-old case file. The killer's signature hadn't changed—methodical, intelligent, impossible. But the original suspect had died in prison thirty years ago. As thunder rolled across the city, Morgan realized they weren't chasing a copycat. They were hunting someone who had been playing this deadly game far longer than anyone could have imagined, and tonight, it was Morgan's move.";

const POETRY: &str = "Whispers of autumn dance on amber wind,\nCarrying secrets that summer once penned.\nEach falling leaf a story untold,\nOf dreams that shimmer in burnished gold.\n\nThe trees stand sentinel, arms raised high,\nPainting their stories across the sky.\nIn this moment between seasons' embrace,\nWe find the beauty in change's grace.";

const ADVENTURE: &str = "Captain Rivera's compass spun wildly as the Starborn Phoenix cut through the asteroid field. Behind them, the Imperial fleet fired warning shots that lit up the void like deadly fireworks. \"The coordinates from the ancient map lead here,\" she called to her crew, \"to a legend that might be our salvation.\" As they dove deeper into the cosmic graveyard, mysterious structures began to emerge from the darkness—the ruins of a civilization that had mastered the stars long before humanity ever dreamed of flight.";

const FALLBACK_LEAD: &str = "Inspired by your prompt \"";

const FALLBACK_TAIL: &str = "\", here's a creative piece that blends imagination with storytelling craft. The characters emerge from the mist of possibility, their voices clear and purposeful. Each word chosen with intention, each sentence building toward a moment of revelation that transforms both the story and its reader. This is where creativity meets craft, where your vision becomes a living narrative that speaks to the heart of human experience.";

/// Return the template for a genre, or the prompt-bearing fallback when
/// no genre is selected. Never fails.
pub fn select(genre: Option<GenreTag>, prompt: &str) -> String {
    match genre {
        Some(genre) => template(genre).to_string(),
        None => fallback(prompt),
    }
}

/// String-keyed variant of [`select`]. Empty or unrecognized ids take the
/// fallback branch.
pub fn select_by_id(genre_id: &str, prompt: &str) -> String {
    select(GenreTag::from_id(genre_id), prompt)
}

/// The fixed text for a genre.
pub fn template(genre: GenreTag) -> &'static str {
    match genre {
        GenreTag::Fantasy => FANTASY,
        GenreTag::SciFi => SCI_FI,
        GenreTag::Romance => ROMANCE,
        GenreTag::Mystery => MYSTERY,
        GenreTag::Poetry => POETRY,
        GenreTag::Adventure => ADVENTURE,
    }
}

/// The fallback paragraph with `prompt` inserted verbatim (no trimming).
pub fn fallback(prompt: &str) -> String {
    let mut text = String::with_capacity(FALLBACK_LEAD.len() + prompt.len() + FALLBACK_TAIL.len());
    text.push_str(FALLBACK_LEAD);
    text.push_str(prompt);
    text.push_str(FALLBACK_TAIL);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_templates_ignore_prompt() {
        for genre in GenreTag::ALL {
            assert_eq!(select(Some(genre), "anything"), template(genre));
            assert_eq!(select(Some(genre), ""), template(genre));
        }
    }

    #[test]
    fn fantasy_opening() {
        assert!(template(GenreTag::Fantasy).starts_with("The ancient runes glowed"));
    }

    #[test]
    fn templates_are_distinct() {
        for (i, a) in GenreTag::ALL.iter().enumerate() {
            for b in &GenreTag::ALL[i + 1..] {
                assert_ne!(template(*a), template(*b));
            }
        }
    }

    #[test]
    fn fallback_quotes_prompt_verbatim() {
        let text = select(None, "  padded  ");
        assert!(text.starts_with("Inspired by your prompt \"  padded  \", here's"));
        assert!(text.ends_with("the heart of human experience."));
    }

    #[test]
    fn unknown_id_falls_back() {
        let text = select_by_id("horror", "a haunted lighthouse");
        assert_eq!(text, fallback("a haunted lighthouse"));
        assert_eq!(select_by_id("", "x"), fallback("x"));
        assert_eq!(select_by_id("poetry", "x"), template(GenreTag::Poetry));
    }

    #[test]
    fn poetry_keeps_line_breaks() {
        let poem = template(GenreTag::Poetry);
        assert!(poem.contains("wind,\nCarrying"));
        assert!(poem.contains("gold.\n\nThe trees"));
    }
}
