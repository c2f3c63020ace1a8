//! Prompt templates for structured generation.

/// Cards requested when filling a deck from its title and description.
pub const DEFAULT_CARD_COUNT: usize = 20;

/// Prompt used when the caller supplies no instructions for a deck.
#[must_use]
pub fn deck_context_prompt(title: &str, description: Option<&str>) -> String {
    let described = description
        .map(|text| format!(" described as \"{text}\""))
        .unwrap_or_default();
    format!(
        "Generate {DEFAULT_CARD_COUNT} flashcards for a study deck titled \"{title}\"{described}. \
         Each card needs a concise question on the front and a precise answer on the back. \
         Cover distinct facts and avoid repeating a question."
    )
}

/// Caller text when it is non-blank, otherwise the deck-context template.
#[must_use]
pub fn cards_prompt(custom: Option<&str>, title: &str, description: Option<&str>) -> String {
    match custom.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => text.to_owned(),
        None => deck_context_prompt(title, description),
    }
}

/// Prompt asking for a whole deck on `topic`.
#[must_use]
pub fn new_deck_prompt(topic: &str) -> String {
    format!(
        "Create a flashcard study deck about the following topic: {topic}\n\
         Give the deck a short title and a one-sentence description, then write \
         between 5 and 20 cards with a question on the front and the answer on the back."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_custom_prompts_fall_back_to_the_template() {
        let prompt = cards_prompt(Some("   "), "Cells", Some("Organelles"));
        assert!(prompt.contains("titled \"Cells\""));
        assert!(prompt.contains("described as \"Organelles\""));
        assert!(prompt.contains("Generate 20 flashcards"));
    }

    #[test]
    fn custom_prompts_are_used_verbatim_after_trimming() {
        assert_eq!(cards_prompt(Some("  only verbs "), "Spanish", None), "only verbs");
    }

    #[test]
    fn template_omits_missing_descriptions() {
        let prompt = deck_context_prompt("Rust", None);
        assert!(!prompt.contains("described as"));
    }
}
