//! Autocomplete suggestions for the message input

use crate::language::Language;

/// Maximum number of suggestions returned
pub const MAX_SUGGESTIONS: usize = 5;

/// Filter the phrase list of `language` by case-insensitive containment of `input`.
///
/// Results keep the order of the phrase list. Blank input gives no suggestions;
/// otherwise the input is matched as typed, surrounding spaces included.
pub fn suggestions(input: &str, language: Language) -> Vec<&'static str> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    let needle = input.to_lowercase();

    language
        .phrases()
        .iter()
        .copied()
        .filter(|phrase| phrase.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(suggestions("", Language::En).is_empty());
        assert!(suggestions("   ", Language::En).is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let lower = suggestions("dr", Language::En);
        let upper = suggestions("DR", Language::En);

        assert!(lower.contains(&"Who is Dr."));
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_capped_and_ordered() {
        // "e" matches nearly every English phrase
        let result = suggestions("e", Language::En);
        assert_eq!(result.len(), MAX_SUGGESTIONS);

        let positions: Vec<usize> = result
            .iter()
            .map(|s| Language::En.phrases().iter().position(|p| p == s).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_trailing_space_is_part_of_match() {
        let with_space = suggestions("is ", Language::En);
        assert!(with_space.contains(&"Who is Dr."));
        assert!(!with_space.contains(&"What are the admission requirements?"));

        let without_space = suggestions("is", Language::En);
        assert!(without_space.contains(&"What are the admission requirements?"));
    }

    #[test]
    fn test_no_match() {
        assert!(suggestions("zzzz", Language::En).is_empty());
    }

    #[test]
    fn test_uses_selected_language() {
        let result = suggestions("kütüphane", Language::Tr);
        assert_eq!(result, vec!["Kütüphane nerede?"]);
        assert!(suggestions("kütüphane", Language::En).is_empty());
    }
}
