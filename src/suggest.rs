//! Task suggestions keyed by category keywords.

/// A keyword and the suggestions offered when input mentions it.
pub type Category = (&'static str, &'static [&'static str]);

/// Built-in categories, checked in order.
///
/// `workout` must come before `work`, since any input containing the
/// former also contains the latter.
pub const DEFAULT_CATEGORIES: &[Category] = &[
    ("groceries", &["Buy milk", "Buy eggs", "Buy bread", "Buy fruits"]),
    ("workout", &["Do cardio", "Lift weights", "Stretch", "Yoga"]),
    ("work", &["Check emails", "Team meeting", "Update reports", "Client call"]),
];

/// Inputs this short (in characters) never produce suggestions.
const MIN_INPUT_CHARS: usize = 3;

/// Immutable keyword → suggestion lookup.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionIndex {
    categories: &'static [Category],
}

impl Default for SuggestionIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionIndex {
    /// The built-in table.
    #[must_use]
    pub const fn new() -> Self {
        Self { categories: DEFAULT_CATEGORIES }
    }

    /// A custom table; keywords are expected in lowercase.
    #[must_use]
    pub const fn with_categories(categories: &'static [Category]) -> Self {
        Self { categories }
    }

    /// The categories, in match order.
    #[must_use]
    pub const fn categories(&self) -> &'static [Category] {
        self.categories
    }

    /// Suggestions for the first category whose keyword appears in `input`
    /// (case-insensitively), or nothing.
    #[must_use]
    pub fn suggest(&self, input: &str) -> &'static [&'static str] {
        if input.chars().count() < MIN_INPUT_CHARS {
            return &[];
        }
        let lowered = input.to_lowercase();
        self.categories
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, suggestions)| *suggestions)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_groceries() {
        let index = SuggestionIndex::new();
        assert_eq!(
            index.suggest("I need groceries"),
            ["Buy milk", "Buy eggs", "Buy bread", "Buy fruits"]
        );
    }

    #[test]
    fn test_suggest_is_case_insensitive() {
        let index = SuggestionIndex::new();
        assert_eq!(index.suggest("GROCERIES run")[0], "Buy milk");
    }

    #[test]
    fn test_suggest_workout_before_work() {
        let index = SuggestionIndex::new();
        assert_eq!(index.suggest("morning workout")[0], "Do cardio");
        assert_eq!(index.suggest("work stuff")[0], "Check emails");
    }

    #[test]
    fn test_suggest_short_input() {
        let index = SuggestionIndex::new();
        assert!(index.suggest("hi").is_empty());
        assert!(index.suggest("").is_empty());
    }

    #[test]
    fn test_suggest_no_match() {
        let index = SuggestionIndex::new();
        assert!(index.suggest("xyz").is_empty());
    }

    #[test]
    fn test_custom_categories() {
        const GARDEN: &[Category] = &[("garden", &["Water plants", "Mow lawn"])];
        let index = SuggestionIndex::with_categories(GARDEN);
        assert_eq!(index.suggest("garden day"), ["Water plants", "Mow lawn"]);
        assert!(index.suggest("groceries").is_empty());
    }
}
