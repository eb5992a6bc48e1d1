//! Id generation for tasks, subtasks and folders.
//!
//! Ids are generated from the entity text by:
//! 1. Converting to lowercase
//! 2. Replacing non-alphanumeric characters with hyphens
//! 3. Collapsing multiple hyphens
//! 4. Trimming leading/trailing hyphens
//! 5. Appending 4 random hex characters
//!
//! The suffix alone is not collision-free, so stores go through
//! [`generate_unique_id`], which retries against the ids already in use.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Global counter for deterministic ID generation in tests.
static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Whether to use deterministic IDs (for testing).
static USE_DETERMINISTIC_IDS: AtomicBool = AtomicBool::new(false);

/// Maximum slug length before the suffix.
const MAX_SLUG_LEN: usize = 40;

/// Enable deterministic ID generation for testing.
///
/// When enabled, IDs will use a counter instead of random hex.
pub fn enable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(true, Ordering::SeqCst);
    TEST_COUNTER.store(0, Ordering::SeqCst);
}

/// Disable deterministic ID generation.
pub fn disable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(false, Ordering::SeqCst);
}

/// Convert text to a slug of at most `max_len` characters.
#[must_use]
pub fn slugify(text: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(text.len().min(max_len));
    let mut last_was_hyphen = true; // Start true to avoid leading hyphen

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.len() > max_len {
        slug.truncate(max_len);
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Generate a random 4-character hex suffix.
#[allow(clippy::cast_possible_truncation)]
fn random_suffix() -> String {
    if USE_DETERMINISTIC_IDS.load(Ordering::SeqCst) {
        let count = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        format!("{count:04x}")
    } else {
        use std::collections::hash_map::RandomState;
        use std::hash::{BuildHasher, Hasher};

        let state = RandomState::new();
        let mut hasher = state.build_hasher();
        // Truncation is fine, only the low bits are used
        hasher.write_u64(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |d| d.as_nanos() as u64),
        );
        let hash = hasher.finish();
        format!("{:04x}", hash & 0xFFFF)
    }
}

/// Generate an id from `text`, falling back to `kind` when the text has no
/// usable characters.
#[must_use]
pub fn generate_id(kind: &str, text: &str) -> String {
    let slug = slugify(text, MAX_SLUG_LEN);
    let suffix = random_suffix();

    if slug.is_empty() {
        format!("{kind}-{suffix}")
    } else {
        format!("{slug}-{suffix}")
    }
}

/// Generate an id that `taken` reports as unused.
pub fn generate_unique_id(kind: &str, text: &str, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = generate_id(kind, text);
        if !taken(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serial_test::serial;
    use std::cell::Cell;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Buy milk", 40), "buy-milk");
        assert_eq!(slugify("Team meeting!", 40), "team-meeting");
        assert_eq!(slugify("  Groceries  ", 40), "groceries");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("", 40), "");
        assert_eq!(slugify("!!!", 40), "");
        assert_eq!(slugify("日本語", 40), "");
    }

    #[test]
    fn test_slugify_truncation_removes_trailing_hyphens() {
        let slug = slugify("abc  d", 4);
        assert_eq!(slug, "abc");
    }

    #[test]
    #[serial]
    fn test_generate_id_format() {
        enable_deterministic_ids();

        let id = generate_id("task", "Buy milk");
        assert!(id.starts_with("buy-milk-"));
        assert_eq!(id.len(), "buy-milk-".len() + 4);
        let id = generate_id("folder", "???");
        assert!(id.starts_with("folder-"));

        disable_deterministic_ids();
    }

    #[test]
    #[serial]
    fn test_deterministic_ids_increment() {
        enable_deterministic_ids();

        let first = generate_id("task", "test");
        let second = generate_id("task", "test");
        assert_ne!(first, second);

        disable_deterministic_ids();
    }

    #[test]
    fn test_generate_unique_id_skips_taken() {
        let attempts = Cell::new(0);
        let id = generate_unique_id("task", "Stretch", |candidate| {
            assert!(candidate.starts_with("stretch-"));
            attempts.set(attempts.get() + 1);
            attempts.get() < 3
        });
        assert_eq!(attempts.get(), 3);
        assert!(id.starts_with("stretch-"));
    }

    proptest! {
        #[test]
        fn prop_slug_is_clean(text in ".{0,80}") {
            let slug = slugify(&text, MAX_SLUG_LEN);
            prop_assert!(slug.len() <= MAX_SLUG_LEN);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }
}
