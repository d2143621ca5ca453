//! Vocabulary words and dictionary resolution
//!
//! A `Dictionary` is built once per engine. Words are addressed by `WordId`
//! so pooled enemies can refer to their text without owning it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A vocabulary pair (immutable once loaded)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Prompt shown to the player
    pub source: Arc<str>,
    /// Translation carried by the enemies
    pub target: Arc<str>,
    #[serde(default)]
    pub category: Arc<str>,
}

impl Word {
    pub fn new(source: &str, target: &str, category: &str) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            category: category.into(),
        }
    }
}

/// Index of a word in the active dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WordId(pub u32);

impl WordId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Built-in word list: (english, hebrew, category)
const DEFAULT_WORDS: &[(&str, &str, &str)] = &[
    ("dog", "כלב", "animals"),
    ("cat", "חתול", "animals"),
    ("horse", "סוס", "animals"),
    ("bird", "ציפור", "animals"),
    ("fish", "דג", "animals"),
    ("lion", "אריה", "animals"),
    ("bear", "דוב", "animals"),
    ("cow", "פרה", "animals"),
    ("elephant", "פיל", "animals"),
    ("monkey", "קוף", "animals"),
    ("bread", "לחם", "food"),
    ("water", "מים", "food"),
    ("apple", "תפוח", "food"),
    ("milk", "חלב", "food"),
    ("egg", "ביצה", "food"),
    ("cheese", "גבינה", "food"),
    ("soup", "מרק", "food"),
    ("salt", "מלח", "food"),
    ("meat", "בשר", "food"),
    ("honey", "דבש", "food"),
    ("red", "אדום", "colors"),
    ("blue", "כחול", "colors"),
    ("green", "ירוק", "colors"),
    ("yellow", "צהוב", "colors"),
    ("black", "שחור", "colors"),
    ("white", "לבן", "colors"),
    ("orange", "כתום", "colors"),
    ("purple", "סגול", "colors"),
    ("pink", "ורוד", "colors"),
    ("brown", "חום", "colors"),
    ("book", "ספר", "school"),
    ("pencil", "עיפרון", "school"),
    ("teacher", "מורה", "school"),
    ("student", "תלמיד", "school"),
    ("table", "שולחן", "school"),
    ("chair", "כיסא", "school"),
    ("class", "כיתה", "school"),
    ("notebook", "מחברת", "school"),
    ("bag", "תיק", "school"),
    ("lesson", "שיעור", "school"),
];

/// The active word set for a session
#[derive(Debug, Clone)]
pub struct Dictionary {
    words: Vec<Word>,
}

impl Dictionary {
    /// Every built-in word
    pub fn builtin() -> Self {
        Self {
            words: DEFAULT_WORDS
                .iter()
                .map(|(source, target, category)| Word::new(source, target, category))
                .collect(),
        }
    }

    /// Wrap an explicit list (may be empty; see `resolve` for fallback)
    pub fn from_words(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Resolve the session dictionary.
    ///
    /// A non-empty custom list wins. Otherwise the built-in words filtered by
    /// category. Anything that comes out empty degrades to the full built-in
    /// dictionary rather than failing.
    pub fn resolve(category: Option<&str>, custom: Option<&[Word]>) -> Self {
        if let Some(custom) = custom {
            if !custom.is_empty() {
                return Self::from_words(custom.to_vec());
            }
            log::warn!("Custom dictionary is empty, falling back to built-in words");
        }

        let builtin = Self::builtin();
        let Some(category) = category else {
            return builtin;
        };

        let filtered: Vec<Word> = builtin
            .words
            .iter()
            .filter(|w| w.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect();

        if filtered.is_empty() {
            log::warn!("Category '{}' has no words, using full dictionary", category);
            builtin
        } else {
            Self::from_words(filtered)
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, id: WordId) -> Option<&Word> {
        self.words.get(id.index())
    }

    /// Word for an id handed out by this dictionary
    ///
    /// Ids only ever come from `ids()`, so an out-of-range id is a bug.
    pub fn word(&self, id: WordId) -> &Word {
        &self.words[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = WordId> + '_ {
        (0..self.words.len() as u32).map(WordId)
    }

    /// Distinct categories in insertion order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for word in &self.words {
            if !seen.contains(&&*word.category) {
                seen.push(&word.category);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_categories() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.len(), DEFAULT_WORDS.len());
        assert_eq!(dict.categories(), vec!["animals", "food", "colors", "school"]);
    }

    #[test]
    fn test_resolve_category_filters() {
        let dict = Dictionary::resolve(Some("Colors"), None);
        assert_eq!(dict.len(), 10);
        assert!(dict.ids().all(|id| &*dict.word(id).category == "colors"));
    }

    #[test]
    fn test_resolve_unknown_category_falls_back() {
        let dict = Dictionary::resolve(Some("astronomy"), None);
        assert_eq!(dict.len(), DEFAULT_WORDS.len());
    }

    #[test]
    fn test_resolve_empty_custom_falls_back() {
        let dict = Dictionary::resolve(None, Some(&[]));
        assert_eq!(dict.len(), DEFAULT_WORDS.len());
    }

    #[test]
    fn test_resolve_custom_wins_over_category() {
        let custom = vec![Word::new("sun", "שמש", "sky"), Word::new("moon", "ירח", "sky")];
        let dict = Dictionary::resolve(Some("food"), Some(&custom));
        assert_eq!(dict.len(), 2);
        assert_eq!(&*dict.word(WordId(1)).source, "moon");
    }
}
