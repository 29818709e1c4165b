use std::fmt;
use std::sync::Arc;

/// Pluggable text-to-slug transform.
#[derive(Clone)]
pub struct Slugifier(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl Slugifier {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, text: &str) -> String {
        (self.0)(text)
    }
}

impl Default for Slugifier {
    fn default() -> Self {
        Self::new(default_slugify)
    }
}

impl fmt::Debug for Slugifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Slugifier(..)")
    }
}

/// Lowercase, transliterate to ASCII, collapse every run of other
/// characters into a single `-` and trim it from both ends.
pub fn default_slugify(text: &str) -> String {
    ::slug::slugify(text)
}

/// First `max_length` characters of `text`.
pub fn crop(text: &str, max_length: usize) -> String {
    text.chars().take(max_length).collect()
}
