use super::slugify::Slugifier;

pub const DEFAULT_SEPARATOR: &str = "-";
pub const DEFAULT_MAX_LENGTH: usize = 50;

pub const ENV_SEPARATOR: &str = "MEMOSLUG_SEPARATOR";
pub const ENV_MAX_LENGTH: &str = "MEMOSLUG_MAX_LENGTH";

/// Defaults shared by slug fields
///
/// Passed explicitly to [`SlugField::with_settings`](super::SlugField::with_settings)
/// so fields with different transforms can coexist in one process.
#[derive(Debug, Clone)]
pub struct SlugSettings {
    /// Joins the base slug and the numeric disambiguator
    pub separator: String,

    /// Maximum stored length, in characters
    pub max_length: usize,

    /// Transform applied to the resolved source value
    pub slugify: Slugifier,
}

impl SlugSettings {
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            slugify: Slugifier::default(),
        }
    }

    /// Set the disambiguator separator
    pub fn separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Set the maximum slug length
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = max;
        self
    }

    /// Set the slugify transform
    pub fn slugify(mut self, slugify: Slugifier) -> Self {
        self.slugify = slugify;
        self
    }

    /// Read overrides from `MEMOSLUG_SEPARATOR` and `MEMOSLUG_MAX_LENGTH`
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::new();

        if let Some(separator) = lookup(ENV_SEPARATOR) {
            settings = settings.separator(&separator);
        }

        if let Some(max) = lookup(ENV_MAX_LENGTH) {
            let max = max
                .trim()
                .parse()
                .map_err(|_| format!("Invalid {}: '{}'", ENV_MAX_LENGTH, max))?;
            settings = settings.max_length(max);
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_length == 0 {
            return Err("max_length must be > 0".to_string());
        }

        if self.separator.chars().count() >= self.max_length {
            return Err("separator must be shorter than max_length".to_string());
        }

        Ok(())
    }
}

impl Default for SlugSettings {
    fn default() -> Self {
        Self::new()
    }
}
