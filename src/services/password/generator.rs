// Secure password generation
// Class composition, exclusion filtering, per-class seeding and a Fisher-Yates shuffle

use std::collections::BTreeSet;
use std::fmt;

use rand::rngs::OsRng;
use serde::Serialize;
use thiserror::Error;

use crate::utils::secure_random::{self, RandomSource};

// =============================================================================
// ALPHABETS
// =============================================================================

const UPPER_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGIT_ALPHABET: &str = "0123456789";
const SYMBOL_ALPHABET: &str = "!@#$%^&*()-_=+[]{}|;:,.<>?";

/// Glyphs that are easy to confuse with each other in most fonts
pub const AMBIGUOUS_CHARS: &str = "Il1O0o";

// =============================================================================
// CHARACTER CLASSES
// =============================================================================

/// One of the four fixed character classes.
///
/// The declaration order is the seeding order used when every class must be
/// represented in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    Upper,
    Lower,
    Digits,
    Symbols,
}

impl CharClass {
    pub const ALL: [CharClass; 4] = [
        CharClass::Upper,
        CharClass::Lower,
        CharClass::Digits,
        CharClass::Symbols,
    ];

    pub fn alphabet(self) -> &'static str {
        match self {
            CharClass::Upper => UPPER_ALPHABET,
            CharClass::Lower => LOWER_ALPHABET,
            CharClass::Digits => DIGIT_ALPHABET,
            CharClass::Symbols => SYMBOL_ALPHABET,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CharClass::Upper => "upper",
            CharClass::Lower => "lower",
            CharClass::Digits => "digits",
            CharClass::Symbols => "symbols",
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password length must be at least 1 (got {length})")]
    InvalidLength { length: usize },

    #[error("At least one character class must be enabled (upper/lower/digits/symbols)")]
    NoClassesEnabled,

    #[error("After applying exclusions, the '{class}' class has no characters left")]
    ClassExhaustedByExclusion { class: CharClass },

    #[error("No characters available to build a password (empty pool)")]
    EmptyPool,

    #[error(
        "Password length {length} is too short to include one character from each of the {required} enabled classes"
    )]
    LengthBelowRequiredClasses { length: usize, required: usize },
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Which classes to draw from and which characters to leave out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub use_upper: bool,
    pub use_lower: bool,
    pub use_digits: bool,
    pub use_symbols: bool,
    pub avoid_ambiguous: bool,
    pub exclude: BTreeSet<char>,
    pub require_each_class: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            use_upper: true,
            use_lower: true,
            use_digits: true,
            use_symbols: false,
            avoid_ambiguous: false,
            exclude: BTreeSet::new(),
            require_each_class: true,
        }
    }
}

impl GenerationOptions {
    /// Add every character of `chars` to the explicit exclusion set
    pub fn with_exclude(mut self, chars: &str) -> Self {
        self.exclude.extend(chars.chars());
        self
    }

    pub fn is_enabled(&self, class: CharClass) -> bool {
        match class {
            CharClass::Upper => self.use_upper,
            CharClass::Lower => self.use_lower,
            CharClass::Digits => self.use_digits,
            CharClass::Symbols => self.use_symbols,
        }
    }

    /// Enabled classes in seeding order
    pub fn enabled_classes(&self) -> Vec<CharClass> {
        CharClass::ALL
            .into_iter()
            .filter(|class| self.is_enabled(*class))
            .collect()
    }

    /// Explicit exclusions plus the ambiguous set when requested
    pub fn exclusion_set(&self) -> BTreeSet<char> {
        let mut excluded = self.exclude.clone();
        if self.avoid_ambiguous {
            excluded.extend(AMBIGUOUS_CHARS.chars());
        }
        excluded
    }

    /// Filter every enabled class against the exclusion set.
    ///
    /// Fails when nothing is enabled or when an enabled class loses all of
    /// its characters.
    pub fn filtered_classes(&self) -> Result<Vec<(CharClass, Vec<char>)>, PasswordError> {
        let classes = self.enabled_classes();
        if classes.is_empty() {
            return Err(PasswordError::NoClassesEnabled);
        }

        let excluded = self.exclusion_set();
        classes
            .into_iter()
            .map(|class| {
                let chars: Vec<char> = class
                    .alphabet()
                    .chars()
                    .filter(|c| !excluded.contains(c))
                    .collect();
                if chars.is_empty() {
                    Err(PasswordError::ClassExhaustedByExclusion { class })
                } else {
                    Ok((class, chars))
                }
            })
            .collect()
    }
}

// =============================================================================
// PASSWORD GENERATOR
// =============================================================================

/// Password generator bound to a random source.
///
/// `PasswordGenerator::new()` uses the OS CSPRNG; tests hand in a seeded
/// generator through [`PasswordGenerator::with_rng`].
pub struct PasswordGenerator<R = OsRng> {
    rng: R,
}

impl PasswordGenerator<OsRng> {
    pub fn new() -> Self {
        Self {
            rng: secure_random::os_rng(),
        }
    }
}

impl Default for PasswordGenerator<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> PasswordGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Build one password of exactly `length` characters
    pub fn generate(
        &mut self,
        length: usize,
        options: &GenerationOptions,
    ) -> Result<String, PasswordError> {
        if length < 1 {
            return Err(PasswordError::InvalidLength { length });
        }

        let classes = options.filtered_classes()?;

        // Classes are not deduplicated against each other, so a character
        // shared by two classes is sampled with double weight.
        let pool: Vec<char> = classes
            .iter()
            .flat_map(|(_, chars)| chars.iter().copied())
            .collect();
        if pool.is_empty() {
            return Err(PasswordError::EmptyPool);
        }

        if options.require_each_class && length < classes.len() {
            return Err(PasswordError::LengthBelowRequiredClasses {
                length,
                required: classes.len(),
            });
        }

        let mut password: Vec<char> = Vec::with_capacity(length);

        if options.require_each_class {
            for (_, chars) in &classes {
                password.push(chars[self.rng.uniform(chars.len())]);
            }
        }

        while password.len() < length {
            password.push(pool[self.rng.uniform(pool.len())]);
        }

        secure_random::shuffle(&mut self.rng, &mut password);

        Ok(password.into_iter().collect())
    }

    /// Build `count` independent passwords; the first failure aborts the batch
    pub fn generate_multiple(
        &mut self,
        count: usize,
        length: usize,
        options: &GenerationOptions,
    ) -> Result<Vec<String>, PasswordError> {
        (0..count)
            .map(|_| self.generate(length, options))
            .collect()
    }
}

/// Generate a single password with the OS random source
pub fn generate_password(length: usize, options: &GenerationOptions) -> Result<String, PasswordError> {
    PasswordGenerator::new().generate(length, options)
}

/// Generate a batch of passwords with the OS random source
pub fn generate_passwords(
    count: usize,
    length: usize,
    options: &GenerationOptions,
) -> Result<Vec<String>, PasswordError> {
    PasswordGenerator::new().generate_multiple(count, length, options)
}

// =============================================================================
// TESTS
// =============================================================================
