// Short code generation with collision detection
// Codes are drawn from the secure random source and checked against the database

use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::select;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::utils::secure_random::{self, RandomSource};

// =============================================================================
// CONSTANTS
// =============================================================================

const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const MIN_CODE_LENGTH: usize = 5;
pub const MAX_CODE_LENGTH: usize = 20;
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Attempts before giving up on finding a free code
const MAX_RETRIES: usize = 10;

lazy_static! {
    /// Shape accepted for codes in request paths
    static ref CODE_PATTERN: Regex = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug)]
pub enum ShortCodeError {
    #[error("Failed to generate a unique short code, please try again")]
    MaxRetriesExceeded,

    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
}

// =============================================================================
// SHORT CODE GENERATOR
// =============================================================================

/// Clamp a requested code length into the supported range
pub fn clamp_code_length(requested: Option<i64>) -> usize {
    match requested {
        Some(n) => n.clamp(MIN_CODE_LENGTH as i64, MAX_CODE_LENGTH as i64) as usize,
        None => DEFAULT_CODE_LENGTH,
    }
}

/// Whether `code` may appear as a path segment
pub fn is_valid_code(code: &str) -> bool {
    code.len() <= 64 && CODE_PATTERN.is_match(code)
}

/// Random alphanumeric code of `length` characters (never shorter than the minimum)
pub fn generate_random_code<R>(rng: &mut R, length: usize) -> String
where
    R: RandomSource + ?Sized,
{
    (0..length.max(MIN_CODE_LENGTH))
        .filter_map(|_| secure_random::choose(rng, CODE_ALPHABET))
        .map(|&b| b as char)
        .collect()
}

pub struct ShortCodeGenerator {
    max_retries: usize,
}

impl Default for ShortCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortCodeGenerator {
    pub fn new() -> Self {
        Self {
            max_retries: MAX_RETRIES,
        }
    }

    /// Generate a code of `length` that is not yet stored
    #[instrument(skip(self, conn))]
    pub async fn generate_unique_code(
        &self,
        conn: &mut AsyncPgConnection,
        length: usize,
    ) -> Result<String, ShortCodeError> {
        let mut rng = secure_random::os_rng();

        for attempt in 1..=self.max_retries {
            let candidate = generate_random_code(&mut rng, length);

            if Self::is_code_unique(conn, &candidate).await? {
                info!(
                    "Generated unique short code (length: {}, attempts: {})",
                    candidate.len(),
                    attempt
                );
                return Ok(candidate);
            }

            warn!(
                "Short code collision detected: {} (attempt: {})",
                candidate, attempt
            );
        }

        error!(
            "Failed to generate unique short code after {} attempts",
            self.max_retries
        );
        Err(ShortCodeError::MaxRetriesExceeded)
    }

    /// Check that no stored short URL already uses `code`
    pub async fn is_code_unique(
        conn: &mut AsyncPgConnection,
        code: &str,
    ) -> Result<bool, diesel::result::Error> {
        use crate::schema::short_urls::dsl::{short_code, short_urls};

        let code_exists: bool = select(exists(short_urls.filter(short_code.eq(code))))
            .get_result(conn)
            .await?;

        Ok(!code_exists)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_code_generation_length() {
        let mut rng = StdRng::seed_from_u64(11);
        for len in [5, 6, 8, 12, 20] {
            let code = generate_random_code(&mut rng, len);
            assert_eq!(code.len(), len);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_short_lengths_are_raised_to_minimum() {
        let mut rng = StdRng::seed_from_u64(12);
        assert_eq!(generate_random_code(&mut rng, 0).len(), MIN_CODE_LENGTH);
        assert_eq!(generate_random_code(&mut rng, 3).len(), MIN_CODE_LENGTH);
    }

    #[test]
    fn test_codes_differ() {
        let mut rng = secure_random::os_rng();
        let a = generate_random_code(&mut rng, 12);
        let b = generate_random_code(&mut rng, 12);
        assert_ne!(a, b);
    }

    #[test]
    fn test_clamp_code_length() {
        assert_eq!(clamp_code_length(None), DEFAULT_CODE_LENGTH);
        assert_eq!(clamp_code_length(Some(1)), MIN_CODE_LENGTH);
        assert_eq!(clamp_code_length(Some(-4)), MIN_CODE_LENGTH);
        assert_eq!(clamp_code_length(Some(9)), 9);
        assert_eq!(clamp_code_length(Some(500)), MAX_CODE_LENGTH);
    }

    #[test]
    fn test_code_pattern() {
        assert!(is_valid_code("abc12"));
        assert!(is_valid_code("my-link_2"));
        assert!(!is_valid_code(""));
        assert!(!is_valid_code("abc!"));
        assert!(!is_valid_code("hello world"));
        assert!(!is_valid_code("😀"));
    }
}
