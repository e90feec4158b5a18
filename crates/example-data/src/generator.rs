//! Deterministic user generation.
//!
//! A seeded ChaCha RNG drives the `fake` generators, so generation is a pure
//! function of `(seed, count)`. Emails are derived from the generated name
//! with the record index as a suffix, which keeps them unique within a batch
//! regardless of name collisions.

use fake::Fake;
use fake::faker::job::raw::Title;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lower bound of generated phone numbers (inclusive); 8 digits.
const PHONE_MIN: i64 = 10_000_000;

/// Upper bound of generated phone numbers (exclusive).
const PHONE_MAX: i64 = 100_000_000;

/// One generated user, ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Job title.
    pub position: String,
    /// 8-digit phone number.
    pub phone: i64,
    /// Unique email derived from the name and record index.
    pub email: String,
}

/// Generate `count` users from `seed`.
///
/// # Examples
/// ```
/// use example_data::generate_users;
///
/// let users = generate_users(42, 3);
/// assert_eq!(users.len(), 3);
/// // Same seed produces identical users.
/// assert_eq!(users, generate_users(42, 3));
/// ```
pub fn generate_users(seed: u64, count: usize) -> Vec<SeedUser> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..count)
        .map(|index| {
            let first_name: String = FirstName(EN).fake_with_rng(&mut rng);
            let last_name: String = LastName(EN).fake_with_rng(&mut rng);
            let position: String = Title(EN).fake_with_rng(&mut rng);
            let phone: i64 = rng.random_range(PHONE_MIN..PHONE_MAX);
            let email = email_for(&first_name, &last_name, index);

            SeedUser {
                first_name,
                last_name,
                position,
                phone,
                email,
            }
        })
        .collect()
}

fn email_for(first_name: &str, last_name: &str, index: usize) -> String {
    format!(
        "{}.{}{}@example.com",
        email_slug(first_name),
        email_slug(last_name),
        index
    )
}

/// Reduce a generated name to an email-safe token.
fn email_slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    if slug.is_empty() { "user".into() } else { slug }
}
