//! Wallet display-id utility.
//!
//! A display id is a human-facing, 12-digit numeric wallet identifier shown
//! in the app as `DDD-DDD-DDD-DDD`. It is a display identifier, not a
//! credential: generation does no collision avoidance, and callers that need
//! uniqueness must enforce it at the gateway when the wallet row is written.

use rand::Rng;

/// Number of decimal digits in a display id.
pub const DISPLAY_ID_LEN: usize = 12;

/// Number of digits per dash-separated group when formatted.
const GROUP_LEN: usize = 3;

/// Generate a new display id: 12 independently, uniformly chosen decimal
/// digits.
#[must_use]
pub fn generate() -> String {
    let mut rng = rand::rng();
    (0..DISPLAY_ID_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10)))
        .collect()
}

/// Returns true iff `s` is exactly 12 ASCII decimal digits.
#[must_use]
pub fn is_valid(s: &str) -> bool {
    s.len() == DISPLAY_ID_LEN && s.bytes().all(|b| b.is_ascii_digit())
}

/// Format a display id as four dash-separated groups of three digits.
///
/// Invalid input is returned unchanged - the caller may be holding a legacy
/// or foreign identifier, and a broken format is preferable to a panic in a
/// display path.
#[must_use]
pub fn format(s: &str) -> String {
    if !is_valid(s) {
        return s.to_string();
    }

    s.as_bytes()
        .chunks(GROUP_LEN)
        .map(|group| std::str::from_utf8(group).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("-")
}
