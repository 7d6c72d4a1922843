//! Seed Hashing
//!
//! Turns arbitrary text into a 32-bit seed. Every device must arrive at the
//! same seed for the same text, so the arithmetic below reproduces 32-bit
//! two's-complement wraparound exactly.

/// Multiplier applied to the accumulator for every character code.
pub const HASH_MULTIPLIER: i32 = 31;

/// Hash a string into a non-negative 32-bit seed.
///
/// Iterates the UTF-16 code units of `text`, updating a signed 32-bit
/// accumulator as `acc = acc * 31 + code` with wrapping overflow, and returns
/// the absolute value of the result. `i32::MIN` maps to `2^31`, which is why
/// the return type is `u32`.
///
/// # Example
///
/// ```
/// use role_reveal::core::hash::hash_seed;
///
/// assert_eq!(hash_seed("hello"), 99162322);
/// assert_eq!(hash_seed(""), 0);
/// ```
pub fn hash_seed(text: &str) -> u32 {
    let acc = text.encode_utf16().fold(0i32, |acc, code| {
        acc.wrapping_mul(HASH_MULTIPLIER).wrapping_add(i32::from(code))
    });
    acc.unsigned_abs()
}

// =============================================================================
// TESTS
// =============================================================================
