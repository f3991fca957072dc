//! Room-code generation.

use flipmatch_protocol::RoomCode;
use rand::Rng;

/// Codes are drawn from uppercase letters and digits.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Code length. 36^4 ≈ 1.7M combinations, so collision retries against the
/// live-room set stay rare at any plausible room count.
const CODE_LEN: usize = 4;

/// Generates a random room code. Uniqueness against live rooms is the
/// registry's job — it redraws on collision.
pub(crate) fn generate() -> RoomCode {
    let mut rng = rand::rng();
    let code: String = (0..CODE_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect();
    RoomCode::new(code)
}
