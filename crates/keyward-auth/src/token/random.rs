//! Opaque token generation.
//!
//! Access and refresh tokens minted by this crate carry no structure: they
//! are the SHA-1 digest of 256 bytes drawn from the operating system CSPRNG,
//! rendered as 40 lowercase hex characters. They are validated only by exact
//! lookup in the host's token store.

use rand::RngCore;
use rand::rngs::OsRng;
use sha1::{Digest, Sha1};

/// Number of random bytes hashed into each opaque token.
pub const RANDOM_TOKEN_ENTROPY_BYTES: usize = 256;

/// Length of a generated token in characters.
pub const RANDOM_TOKEN_LENGTH: usize = 40;

/// Generates an opaque random token.
///
/// The randomness source may block while the OS entropy pool initializes,
/// hence the async signature. A failing OS RNG is unrecoverable and panics
/// inside `OsRng`.
pub async fn generate_random_token() -> String {
    let mut bytes = [0u8; RANDOM_TOKEN_ENTROPY_BYTES];
    OsRng.fill_bytes(&mut bytes);

    let digest = Sha1::digest(bytes);
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tokio_test::block_on;

    #[tokio::test]
    async fn test_token_is_lowercase_hex() {
        let token = generate_random_token().await;
        assert_eq!(token.len(), RANDOM_TOKEN_LENGTH);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_tokens_do_not_collide() {
        block_on(async {
            let mut seen = HashSet::with_capacity(10_000);
            for _ in 0..10_000 {
                assert!(seen.insert(generate_random_token().await));
            }
        });
    }
}
