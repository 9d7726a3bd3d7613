//! Test fixtures and constants.

/// A valid hex master key.
pub const MASTER_KEY_A: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

/// A second valid hex master key.
pub const MASTER_KEY_B: &str = "f0e1d2c3b4a5968778695a4b3c2d1e0f00112233445566778899aabbccddeeff";

/// A 16-byte key, too short for AES-256.
pub const SHORT_KEY: &str = "000102030405060708090a0b0c0d0e0f";

/// Sample users and their API keys.
pub const API_KEYS: &[(&str, &str)] = &[
    ("alice", "sk-abc123"),
    ("bob", "AIzaSyD-bobs_key.v2"),
    ("3f1c2a9e-7b44-4c1e-9d8a-0e5b6f7a8c9d", "gsk_live_0123456789"),
];
