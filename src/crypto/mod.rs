pub mod key_pair;
pub mod xed25519;
