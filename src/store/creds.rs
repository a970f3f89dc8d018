use crate::crypto::key_pair::{KeyPair, PreKey};
use crate::store::keys::KeyStore;
use rand::rngs::OsRng;
use rand::{Rng, TryRngCore};
use serde::{Deserialize, Serialize};
use walink_binary::jid::Jid;
use walink_proto::whatsapp as wa;

/// Largest registration id the server accepts; ids are drawn uniformly
/// from `1..=REGISTRATION_ID_MAX`.
const REGISTRATION_ID_MAX: u32 = 16383;

/// A verified binding of a remote-visible identifier to the public key the
/// owning account signs with. Appended on every successful pairing, never
/// overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalIdentity {
    pub account_id: Jid,
    pub account_signature_key: [u8; 32],
}

/// Who this device is once an account has claimed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Me {
    pub id: Jid,
    pub verified_name: String,
}

/// Long-term identity and registration state of one device. Created once;
/// `account`, `me` and `signal_identities` are populated only after a
/// successful pairing, the rest persists for the lifetime of the
/// registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub noise_key: KeyPair,
    pub signed_identity_key: KeyPair,
    pub signed_pre_key: PreKey,
    pub registration_id: u32,
    #[serde(with = "base64_secret")]
    pub adv_secret_key: [u8; 32],
    pub next_pre_key_id: u32,
    pub first_unuploaded_pre_key_id: u32,
    pub server_has_pre_keys: bool,
    pub account: Option<wa::AdvSignedDeviceIdentity>,
    pub me: Option<Me>,
    pub signal_identities: Vec<SignalIdentity>,
}

/// A fresh credential set together with its (empty) key store.
pub struct AuthState {
    pub creds: Credentials,
    pub keys: KeyStore,
}

impl AuthState {
    /// Creates a new, unregistered device identity with fresh keys. The
    /// signed pre-key gets id 1 and is signed by the identity key.
    pub fn new() -> Self {
        let identity_key = KeyPair::new();
        let signed_pre_key = identity_key.create_signed_prekey(1);

        let mut adv_secret_key = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut adv_secret_key)
            .expect("CSPRNG failure for account secret");

        Self {
            creds: Credentials {
                noise_key: KeyPair::new(),
                signed_identity_key: identity_key,
                signed_pre_key,
                registration_id: generate_registration_id(),
                adv_secret_key,
                next_pre_key_id: 1,
                first_unuploaded_pre_key_id: 1,
                server_has_pre_keys: false,
                account: None,
                me: None,
                signal_identities: Vec::new(),
            },
            keys: KeyStore::new(),
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn generate_registration_id() -> u32 {
    OsRng.unwrap_err().random_range(1..=REGISTRATION_ID_MAX)
}

/// The account secret is base64 at rest; in memory it stays raw bytes.
mod base64_secret {
    use base64::Engine as _;
    use base64::prelude::BASE64_STANDARD;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let decoded = BASE64_STANDARD
            .decode(&encoded)
            .map_err(D::Error::custom)?;
        decoded
            .try_into()
            .map_err(|_| D::Error::custom("account secret must be 32 bytes"))
    }
}
