use std::ops::Range;

use crate::crypto::key_pair::KeyPair;
use crate::store::creds::Credentials;
use crate::store::keys::KeyStore;

/// Mints `count` fresh pre-keys starting at the next unissued id and stores
/// them for later upload. Returns the range of minted ids.
pub fn mint_pre_keys(creds: &mut Credentials, keys: &mut KeyStore, count: u32) -> Range<u32> {
    let start = creds.next_pre_key_id;
    let end = start + count;
    for id in start..end {
        keys.set_pre_key(id, Some(KeyPair::new()));
    }
    creds.next_pre_key_id = end;
    start..end
}

/// Ids minted locally but not yet acknowledged by the server.
pub fn unuploaded_pre_key_ids(creds: &Credentials) -> Range<u32> {
    creds.first_unuploaded_pre_key_id..creds.next_pre_key_id
}

/// Records that every pre-key minted so far reached the server.
pub fn mark_pre_keys_uploaded(creds: &mut Credentials) {
    creds.first_unuploaded_pre_key_id = creds.next_pre_key_id;
    creds.server_has_pre_keys = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::creds::AuthState;

    #[test]
    fn minting_advances_the_counter_and_fills_the_store() {
        let AuthState {
            mut creds,
            mut keys,
        } = AuthState::new();

        let minted = mint_pre_keys(&mut creds, &mut keys, 5);
        assert_eq!(minted, 1..6);
        assert_eq!(creds.next_pre_key_id, 6);
        assert_eq!(keys.pre_keys.len(), 5);
        assert!(keys.get_pre_key(1).is_some());
        assert!(keys.get_pre_key(6).is_none());

        assert_eq!(unuploaded_pre_key_ids(&creds), 1..6);
        mark_pre_keys_uploaded(&mut creds);
        assert!(creds.server_has_pre_keys);
        assert!(unuploaded_pre_key_ids(&creds).is_empty());

        let more = mint_pre_keys(&mut creds, &mut keys, 3);
        assert_eq!(more, 6..9);
        assert_eq!(unuploaded_pre_key_ids(&creds), 6..9);
    }
}
