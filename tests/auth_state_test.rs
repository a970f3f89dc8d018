use walink::crypto::key_pair::DJB_TYPE;
use walink::crypto::xed25519;
use walink::store::AuthState;

#[test]
fn fresh_identity_signed_prekey_verifies_under_identity_key() {
    let state = AuthState::new();
    let creds = &state.creds;

    let mut message = Vec::with_capacity(33);
    message.push(DJB_TYPE);
    message.extend_from_slice(&creds.signed_pre_key.key_pair.public_key);

    let signature = creds
        .signed_pre_key
        .signature
        .expect("fresh signed prekey carries a signature");
    assert!(xed25519::verify(
        &creds.signed_identity_key.public_key,
        &message,
        &signature
    ));
    assert_eq!(creds.signed_pre_key.key_id, 1);
}

#[test]
fn fresh_state_starts_unregistered() {
    let state = AuthState::new();
    let creds = &state.creds;

    assert_eq!(creds.next_pre_key_id, 1);
    assert_eq!(creds.first_unuploaded_pre_key_id, 1);
    assert!(!creds.server_has_pre_keys);
    assert!(creds.account.is_none());
    assert!(creds.me.is_none());
    assert!(creds.signal_identities.is_empty());

    assert!(state.keys.pre_keys.is_empty());
    assert!(state.keys.sessions.is_empty());
    assert!(state.keys.sender_keys.is_empty());
    assert!(state.keys.app_state_sync_keys.is_empty());
    assert!(state.keys.app_state_versions.is_empty());
}

#[test]
fn registration_id_stays_in_the_valid_range() {
    for _ in 0..64 {
        let id = AuthState::new().creds.registration_id;
        assert!((1..=16383).contains(&id), "registration id {id} out of range");
    }
}

#[test]
fn fresh_states_do_not_share_key_material() {
    let a = AuthState::new();
    let b = AuthState::new();

    assert_ne!(
        a.creds.signed_identity_key.private_key,
        b.creds.signed_identity_key.private_key
    );
    assert_ne!(a.creds.noise_key.private_key, b.creds.noise_key.private_key);
    assert_ne!(a.creds.adv_secret_key, b.creds.adv_secret_key);
    assert_ne!(
        a.creds.signed_identity_key.public_key,
        a.creds.noise_key.public_key
    );
}

#[test]
fn credentials_serialize_with_base64_account_secret() {
    let state = AuthState::new();
    let json = serde_json::to_value(&state.creds).unwrap();

    let encoded = json["adv_secret_key"]
        .as_str()
        .expect("account secret serializes as a base64 string");
    assert_eq!(encoded.len(), 44); // 32 bytes, standard base64 with padding

    let restored: walink::store::Credentials = serde_json::from_value(json).unwrap();
    assert_eq!(restored.adv_secret_key, state.creds.adv_secret_key);
    assert_eq!(restored.registration_id, state.creds.registration_id);
    assert_eq!(
        restored.signed_identity_key.private_key,
        state.creds.signed_identity_key.private_key
    );
}
