use hmac::{Hmac, Mac};
use prost::Message;
use sha2::Sha256;
use walink::binary::NodeBuilder;
use walink::binary::node::Node;
use walink::crypto::key_pair::KeyPair;
use walink::crypto::xed25519;
use walink::pair::{PairError, process_pair_success};
use walink::proto::whatsapp as wa;
use walink::store::{AuthState, Credentials};

const DEVICE_JID: &str = "123456789:5@s.whatsapp.net";
const MSG_ID: &str = "pair-1";
const KEY_INDEX: u32 = 3;

/// The primary device's side of the exchange: it holds the shared account
/// secret and the account signature key, and produces the pair-success
/// stanza this core validates.
struct PhoneSide {
    secret: [u8; 32],
    account_key: KeyPair,
}

impl PhoneSide {
    fn new() -> Self {
        Self {
            secret: [0x42; 32],
            account_key: KeyPair::from_private_key([0x17; 32]),
        }
    }

    fn signed_identity(&self, device_identity_pub: &[u8; 32]) -> wa::AdvSignedDeviceIdentity {
        let details = wa::AdvDeviceIdentity {
            raw_id: Some(42),
            timestamp: Some(1_700_000_000),
            key_index: Some(KEY_INDEX),
        }
        .encode_to_vec();

        let account_msg = [&[6u8, 0][..], &details[..], &device_identity_pub[..]].concat();
        let signature = xed25519::sign(&self.account_key.private_key, &account_msg);

        wa::AdvSignedDeviceIdentity {
            details: Some(details),
            account_signature_key: Some(self.account_key.public_key.to_vec()),
            account_signature: Some(signature.to_vec()),
            device_signature: None,
        }
    }

    fn stanza_for(
        &self,
        signed: &wa::AdvSignedDeviceIdentity,
        tamper_hmac: bool,
    ) -> Node {
        let details = signed.encode_to_vec();
        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&self.secret).unwrap();
        mac.update(&details);
        let mut hmac = mac.finalize().into_bytes().to_vec();
        if tamper_hmac {
            hmac[0] ^= 0x01;
        }

        let container = wa::AdvSignedDeviceIdentityHmac {
            details: Some(details),
            hmac: Some(hmac),
        }
        .encode_to_vec();

        NodeBuilder::new("iq")
            .attrs([
                ("from", "s.whatsapp.net"),
                ("id", MSG_ID),
                ("type", "result"),
            ])
            .children([NodeBuilder::new("pair-success")
                .children([
                    NodeBuilder::new("device-identity").bytes(container).build(),
                    NodeBuilder::new("device").attr("jid", DEVICE_JID).build(),
                    NodeBuilder::new("biz").attr("name", "Example Corp").build(),
                ])
                .build()])
            .build()
    }

    fn stanza(&self, device_identity_pub: &[u8; 32]) -> Node {
        self.stanza_for(&self.signed_identity(device_identity_pub), false)
    }
}

fn device_creds(phone: &PhoneSide) -> Credentials {
    let mut creds = AuthState::new().creds;
    creds.adv_secret_key = phone.secret;
    creds
}

#[test]
fn successful_pairing_builds_reply_and_updated_credentials() {
    let phone = PhoneSide::new();
    let creds = device_creds(&phone);
    let stanza = phone.stanza(&creds.signed_identity_key.public_key);

    let outcome = process_pair_success(&stanza, &creds).unwrap();

    // Reply shape: result iq echoing the message id, one pair-device-sign
    // wrapping one device-identity.
    assert_eq!(outcome.reply.tag, "iq");
    assert_eq!(outcome.reply.attrs.get("to"), Some("s.whatsapp.net"));
    assert_eq!(outcome.reply.attrs.get("type"), Some("result"));
    assert_eq!(outcome.reply.attrs.get("id"), Some(MSG_ID));

    let identity_node = outcome
        .reply
        .get_optional_child_by_tag(&["pair-device-sign", "device-identity"])
        .expect("reply carries the signed identity");
    assert_eq!(
        identity_node.attrs.get("key-index"),
        Some(KEY_INDEX.to_string().as_str())
    );

    // The echoed identity drops the signature key and gains our signature.
    let echoed =
        wa::AdvSignedDeviceIdentity::decode(identity_node.bytes_content().unwrap()).unwrap();
    assert!(echoed.account_signature_key.is_none());
    let device_signature: [u8; 64] = echoed
        .device_signature
        .as_deref()
        .expect("reply identity is device-signed")
        .try_into()
        .unwrap();

    let device_msg = [
        &[6u8, 1][..],
        echoed.details.as_deref().unwrap(),
        &creds.signed_identity_key.public_key[..],
        &phone.account_key.public_key[..],
    ]
    .concat();
    assert!(xed25519::verify(
        &creds.signed_identity_key.public_key,
        &device_msg,
        &device_signature
    ));

    // Credentials: account stored fully signed (key retained), identity
    // bound, self identity set. The input is never mutated.
    let account = outcome.creds.account.as_ref().unwrap();
    assert_eq!(
        account.account_signature_key.as_deref(),
        Some(&phone.account_key.public_key[..])
    );
    assert_eq!(
        account.device_signature.as_deref(),
        Some(&device_signature[..])
    );

    let me = outcome.creds.me.as_ref().unwrap();
    assert_eq!(me.id.to_string(), DEVICE_JID);
    assert_eq!(me.verified_name, "Example Corp");

    assert_eq!(outcome.creds.signal_identities.len(), 1);
    let identity = &outcome.creds.signal_identities[0];
    assert_eq!(identity.account_id.to_string(), DEVICE_JID);
    assert_eq!(identity.account_signature_key, phone.account_key.public_key);

    assert!(creds.account.is_none());
    assert!(creds.me.is_none());
}

#[test]
fn validation_is_deterministic() {
    let phone = PhoneSide::new();
    let creds = device_creds(&phone);
    let stanza = phone.stanza(&creds.signed_identity_key.public_key);

    let first = process_pair_success(&stanza, &creds).unwrap();
    let second = process_pair_success(&stanza, &creds).unwrap();

    assert_eq!(first.reply, second.reply);
    assert_eq!(
        first.creds.account.as_ref().unwrap().device_signature,
        second.creds.account.as_ref().unwrap().device_signature
    );
}

#[test]
fn tampered_hmac_is_rejected_before_anything_is_signed() {
    let phone = PhoneSide::new();
    let creds = device_creds(&phone);
    let signed = phone.signed_identity(&creds.signed_identity_key.public_key);
    let stanza = phone.stanza_for(&signed, true);

    let err = process_pair_success(&stanza, &creds).unwrap_err();
    assert!(matches!(err, PairError::InvalidPairing));
}

#[test]
fn wrong_account_secret_is_rejected() {
    let phone = PhoneSide::new();
    let mut creds = device_creds(&phone);
    creds.adv_secret_key[31] ^= 0x80;
    let stanza = phone.stanza(&creds.signed_identity_key.public_key);

    let err = process_pair_success(&stanza, &creds).unwrap_err();
    assert!(matches!(err, PairError::InvalidPairing));
}

#[test]
fn tampered_account_signature_fails_after_hmac_passes() {
    let phone = PhoneSide::new();
    let creds = device_creds(&phone);

    // Flip one signature bit, then let the HMAC cover the tampered bytes so
    // only the signature check can catch it.
    let mut signed = phone.signed_identity(&creds.signed_identity_key.public_key);
    signed.account_signature.as_mut().unwrap()[10] ^= 0x04;
    let stanza = phone.stanza_for(&signed, false);

    let err = process_pair_success(&stanza, &creds).unwrap_err();
    assert!(matches!(err, PairError::SignatureVerificationFailed));
}

#[test]
fn identity_bound_to_another_device_is_rejected() {
    let phone = PhoneSide::new();
    let creds = device_creds(&phone);
    let other_device = KeyPair::new();
    let stanza = phone.stanza(&other_device.public_key);

    let err = process_pair_success(&stanza, &creds).unwrap_err();
    assert!(matches!(err, PairError::SignatureVerificationFailed));
}

#[test]
fn missing_children_are_reported_as_malformed() {
    let phone = PhoneSide::new();
    let creds = device_creds(&phone);

    // No content at all below the iq.
    let empty = NodeBuilder::new("iq").attr("id", MSG_ID).build();
    assert!(matches!(
        process_pair_success(&empty, &creds).unwrap_err(),
        PairError::MalformedPairingMessage(_)
    ));

    // pair-success present but no device-identity.
    let no_identity = NodeBuilder::new("iq")
        .attr("id", MSG_ID)
        .children([NodeBuilder::new("pair-success")
            .children([NodeBuilder::new("device").attr("jid", DEVICE_JID).build()])
            .build()])
        .build();
    assert!(matches!(
        process_pair_success(&no_identity, &creds).unwrap_err(),
        PairError::MalformedPairingMessage(_)
    ));

    // Everything valid except the message id.
    let mut no_id = phone.stanza(&creds.signed_identity_key.public_key);
    no_id.attrs = walink::binary::Attrs::new();
    assert!(matches!(
        process_pair_success(&no_id, &creds).unwrap_err(),
        PairError::MalformedPairingMessage(_)
    ));

    // Valid crypto but no device sibling to bind an identity to.
    let signed = phone.signed_identity(&creds.signed_identity_key.public_key);
    let mut no_device = phone.stanza_for(&signed, false);
    if let Some(walink::binary::NodeContent::Nodes(children)) = &mut no_device.content
        && let Some(walink::binary::NodeContent::Nodes(grandchildren)) =
            &mut children[0].content
    {
        grandchildren.retain(|n| n.tag != "device");
    }
    assert!(matches!(
        process_pair_success(&no_device, &creds).unwrap_err(),
        PairError::MalformedPairingMessage(_)
    ));
}

#[test]
fn each_successful_validation_appends_one_identity() {
    let phone = PhoneSide::new();
    let creds = device_creds(&phone);
    let stanza = phone.stanza(&creds.signed_identity_key.public_key);

    let first = process_pair_success(&stanza, &creds).unwrap();
    assert_eq!(first.creds.signal_identities.len(), 1);

    let second = process_pair_success(&stanza, &first.creds).unwrap();
    assert_eq!(second.creds.signal_identities.len(), 2);
    assert_eq!(
        second.creds.signal_identities[0],
        first.creds.signal_identities[0]
    );
}

#[test]
fn missing_business_name_defaults_to_empty() {
    let phone = PhoneSide::new();
    let creds = device_creds(&phone);

    let signed = phone.signed_identity(&creds.signed_identity_key.public_key);
    let mut stanza = phone.stanza_for(&signed, false);
    if let Some(walink::binary::NodeContent::Nodes(children)) = &mut stanza.content
        && let Some(walink::binary::NodeContent::Nodes(grandchildren)) = &mut children[0].content
    {
        grandchildren.retain(|n| n.tag != "biz");
    }

    let outcome = process_pair_success(&stanza, &creds).unwrap();
    assert_eq!(outcome.creds.me.unwrap().verified_name, "");
}

#[test]
fn qr_data_joins_ref_and_key_material() {
    use base64::Engine as _;
    use base64::prelude::BASE64_STANDARD;

    let phone = PhoneSide::new();
    let creds = device_creds(&phone);

    let qr = walink::pair::make_qr_data(&creds, "2@abcdef");
    let parts: Vec<&str> = qr.split(',').collect();
    assert_eq!(parts.len(), 4);
    assert_eq!(parts[0], "2@abcdef");
    assert_eq!(
        BASE64_STANDARD.decode(parts[1]).unwrap(),
        creds.noise_key.public_key
    );
    assert_eq!(
        BASE64_STANDARD.decode(parts[2]).unwrap(),
        creds.signed_identity_key.public_key
    );
    assert_eq!(
        BASE64_STANDARD.decode(parts[3]).unwrap(),
        creds.adv_secret_key
    );
}

#[test]
fn ack_node_echoes_requester_and_id() {
    let request = NodeBuilder::new("iq")
        .attrs([("from", "s.whatsapp.net"), ("id", "req-9"), ("type", "set")])
        .build();

    let ack = walink::pair::build_ack_node(&request).unwrap();
    assert_eq!(ack.tag, "iq");
    assert_eq!(ack.attrs.get("to"), Some("s.whatsapp.net"));
    assert_eq!(ack.attrs.get("id"), Some("req-9"));
    assert_eq!(ack.attrs.get("type"), Some("result"));

    let anonymous = NodeBuilder::new("iq").attr("type", "set").build();
    assert!(walink::pair::build_ack_node(&anonymous).is_none());
}

#[test]
fn pair_error_node_carries_code_and_text() {
    let node = walink::pair::build_pair_error_node("req-9", 401, "not-authorized");
    assert_eq!(node.tag, "iq");
    assert_eq!(node.attrs.get("type"), Some("error"));
    assert_eq!(node.attrs.get("id"), Some("req-9"));

    let error = node.get_optional_child("error").unwrap();
    assert_eq!(error.attrs.get("code"), Some("401"));
    assert_eq!(error.attrs.get("text"), Some("not-authorized"));
}
