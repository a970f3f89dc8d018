use base64::Engine as _;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, Mac};
use log::{debug, warn};
use prost::Message;
use sha2::Sha256;
use std::str::FromStr;
use thiserror::Error;
use walink_binary::builder::NodeBuilder;
use walink_binary::jid::{Jid, SERVER_JID};
use walink_binary::node::Node;
use walink_proto::whatsapp as wa;

use crate::crypto::xed25519;
use crate::store::creds::{Credentials, Me, SignalIdentity};

// Signature chain prefixes: the account signs with [6, 0], the device
// counter-signs with [6, 1].
const ACCOUNT_SIGNATURE_PREFIX: &[u8] = &[6, 0];
const DEVICE_SIGNATURE_PREFIX: &[u8] = &[6, 1];

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum PairError {
    /// The stanza is missing a child node or payload field every pairing
    /// message must carry.
    #[error("malformed pairing message: {0}")]
    MalformedPairingMessage(&'static str),
    /// The HMAC over the signed identity did not match: the payload was not
    /// produced for this device's linking session.
    #[error("invalid pairing: device identity HMAC mismatch")]
    InvalidPairing,
    /// The account's signature over its details and this device's identity
    /// key did not verify.
    #[error("account signature verification failed")]
    SignatureVerificationFailed,
}

/// Result of a validated pairing: the credential set to persist and the
/// acknowledgement to send back.
#[derive(Debug)]
pub struct PairOutcome {
    pub creds: Credentials,
    pub reply: Node,
}

/// Validates an incoming pair-success stanza and produces this device's
/// half of the trust relationship.
///
/// The checks run strictly in order: the HMAC binds the payload to this
/// linking session, the account signature binds the account to this
/// device's identity key, and only a payload that passed both is
/// counter-signed with the device identity key. Any failure aborts the
/// attempt; nothing is signed and the input credentials are never mutated.
///
/// Calling this again on credentials that already carry an `account`
/// appends another identity entry; re-validation without resetting the
/// pairing state first is a caller bug.
pub fn process_pair_success(stanza: &Node, creds: &Credentials) -> Result<PairOutcome, PairError> {
    let msg_id = stanza
        .attrs
        .get("id")
        .ok_or(PairError::MalformedPairingMessage("missing message id"))?;
    let pair_node = stanza
        .children()
        .and_then(|c| c.first())
        .ok_or(PairError::MalformedPairingMessage("empty stanza"))?;

    let device_identity_bytes = pair_node
        .get_optional_child("device-identity")
        .and_then(|n| n.bytes_content())
        .ok_or(PairError::MalformedPairingMessage(
            "missing device-identity node",
        ))?;

    // 1. Unmarshal the HMAC container and authenticate the details against
    //    the shared account secret, in constant time.
    let container = wa::AdvSignedDeviceIdentityHmac::decode(device_identity_bytes)
        .map_err(|_| PairError::MalformedPairingMessage("undecodable device-identity payload"))?;
    let details = container
        .details
        .as_deref()
        .ok_or(PairError::MalformedPairingMessage(
            "device-identity payload missing details",
        ))?;
    let hmac_bytes = container
        .hmac
        .as_deref()
        .ok_or(PairError::MalformedPairingMessage(
            "device-identity payload missing hmac",
        ))?;

    let mut mac = <HmacSha256 as Mac>::new_from_slice(&creds.adv_secret_key)
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(details);
    if mac.verify_slice(hmac_bytes).is_err() {
        warn!("pairing rejected: device identity HMAC mismatch");
        return Err(PairError::InvalidPairing);
    }

    // 2. Unmarshal the signed identity and verify the account's signature
    //    over its details and this device's identity key.
    let mut account = wa::AdvSignedDeviceIdentity::decode(details)
        .map_err(|_| PairError::MalformedPairingMessage("undecodable signed device identity"))?;
    let account_details =
        account
            .details
            .clone()
            .ok_or(PairError::MalformedPairingMessage(
                "signed identity missing details",
            ))?;
    let account_signature_key: [u8; 32] = account
        .account_signature_key
        .as_deref()
        .ok_or(PairError::MalformedPairingMessage(
            "signed identity missing account signature key",
        ))?
        .try_into()
        .map_err(|_| PairError::SignatureVerificationFailed)?;
    let account_signature: [u8; 64] = account
        .account_signature
        .as_deref()
        .ok_or(PairError::MalformedPairingMessage(
            "signed identity missing account signature",
        ))?
        .try_into()
        .map_err(|_| PairError::SignatureVerificationFailed)?;

    let account_msg = signed_message(
        ACCOUNT_SIGNATURE_PREFIX,
        &[&account_details, &creds.signed_identity_key.public_key[..]],
    );
    if !xed25519::verify(&account_signature_key, &account_msg, &account_signature) {
        warn!("pairing rejected: account signature did not verify");
        return Err(PairError::SignatureVerificationFailed);
    }

    // 3. Counter-sign. Both checks above must have passed; signing earlier
    //    would cross-sign unauthenticated bytes.
    let device_msg = signed_message(
        DEVICE_SIGNATURE_PREFIX,
        &[
            &account_details,
            &creds.signed_identity_key.public_key[..],
            &account_signature_key[..],
        ],
    );
    let device_signature = creds.signed_identity_key.sign_message(&device_msg);
    account.device_signature = Some(device_signature.to_bytes().to_vec());

    // 4. Linked-device identity from the sibling nodes.
    let device_node = pair_node
        .get_optional_child("device")
        .ok_or(PairError::MalformedPairingMessage("missing device node"))?;
    let jid_attr = device_node
        .attrs
        .get("jid")
        .ok_or(PairError::MalformedPairingMessage("device node missing jid"))?;
    let jid = Jid::from_str(jid_attr)
        .map_err(|_| PairError::MalformedPairingMessage("unparseable device jid"))?;
    let verified_name = pair_node
        .get_optional_child("biz")
        .and_then(|n| n.attrs.get("name"))
        .unwrap_or("")
        .to_string();

    let identity_details = wa::AdvDeviceIdentity::decode(account_details.as_slice())
        .map_err(|_| PairError::MalformedPairingMessage("undecodable identity details"))?;
    let key_index = identity_details.key_index.unwrap_or_default();

    // 5. Re-encode for the acknowledgement with the signature key stripped;
    //    the server already holds it.
    let account_enc = {
        let mut reply_identity = account.clone();
        reply_identity.account_signature_key = None;
        reply_identity.encode_to_vec()
    };

    let reply = NodeBuilder::new("iq")
        .attrs([
            ("to", SERVER_JID.to_string()),
            ("type", "result".to_string()),
            ("id", msg_id.to_string()),
        ])
        .children([NodeBuilder::new("pair-device-sign")
            .children([NodeBuilder::new("device-identity")
                .attr("key-index", key_index.to_string())
                .bytes(account_enc)
                .build()])
            .build()])
        .build();

    let mut updated = creds.clone();
    updated.account = Some(account);
    updated.me = Some(Me {
        id: jid.clone(),
        verified_name,
    });
    updated.signal_identities.push(SignalIdentity {
        account_id: jid.clone(),
        account_signature_key,
    });

    debug!("pairing validated, linked as {jid}");
    Ok(PairOutcome {
        creds: updated,
        reply,
    })
}

/// Constructs the full QR link-code string from the pairing ref and this
/// device's keys.
pub fn make_qr_data(creds: &Credentials, ref_str: &str) -> String {
    let noise_b64 = BASE64_STANDARD.encode(creds.noise_key.public_key);
    let identity_b64 = BASE64_STANDARD.encode(creds.signed_identity_key.public_key);
    let adv_b64 = BASE64_STANDARD.encode(creds.adv_secret_key);

    [ref_str, &noise_b64, &identity_b64, &adv_b64].join(",")
}

/// Builds the immediate acknowledgement for an incoming pairing request.
pub fn build_ack_node(request_node: &Node) -> Option<Node> {
    if let (Some(to), Some(id)) = (
        request_node.attrs.get("from"),
        request_node.attrs.get("id"),
    ) {
        Some(
            NodeBuilder::new("iq")
                .attrs([
                    ("to", to.to_string()),
                    ("id", id.to_string()),
                    ("type", "result".to_string()),
                ])
                .build(),
        )
    } else {
        None
    }
}

/// Builds the error reply a caller sends when pairing validation fails.
pub fn build_pair_error_node(req_id: &str, code: u16, text: &str) -> Node {
    let error_node = NodeBuilder::new("error")
        .attrs([("code", code.to_string()), ("text", text.to_string())])
        .build();
    NodeBuilder::new("iq")
        .attrs([
            ("to", SERVER_JID.to_string()),
            ("type", "error".to_string()),
            ("id", req_id.to_string()),
        ])
        .children([error_node])
        .build()
}

/// Fixed-layout byte sequence covered by the pairing signatures: the
/// two-byte prefix followed by each part, concatenated with no separators.
fn signed_message(prefix: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let len = prefix.len() + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut buf = Vec::with_capacity(len);
    buf.extend_from_slice(prefix);
    for part in parts {
        buf.extend_from_slice(part);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_message_layout_is_prefix_then_parts_in_order() {
        let details = [0xaa, 0xbb];
        let ident = [0x01; 3];
        let key = [0x02; 2];

        assert_eq!(
            signed_message(ACCOUNT_SIGNATURE_PREFIX, &[&details, &ident]),
            vec![6, 0, 0xaa, 0xbb, 0x01, 0x01, 0x01]
        );
        assert_eq!(
            signed_message(DEVICE_SIGNATURE_PREFIX, &[&details, &ident, &key]),
            vec![6, 1, 0xaa, 0xbb, 0x01, 0x01, 0x01, 0x02, 0x02]
        );
    }

    #[test]
    fn signed_message_empty_parts_leave_only_prefix() {
        assert_eq!(signed_message(&[6, 0], &[&[], &[]]), vec![6, 0]);
    }
}
