use base64::Engine as _;
use base64::prelude::BASE64_STANDARD;
use once_cell::sync::Lazy;
use prost::Message;
use std::str::FromStr;
use thiserror::Error;
use walink_binary::jid::{Jid, JidError};
use walink_proto::whatsapp as wa;

use crate::store::creds::Credentials;

/// Build hash agreed with the server for this protocol revision. Opaque;
/// replaced wholesale when the revision changes.
const ENCODED_BUILD_HASH: &str = "S9Kdc4pc4EJryo21snc5cg==";

static BUILD_HASH: Lazy<Vec<u8>> = Lazy::new(|| {
    BASE64_STANDARD
        .decode(ENCODED_BUILD_HASH)
        .expect("build hash constant is valid base64")
});

/// Protocol-revision-pinned user agent constants. These change together
/// when the server-side protocol revision does; nothing here is derived
/// from the local machine.
struct UserAgentDefaults {
    platform: wa::client_payload::user_agent::Platform,
    release_channel: wa::client_payload::user_agent::ReleaseChannel,
    mcc: &'static str,
    mnc: &'static str,
    manufacturer: &'static str,
    os_build_number: &'static str,
    locale_language: &'static str,
    locale_country: &'static str,
}

const USER_AGENT_DEFAULTS: UserAgentDefaults = UserAgentDefaults {
    platform: wa::client_payload::user_agent::Platform::Web,
    release_channel: wa::client_payload::user_agent::ReleaseChannel::Release,
    mcc: "000",
    mnc: "000",
    manufacturer: "",
    os_build_number: "0.1",
    locale_language: "en",
    locale_country: "en",
};

/// Companion protocol version and platform tag, pinned alongside the build
/// hash.
const COMPANION_VERSION: u32 = 10;
const COMPANION_PLATFORM_TYPE: wa::companion_props::PlatformType =
    wa::companion_props::PlatformType::Chrome;

/// Key type tag for the registration block's identity and pre-key entries.
const DJB_KEY_TYPE: u32 = 5;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed identifier {identifier:?}: {source}")]
    MalformedIdentifier {
        identifier: String,
        #[source]
        source: JidError,
    },
}

/// Client identification carried in every connection-opening payload.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Three-part app version, e.g. `[2, 2318, 11]`.
    pub version: [u32; 3],
    pub browser: BrowserInfo,
}

#[derive(Debug, Clone)]
pub struct BrowserInfo {
    pub os: String,
    pub device: String,
    pub os_version: String,
}

impl BrowserInfo {
    pub fn new(
        os: impl Into<String>,
        device: impl Into<String>,
        os_version: impl Into<String>,
    ) -> Self {
        Self {
            os: os.into(),
            device: device.into(),
            os_version: os_version.into(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: [2, 2318, 11],
            browser: BrowserInfo::new("Mac OS", "Desktop", "10.15.7"),
        }
    }
}

/// Fixed-width big-endian framing for small integers embedded in the
/// registration block. `width` must be 1..=4 and `value` must fit in it.
pub fn encode_uint_be(value: u32, width: usize) -> Vec<u8> {
    debug_assert!((1..=4).contains(&width));
    debug_assert!(width == 4 || value < 1u32 << (8 * width));
    value.to_be_bytes()[4 - width..].to_vec()
}

fn user_agent(config: &ClientConfig) -> wa::client_payload::UserAgent {
    wa::client_payload::UserAgent {
        platform: Some(USER_AGENT_DEFAULTS.platform as i32),
        app_version: Some(wa::client_payload::user_agent::AppVersion {
            primary: Some(config.version[0]),
            secondary: Some(config.version[1]),
            tertiary: Some(config.version[2]),
        }),
        mcc: Some(USER_AGENT_DEFAULTS.mcc.to_string()),
        mnc: Some(USER_AGENT_DEFAULTS.mnc.to_string()),
        os_version: Some(config.browser.os_version.clone()),
        manufacturer: Some(USER_AGENT_DEFAULTS.manufacturer.to_string()),
        device: Some(config.browser.device.clone()),
        os_build_number: Some(USER_AGENT_DEFAULTS.os_build_number.to_string()),
        release_channel: Some(USER_AGENT_DEFAULTS.release_channel as i32),
        locale_language_iso6391: Some(USER_AGENT_DEFAULTS.locale_language.to_string()),
        locale_country_iso31661_alpha2: Some(USER_AGENT_DEFAULTS.locale_country.to_string()),
    }
}

fn web_info() -> wa::client_payload::WebInfo {
    wa::client_payload::WebInfo {
        web_sub_platform: Some(wa::client_payload::web_info::WebSubPlatform::WebBrowser as i32),
    }
}

fn base_payload(config: &ClientConfig) -> wa::ClientPayload {
    wa::ClientPayload {
        connect_type: Some(wa::client_payload::ConnectType::WifiUnknown as i32),
        connect_reason: Some(wa::client_payload::ConnectReason::UserActivated as i32),
        user_agent: Some(user_agent(config)),
        web_info: Some(web_info()),
        ..Default::default()
    }
}

/// Serializes the connection payload for an already-registered device. The
/// connection is opened passively; the server pushes pending state first.
pub fn build_login_payload(own_id: &str, config: &ClientConfig) -> Result<Vec<u8>, PayloadError> {
    let jid = Jid::from_str(own_id).map_err(|source| PayloadError::MalformedIdentifier {
        identifier: own_id.to_string(),
        source,
    })?;
    let username: u64 = jid
        .user
        .parse()
        .map_err(|e: std::num::ParseIntError| PayloadError::MalformedIdentifier {
            identifier: own_id.to_string(),
            source: JidError::from(e),
        })?;

    let payload = wa::ClientPayload {
        passive: Some(true),
        username: Some(username),
        device: Some(jid.device as u32),
        ..base_payload(config)
    };
    Ok(payload.encode_to_vec())
}

/// Serializes the connection payload for a first-time registration: an
/// active connection carrying the framed key material the server needs to
/// admit a brand-new device.
pub fn build_registration_payload(creds: &Credentials, config: &ClientConfig) -> Vec<u8> {
    let companion = wa::CompanionProps {
        os: Some(config.browser.os.clone()),
        version: Some(wa::companion_props::AppVersion {
            primary: Some(COMPANION_VERSION),
            secondary: None,
            tertiary: None,
        }),
        platform_type: Some(COMPANION_PLATFORM_TYPE as i32),
        require_full_sync: Some(false),
    };

    let reg_data = wa::client_payload::DevicePairingRegistrationData {
        e_regid: Some(encode_uint_be(creds.registration_id, 4)),
        e_keytype: Some(encode_uint_be(DJB_KEY_TYPE, 1)),
        e_ident: Some(creds.signed_identity_key.public_key.to_vec()),
        e_skey_id: Some(encode_uint_be(creds.signed_pre_key.key_id, 3)),
        e_skey_val: Some(creds.signed_pre_key.key_pair.public_key.to_vec()),
        e_skey_sig: creds.signed_pre_key.signature.map(|s| s.to_vec()),
        build_hash: Some(BUILD_HASH.clone()),
        companion_props: Some(companion.encode_to_vec()),
    };

    let payload = wa::ClientPayload {
        passive: Some(false),
        device_pairing_data: Some(reg_data),
        ..base_payload(config)
    };
    payload.encode_to_vec()
}
