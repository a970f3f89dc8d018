//! Hand-maintained protobuf definitions for the connection and pairing
//! payloads. Field numbers follow the shared wire schema and must not be
//! reassigned; new fields get new tags.

pub mod whatsapp {
    /// Body of a connection-opening frame. Login sends `passive = true`
    /// with `username`/`device`; first-time registration sends
    /// `passive = false` with `device_pairing_data`.
    #[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
    pub struct ClientPayload {
        #[prost(uint64, optional, tag = "1")]
        pub username: Option<u64>,
        #[prost(bool, optional, tag = "3")]
        pub passive: Option<bool>,
        #[prost(message, optional, tag = "5")]
        pub user_agent: Option<client_payload::UserAgent>,
        #[prost(message, optional, tag = "6")]
        pub web_info: Option<client_payload::WebInfo>,
        #[prost(enumeration = "client_payload::ConnectType", optional, tag = "12")]
        pub connect_type: Option<i32>,
        #[prost(enumeration = "client_payload::ConnectReason", optional, tag = "13")]
        pub connect_reason: Option<i32>,
        #[prost(uint32, optional, tag = "18")]
        pub device: Option<u32>,
        #[prost(message, optional, tag = "19")]
        pub device_pairing_data: Option<client_payload::DevicePairingRegistrationData>,
    }

    pub mod client_payload {
        #[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
        pub struct UserAgent {
            #[prost(enumeration = "user_agent::Platform", optional, tag = "1")]
            pub platform: Option<i32>,
            #[prost(message, optional, tag = "2")]
            pub app_version: Option<user_agent::AppVersion>,
            #[prost(string, optional, tag = "3")]
            pub mcc: Option<String>,
            #[prost(string, optional, tag = "4")]
            pub mnc: Option<String>,
            #[prost(string, optional, tag = "5")]
            pub os_version: Option<String>,
            #[prost(string, optional, tag = "6")]
            pub manufacturer: Option<String>,
            #[prost(string, optional, tag = "7")]
            pub device: Option<String>,
            #[prost(string, optional, tag = "8")]
            pub os_build_number: Option<String>,
            #[prost(enumeration = "user_agent::ReleaseChannel", optional, tag = "10")]
            pub release_channel: Option<i32>,
            #[prost(string, optional, tag = "11")]
            pub locale_language_iso6391: Option<String>,
            #[prost(string, optional, tag = "12")]
            pub locale_country_iso31661_alpha2: Option<String>,
        }

        pub mod user_agent {
            #[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
            pub struct AppVersion {
                #[prost(uint32, optional, tag = "1")]
                pub primary: Option<u32>,
                #[prost(uint32, optional, tag = "2")]
                pub secondary: Option<u32>,
                #[prost(uint32, optional, tag = "3")]
                pub tertiary: Option<u32>,
            }

            #[derive(
                Clone,
                Copy,
                Debug,
                PartialEq,
                Eq,
                Hash,
                PartialOrd,
                Ord,
                ::prost::Enumeration,
                serde::Serialize,
                serde::Deserialize,
            )]
            #[repr(i32)]
            pub enum Platform {
                Android = 0,
                Ios = 1,
                Web = 14,
            }

            #[derive(
                Clone,
                Copy,
                Debug,
                PartialEq,
                Eq,
                Hash,
                PartialOrd,
                Ord,
                ::prost::Enumeration,
                serde::Serialize,
                serde::Deserialize,
            )]
            #[repr(i32)]
            pub enum ReleaseChannel {
                Release = 0,
                Beta = 1,
                Alpha = 2,
            }
        }

        #[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
        pub struct WebInfo {
            #[prost(enumeration = "web_info::WebSubPlatform", optional, tag = "4")]
            pub web_sub_platform: Option<i32>,
        }

        pub mod web_info {
            #[derive(
                Clone,
                Copy,
                Debug,
                PartialEq,
                Eq,
                Hash,
                PartialOrd,
                Ord,
                ::prost::Enumeration,
                serde::Serialize,
                serde::Deserialize,
            )]
            #[repr(i32)]
            pub enum WebSubPlatform {
                WebBrowser = 0,
                AppStore = 1,
                WinStore = 2,
            }
        }

        /// Registration block carried once, on the first connection of a
        /// freshly linked device. The `e_*` fields are framed byte strings,
        /// not varints; widths are fixed by the server side.
        #[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
        pub struct DevicePairingRegistrationData {
            #[prost(bytes = "vec", optional, tag = "1")]
            pub e_regid: Option<Vec<u8>>,
            #[prost(bytes = "vec", optional, tag = "2")]
            pub e_keytype: Option<Vec<u8>>,
            #[prost(bytes = "vec", optional, tag = "3")]
            pub e_ident: Option<Vec<u8>>,
            #[prost(bytes = "vec", optional, tag = "4")]
            pub e_skey_id: Option<Vec<u8>>,
            #[prost(bytes = "vec", optional, tag = "5")]
            pub e_skey_val: Option<Vec<u8>>,
            #[prost(bytes = "vec", optional, tag = "6")]
            pub e_skey_sig: Option<Vec<u8>>,
            #[prost(bytes = "vec", optional, tag = "7")]
            pub build_hash: Option<Vec<u8>>,
            #[prost(bytes = "vec", optional, tag = "8")]
            pub companion_props: Option<Vec<u8>>,
        }

        #[derive(
            Clone,
            Copy,
            Debug,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::prost::Enumeration,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[repr(i32)]
        pub enum ConnectType {
            CellularUnknown = 0,
            WifiUnknown = 1,
        }

        #[derive(
            Clone,
            Copy,
            Debug,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::prost::Enumeration,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[repr(i32)]
        pub enum ConnectReason {
            Push = 0,
            UserActivated = 1,
        }
    }

    /// Companion (linked device) descriptor, nested pre-encoded inside the
    /// registration block.
    #[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
    pub struct CompanionProps {
        #[prost(string, optional, tag = "1")]
        pub os: Option<String>,
        #[prost(message, optional, tag = "2")]
        pub version: Option<companion_props::AppVersion>,
        #[prost(enumeration = "companion_props::PlatformType", optional, tag = "3")]
        pub platform_type: Option<i32>,
        #[prost(bool, optional, tag = "4")]
        pub require_full_sync: Option<bool>,
    }

    pub mod companion_props {
        #[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
        pub struct AppVersion {
            #[prost(uint32, optional, tag = "1")]
            pub primary: Option<u32>,
            #[prost(uint32, optional, tag = "2")]
            pub secondary: Option<u32>,
            #[prost(uint32, optional, tag = "3")]
            pub tertiary: Option<u32>,
        }

        #[derive(
            Clone,
            Copy,
            Debug,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::prost::Enumeration,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[repr(i32)]
        pub enum PlatformType {
            Unknown = 0,
            Chrome = 1,
            Firefox = 2,
            Ie = 3,
            Opera = 4,
            Safari = 5,
            Edge = 6,
            Desktop = 7,
        }
    }

    /// Outer container of an incoming `device-identity` payload: the signed
    /// identity bytes plus the HMAC binding them to this linking session.
    #[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
    pub struct AdvSignedDeviceIdentityHmac {
        #[prost(bytes = "vec", optional, tag = "1")]
        pub details: Option<Vec<u8>>,
        #[prost(bytes = "vec", optional, tag = "2")]
        pub hmac: Option<Vec<u8>>,
    }

    /// The account's signed claim about a linked device, cross-signed by the
    /// device itself once validation succeeds.
    #[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
    pub struct AdvSignedDeviceIdentity {
        #[prost(bytes = "vec", optional, tag = "1")]
        pub details: Option<Vec<u8>>,
        #[prost(bytes = "vec", optional, tag = "2")]
        pub account_signature_key: Option<Vec<u8>>,
        #[prost(bytes = "vec", optional, tag = "3")]
        pub account_signature: Option<Vec<u8>>,
        #[prost(bytes = "vec", optional, tag = "4")]
        pub device_signature: Option<Vec<u8>>,
    }

    #[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
    pub struct AdvDeviceIdentity {
        #[prost(uint32, optional, tag = "1")]
        pub raw_id: Option<u32>,
        #[prost(uint64, optional, tag = "2")]
        pub timestamp: Option<u64>,
        #[prost(uint32, optional, tag = "3")]
        pub key_index: Option<u32>,
    }
}
