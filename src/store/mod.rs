pub mod creds;
pub mod keys;

pub use creds::{AuthState, Credentials, Me, SignalIdentity};
pub use keys::{KeyStore, RecordMap};
