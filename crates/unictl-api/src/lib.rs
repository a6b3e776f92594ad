// unictl-api: authenticated session client for the UniFi controller REST API

pub mod clients;
pub mod devices;
pub mod error;
pub mod events;
pub mod login;
pub mod raw;
pub mod session;
pub mod transport;

pub use clients::StationCommand;
pub use error::{Cause, Error};
pub use session::{CSRF_HEADER, Session, SessionConfig, Stream};
pub use transport::{DEFAULT_TIMEOUT, USER_AGENT};

pub use secrecy::SecretString;
