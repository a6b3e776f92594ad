//! Controller data model for `unictl`.
//!
//! Everything between the raw response body handed back by
//! `unictl-api` and the output formatter:
//!
//! - **Domain model** ([`model`]): `Client`, `Device` and `Event` records
//!   plus the value types they are built from (`Mac`, `Ip`, `Number`,
//!   `Duration`, `Timestamp`), each with the controller's lenient decoding
//!   rules.
//!
//! - **[`envelope`]**: unwraps the `{"meta":{..},"data":[..]}` listing
//!   envelope into typed records.
//!
//! - **[`enrich`]**: cross-references devices to give clients a readable
//!   upstream name.
//!
//! - **[`ordering`]**: multi-key, first-difference-wins ordering of
//!   clients and devices.
//!
//! - **[`humanize`]**: byte, rate, uptime and time-of-day rendering.

pub mod enrich;
pub mod envelope;
pub mod humanize;
pub mod model;
pub mod ordering;

pub use enrich::enrich_upstream;
pub use envelope::{DecodeError, decode, decode_clients, decode_devices, decode_events};
pub use humanize::TimeStyle;
pub use model::{
    Client, Device, DeviceKind, DeviceState, Duration, Event, EventType, Ip, Mac, Number,
    Timestamp,
};
pub use ordering::{ClientSortKey, DeviceSortKey, OrderBy, UnknownSortKey};
