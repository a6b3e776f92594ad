// ── Domain model ──

pub mod client;
pub mod device;
pub mod event;
pub mod value;

pub use client::Client;
pub use device::{Device, DeviceKind, DeviceState};
pub use event::{Event, EventType};
pub use value::{Duration, Ip, Mac, Number, Timestamp};
