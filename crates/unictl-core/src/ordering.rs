// ── Multi-key ordering ──
//
// An `OrderBy<T>` is a prioritized list of strict "less" predicates. The
// first predicate that distinguishes two records decides their order;
// records no predicate distinguishes compare equal.

use std::cmp::Ordering;
use std::fmt;

use strum::{Display, EnumString, VariantNames};

use crate::model::{Client, Device};

type Less<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

pub struct OrderBy<T> {
    predicates: Vec<Less<T>>,
}

impl<T> Default for OrderBy<T> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for OrderBy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBy")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

impl<T> OrderBy<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lower-priority predicate.
    #[must_use]
    pub fn then(mut self, less: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        self.predicates.push(Box::new(less));
        self
    }

    /// Append a predicate with its direction flipped.
    #[must_use]
    pub fn then_reversed(self, less: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        self.then(move |a, b| less(b, a))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        for less in &self.predicates {
            if less(a, b) {
                return Ordering::Less;
            }
            if less(b, a) {
                return Ordering::Greater;
            }
        }
        Ordering::Equal
    }

    pub fn less(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    pub fn sort(&self, items: &mut [T]) {
        items.sort_by(|a, b| self.compare(a, b));
    }
}

// ── Key parsing ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{key}' (expected one of: {expected})")]
pub struct UnknownSortKey {
    pub key: String,
    pub expected: String,
}

/// Build an ordering from comma-separated key names; a leading `-`
/// reverses a key. Keys parse case-insensitively.
fn parse_keys<T, K>(
    keys: &str,
    predicate: impl Fn(K) -> fn(&T, &T) -> bool,
) -> Result<OrderBy<T>, UnknownSortKey>
where
    T: 'static,
    K: std::str::FromStr + VariantNames,
{
    let mut order = OrderBy::new();
    for raw in keys.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        let (reverse, name) = match raw.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, raw),
        };
        let key: K = name.parse().map_err(|_| UnknownSortKey {
            key: raw.to_owned(),
            expected: K::VARIANTS.join(", "),
        })?;
        let less = predicate(key);
        order = if reverse {
            order.then_reversed(less)
        } else {
            order.then(less)
        };
    }
    Ok(order)
}

// ── Clients ─────────────────────────────────────────────────────────

pub mod clients {
    use super::{Client, OrderBy};

    pub fn wired(a: &Client, b: &Client) -> bool {
        a.is_wired && !b.is_wired
    }

    pub fn ip(a: &Client, b: &Client) -> bool {
        a.ip.less(&b.ip)
    }

    pub fn mac(a: &Client, b: &Client) -> bool {
        a.mac < b.mac
    }

    pub fn name(a: &Client, b: &Client) -> bool {
        a.display_name() < b.display_name()
    }

    pub fn hostname(a: &Client, b: &Client) -> bool {
        a.hostname < b.hostname
    }

    pub fn last_seen(a: &Client, b: &Client) -> bool {
        a.last_seen < b.last_seen
    }

    pub fn first_seen(a: &Client, b: &Client) -> bool {
        a.first_seen < b.first_seen
    }

    pub fn uptime(a: &Client, b: &Client) -> bool {
        a.uptime < b.uptime
    }

    pub fn upstream(a: &Client, b: &Client) -> bool {
        a.upstream() < b.upstream()
    }

    pub fn rx(a: &Client, b: &Client) -> bool {
        a.received_bytes() < b.received_bytes()
    }

    pub fn tx(a: &Client, b: &Client) -> bool {
        a.sent_bytes() < b.sent_bytes()
    }

    /// Wired clients first, then by address.
    pub fn default() -> OrderBy<Client> {
        OrderBy::new().then(wired).then(ip)
    }

    /// Oldest activity first; used for the full known-client history.
    pub fn historical() -> OrderBy<Client> {
        OrderBy::new().then(last_seen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ClientSortKey {
    Wired,
    Ip,
    Mac,
    Name,
    Hostname,
    LastSeen,
    FirstSeen,
    Uptime,
    Upstream,
    Rx,
    Tx,
}

impl ClientSortKey {
    pub fn predicate(self) -> fn(&Client, &Client) -> bool {
        match self {
            Self::Wired => clients::wired,
            Self::Ip => clients::ip,
            Self::Mac => clients::mac,
            Self::Name => clients::name,
            Self::Hostname => clients::hostname,
            Self::LastSeen => clients::last_seen,
            Self::FirstSeen => clients::first_seen,
            Self::Uptime => clients::uptime,
            Self::Upstream => clients::upstream,
            Self::Rx => clients::rx,
            Self::Tx => clients::tx,
        }
    }

    pub fn parse_order(keys: &str) -> Result<OrderBy<Client>, UnknownSortKey> {
        parse_keys(keys, Self::predicate)
    }
}

// ── Devices ─────────────────────────────────────────────────────────

pub mod devices {
    use super::{Device, OrderBy};

    pub fn name(a: &Device, b: &Device) -> bool {
        a.display_name() < b.display_name()
    }

    pub fn ip(a: &Device, b: &Device) -> bool {
        a.ip.less(&b.ip)
    }

    pub fn mac(a: &Device, b: &Device) -> bool {
        a.mac < b.mac
    }

    pub fn model(a: &Device, b: &Device) -> bool {
        a.model < b.model
    }

    pub fn default() -> OrderBy<Device> {
        OrderBy::new().then(name).then(mac)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DeviceSortKey {
    Name,
    Ip,
    Mac,
    Model,
}

impl DeviceSortKey {
    pub fn predicate(self) -> fn(&Device, &Device) -> bool {
        match self {
            Self::Name => devices::name,
            Self::Ip => devices::ip,
            Self::Mac => devices::mac,
            Self::Model => devices::model,
        }
    }

    pub fn parse_order(keys: &str) -> Result<OrderBy<Device>, UnknownSortKey> {
        parse_keys(keys, Self::predicate)
    }
}

// ── Events ──────────────────────────────────────────────────────────

pub mod events {
    use super::OrderBy;
    use crate::model::Event;

    pub fn time(a: &Event, b: &Event) -> bool {
        a.time < b.time
    }

    pub fn newest_first() -> OrderBy<Event> {
        OrderBy::new().then_reversed(time)
    }
}
