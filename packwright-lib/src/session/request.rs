use std::collections::HashMap;

use parking_lot::Mutex;
use strum::Display;

/// A logical resource whose loads may overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RequestKey {
    Modpack,
    Instance,
    SyncStatus,
    Library,
}

/// Identifies one issued request. Only the most recently issued token for a
/// key may apply its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    key: RequestKey,
    seq: u64,
}

impl RequestToken {
    pub fn key(&self) -> RequestKey {
        self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Hands out monotonically increasing tokens per [`RequestKey`].
///
/// Responses are applied in the order requests were issued, not the order
/// they arrive: a response whose token has been superseded is dropped.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: Mutex<HashMap<RequestKey, u64>>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, key: RequestKey) -> RequestToken {
        let mut latest = self.latest.lock();
        let seq = latest.entry(key).or_default();
        *seq += 1;

        RequestToken { key, seq: *seq }
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.lock().get(&token.key) == Some(&token.seq)
    }
}
