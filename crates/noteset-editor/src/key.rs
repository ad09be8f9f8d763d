use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_RENDER_KEY: AtomicU64 = AtomicU64::new(1);

/// Identity of one rendered list entry.
///
/// Keys come from a process-wide counter: two entries never share a key,
/// even across editors, and a removed entry's key is never handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderKey(u64);

impl RenderKey {
    #[must_use]
    pub fn mint() -> Self {
        Self(NEXT_RENDER_KEY.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn minted_keys_are_unique_and_increasing() {
        let keys: Vec<RenderKey> = (0..100).map(|_| RenderKey::mint()).collect();
        let unique: HashSet<_> = keys.iter().copied().collect();
        assert_eq!(unique.len(), keys.len());
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn display_is_prefixed() {
        let key = RenderKey::mint();
        assert_eq!(key.to_string(), format!("k{}", key.get()));
    }
}
