use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for layer IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for a text or image layer.
/// Internally a `Spur` index: 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(Spur);

impl LayerId {
    /// Intern a new string as a LayerId, or return existing if already interned.
    pub fn intern(s: &str) -> Self {
        LayerId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Time-based id such as `t1718000000000` or `img1718000000000`.
    ///
    /// `now_ms` is supplied by the host (`Date.now()` in the browser).
    pub fn timestamped(prefix: &str, now_ms: u64) -> Self {
        Self::intern(&format!("{prefix}{now_ms}"))
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(LayerId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = LayerId::intern("t2");
        let b = LayerId::intern("t2");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "t2");
    }

    #[test]
    fn timestamped_ids() {
        let id = LayerId::timestamped("img", 1_700_000_000_123);
        assert_eq!(id.to_string(), "img1700000000123");
        assert_ne!(id, LayerId::timestamped("t", 1_700_000_000_123));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = LayerId::intern("t1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"t1\"");
        let back: LayerId = serde_json::from_str("\"t1\"").unwrap();
        assert_eq!(back, id);
    }
}
