#![forbid(unsafe_code)]

//! Item keys and key extraction.
//!
//! Every row is identified by an [`ItemKey`] derived from the item itself.
//! Keys must be stable (the same item always yields the same key) and unique
//! within one data set; the height cache and the range pass are keyed by
//! them, so a duplicate silently shares one measured height between rows.

use std::fmt;
use std::rc::Rc;

/// Opaque, stable row identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ItemKey {
    Int(i64),
    Str(Rc<str>),
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemKey {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for ItemKey {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for ItemKey {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<usize> for ItemKey {
    fn from(n: usize) -> Self {
        Self::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for ItemKey {
    fn from(s: &str) -> Self {
        Self::Str(Rc::from(s))
    }
}

impl From<String> for ItemKey {
    fn from(s: String) -> Self {
        Self::Str(Rc::from(s))
    }
}

/// Items that know their own key.
pub trait Keyed {
    fn key(&self) -> ItemKey;
}

/// Caller-supplied key extraction function.
///
/// Cloning shares the underlying function.
pub struct KeyExtractor<T> {
    f: Rc<dyn Fn(&T) -> ItemKey>,
}

impl<T> Clone for KeyExtractor<T> {
    fn clone(&self) -> Self {
        Self {
            f: Rc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for KeyExtractor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyExtractor").finish_non_exhaustive()
    }
}

impl<T> KeyExtractor<T> {
    /// Wrap a key function. It must be pure and stable.
    pub fn new(f: impl Fn(&T) -> ItemKey + 'static) -> Self {
        Self { f: Rc::new(f) }
    }

    /// Extract the key of `item`.
    #[must_use]
    pub fn key_of(&self, item: &T) -> ItemKey {
        (self.f)(item)
    }

    /// Extract keys for a whole slice, in order.
    #[must_use]
    pub fn keys_of(&self, items: &[T]) -> Vec<ItemKey> {
        items.iter().map(|item| self.key_of(item)).collect()
    }
}

impl<T: Keyed + 'static> KeyExtractor<T> {
    /// Extractor that delegates to [`Keyed::key`].
    #[must_use]
    pub fn keyed() -> Self {
        Self::new(T::key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: u32,
    }

    impl Keyed for Row {
        fn key(&self) -> ItemKey {
            ItemKey::from(self.id)
        }
    }

    #[test]
    fn conversions_and_display() {
        assert_eq!(ItemKey::from(7usize), ItemKey::Int(7));
        assert_eq!(ItemKey::from("a").to_string(), "a");
        assert_eq!(ItemKey::from(String::from("b")), ItemKey::from("b"));
        assert_eq!(ItemKey::from(-3i32).to_string(), "-3");
    }

    #[test]
    fn int_and_str_keys_differ() {
        assert_ne!(ItemKey::from(1i64), ItemKey::from("1"));
    }

    #[test]
    fn extractor_closure_and_keyed() {
        let by_name = KeyExtractor::new(|s: &String| ItemKey::from(s.as_str()));
        assert_eq!(by_name.key_of(&"x".to_string()), ItemKey::from("x"));

        let keyed = KeyExtractor::<Row>::keyed();
        let rows = [Row { id: 1 }, Row { id: 2 }];
        assert_eq!(keyed.keys_of(&rows), vec![ItemKey::Int(1), ItemKey::Int(2)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn keys_serialize_untagged() {
        let keys = vec![ItemKey::from(1i64), ItemKey::from("a")];
        let json = serde_json::to_string(&keys).unwrap();
        assert_eq!(json, r#"[1,"a"]"#);
        let back: Vec<ItemKey> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, keys);
    }
}
