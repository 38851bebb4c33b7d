use rustc_hash::FxHashMap;

use crate::{
    merge::{Direction, MergeError},
    store::sorted_set::{SortedSet, SortedSetCursor},
};

/// A value stored under a key. Only sorted sets can be merged, the other
/// variants exist so that type mismatches can happen.
#[derive(Debug, Clone)]
pub enum Value {
    SortedSet(SortedSet),
    String(String),
    List(Vec<String>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::SortedSet(_) => "zset",
            Value::String(_) => "string",
            Value::List(_) => "list",
        }
    }
}

#[derive(Debug, Default)]
pub struct Keyspace {
    values: FxHashMap<String, Value>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Adds members to the sorted set at `key`, creating it if needed.
    /// Returns how many members were new.
    pub fn zadd<S, I>(&mut self, key: &str, members: I) -> Result<usize, MergeError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, f64)>,
    {
        let value = self
            .values
            .entry(key.to_string())
            .or_insert_with(|| Value::SortedSet(SortedSet::new()));
        match value {
            Value::SortedSet(set) => Ok(members
                .into_iter()
                .map(|(member, score)| set.add(member, score))
                .filter(|added| *added)
                .count()),
            other => Err(MergeError::WrongType {
                key: key.to_string(),
                found: other.type_name(),
            }),
        }
    }

    /// Opens a cursor on the sorted set at `key`, positioned on its first
    /// element for `direction`.
    ///
    /// Missing keys and empty sets give `Ok(None)`, a key holding anything
    /// other than a sorted set is a `WrongType` error.
    pub fn open_sorted_set(
        &self,
        key: &str,
        direction: Direction,
    ) -> Result<Option<SortedSetCursor<'_>>, MergeError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::SortedSet(set)) if set.is_empty() => Ok(None),
            Some(Value::SortedSet(set)) => Ok(Some(set.cursor(direction))),
            Some(other) => Err(MergeError::WrongType {
                key: key.to_string(),
                found: other.type_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SortedCursor;

    #[test]
    fn test_zadd_creates_and_counts_new_members() {
        let mut keyspace = Keyspace::new();
        assert_eq!(keyspace.zadd("z", [("a", 1.0), ("b", 2.0)]).unwrap(), 2);
        assert_eq!(keyspace.zadd("z", [("a", 5.0), ("c", 3.0)]).unwrap(), 1);
        assert_eq!(keyspace.len(), 1);

        match keyspace.get("z") {
            Some(Value::SortedSet(set)) => {
                assert_eq!(set.len(), 3);
                assert_eq!(set.score("a"), Some(5.0));
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_zadd_on_wrong_type() {
        let mut keyspace = Keyspace::new();
        keyspace.set("s", Value::String("hello".to_string()));
        assert!(matches!(
            keyspace.zadd("s", [("a", 1.0)]),
            Err(MergeError::WrongType { found: "string", .. })
        ));
    }

    #[test]
    fn test_open_sorted_set() {
        let mut keyspace = Keyspace::new();
        keyspace.zadd("z", [("a", 1.0), ("b", 2.0)]).unwrap();
        keyspace.set("empty", Value::SortedSet(SortedSet::new()));
        keyspace.set("l", Value::List(vec!["x".to_string()]));

        let cursor = keyspace
            .open_sorted_set("z", Direction::Forward)
            .unwrap()
            .unwrap();
        assert_eq!(cursor.current(), Some((&"b".to_string(), 2.0)));

        let cursor = keyspace
            .open_sorted_set("z", Direction::Reverse)
            .unwrap()
            .unwrap();
        assert_eq!(cursor.current(), Some((&"a".to_string(), 1.0)));

        assert!(keyspace.open_sorted_set("missing", Direction::Forward).unwrap().is_none());
        assert!(keyspace.open_sorted_set("empty", Direction::Forward).unwrap().is_none());

        match keyspace.open_sorted_set("l", Direction::Forward) {
            Err(MergeError::WrongType { key, found }) => {
                assert_eq!(key, "l");
                assert_eq!(found, "list");
            }
            _ => panic!("expected a type mismatch"),
        }
    }
}
