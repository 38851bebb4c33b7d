use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use serde::Deserialize;

use crate::store::{Keyspace, SortedSet, Value};

// On disk a dataset is a JSON object from key to a tagged value:
// {"scores": {"zset": [["alice", 3.5], ["bob", 1.0]]}, "motd": {"string": "hi"}}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DatasetValue {
    Zset(Vec<(String, f64)>),
    String(String),
    List(Vec<String>),
}

impl From<DatasetValue> for Value {
    fn from(value: DatasetValue) -> Self {
        match value {
            DatasetValue::Zset(members) => {
                let mut set = SortedSet::new();
                for (member, score) in members {
                    set.add(member, score);
                }
                Value::SortedSet(set)
            }
            DatasetValue::String(text) => Value::String(text),
            DatasetValue::List(items) => Value::List(items),
        }
    }
}

pub fn load_dataset<P: AsRef<Path>>(path: P) -> io::Result<Keyspace> {
    let reader = BufReader::new(File::open(path)?);
    let values: HashMap<String, DatasetValue> = serde_json::from_reader(reader)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let mut keyspace = Keyspace::new();
    for (key, value) in values {
        keyspace.set(key, value.into());
    }
    Ok(keyspace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_mixed_dataset() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "scores": {"zset": [["alice", 3.5], ["bob", 1.0]]},
                "motd": {"string": "hi"},
                "queue": {"list": ["a", "b"]}
            }"#,
        )
        .unwrap();
        file.flush().unwrap();

        let keyspace = load_dataset(file.path()).unwrap();
        assert_eq!(keyspace.len(), 3);
        match keyspace.get("scores") {
            Some(Value::SortedSet(set)) => {
                assert_eq!(set.len(), 2);
                assert_eq!(set.score("alice"), Some(3.5));
            }
            other => panic!("unexpected value {:?}", other),
        }
        assert_eq!(keyspace.get("motd").unwrap().type_name(), "string");
        assert_eq!(keyspace.get("queue").unwrap().type_name(), "list");
    }

    #[test]
    fn test_invalid_dataset() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"scores": {"hash": {}}}"#).unwrap();
        file.flush().unwrap();

        let err = load_dataset(file.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path().join("nope.json")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
