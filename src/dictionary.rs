use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MathError;

/// A growing registry assigning stable integer ids to names.
///
/// Ids start at `min_id` and increase by one for every new name. Names are
/// never removed, so an id, once handed out, always maps back to the same
/// name. There is no default first id: feature dictionaries start above
/// [`BIAS_INDEX`](crate::BIAS_INDEX).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredDictionary", into = "StoredDictionary")]
pub struct Dictionary {
    min_id: usize,
    ids: HashMap<String, usize>,
    // `names[k]` is the name with id `min_id + k`
    names: Vec<String>,
}

/// On-disk form: the names in id order.
#[derive(Serialize, Deserialize)]
struct StoredDictionary {
    min_id: usize,
    names: Vec<String>,
}

impl Dictionary {
    /// Empty dictionary whose first id is `min_id`.
    pub fn with_min_id(min_id: usize) -> Self {
        Self {
            min_id,
            ids: HashMap::new(),
            names: Vec::new(),
        }
    }

    pub fn min_id(&self) -> usize {
        self.min_id
    }

    /// Id the next unseen name will receive.
    pub fn next_id(&self) -> usize {
        self.min_id + self.names.len()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Id of `name`, allocating the next one if the name is new.
    pub fn add_name(&mut self, name: &str) -> usize {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.next_id();
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        log::trace!("dictionary: {:?} -> {}", name, id);
        id
    }

    /// Id of `name` without allocating.
    pub fn id_from_name(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    pub fn name_from_id(&self, id: usize) -> Option<&str> {
        id.checked_sub(self.min_id)
            .and_then(|k| self.names.get(k))
            .map(String::as_str)
    }

    /// `(id, name)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(move |(k, name)| (self.min_id + k, name.as_str()))
    }
}

impl TryFrom<StoredDictionary> for Dictionary {
    type Error = MathError;

    fn try_from(stored: StoredDictionary) -> Result<Self, MathError> {
        let mut ids = HashMap::with_capacity(stored.names.len());
        for (k, name) in stored.names.iter().enumerate() {
            if ids.insert(name.clone(), stored.min_id + k).is_some() {
                return Err(MathError::DuplicateName(name.clone()));
            }
        }
        Ok(Dictionary {
            min_id: stored.min_id,
            ids,
            names: stored.names,
        })
    }
}

impl From<Dictionary> for StoredDictionary {
    fn from(dict: Dictionary) -> Self {
        StoredDictionary {
            min_id: dict.min_id,
            names: dict.names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_name_is_idempotent() {
        let mut dict = Dictionary::with_min_id(0);
        let x = dict.add_name("x");
        assert_eq!(dict.add_name("x"), x);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_ids_are_monotonic_and_distinct() {
        let mut dict = Dictionary::with_min_id(10);
        let ids: Vec<usize> = ["a", "b", "c", "a", "d"].iter().map(|n| dict.add_name(n)).collect();
        assert_eq!(ids, vec![10, 11, 12, 10, 13]);
        assert_eq!(dict.next_id(), 14);
        assert_eq!(dict.min_id(), 10);
    }

    #[test]
    fn test_lookups() {
        let mut dict = Dictionary::with_min_id(1);
        assert!(dict.is_empty());
        let id = dict.add_name("age");

        assert_eq!(dict.id_from_name("age"), Some(id));
        assert_eq!(dict.id_from_name("height"), None);
        assert_eq!(dict.len(), 1);

        assert_eq!(dict.name_from_id(id), Some("age"));
        assert_eq!(dict.name_from_id(0), None);
        assert_eq!(dict.name_from_id(id + 1), None);
    }

    #[test]
    fn test_maps_stay_inverse() {
        let mut dict = Dictionary::with_min_id(3);
        for name in ["u", "v", "w", "v"] {
            dict.add_name(name);
        }
        for (id, name) in dict.iter() {
            assert_eq!(dict.id_from_name(name), Some(id));
            assert_eq!(dict.name_from_id(id), Some(name));
        }
        assert_eq!(dict.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut dict = Dictionary::with_min_id(1);
        dict.add_name("alpha");
        dict.add_name("beta");

        let json = serde_json::to_string(&dict).unwrap();
        assert_eq!(json, r#"{"min_id":1,"names":["alpha","beta"]}"#);

        let back: Dictionary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dict);
        assert_eq!(back.id_from_name("beta"), Some(2));
    }

    #[test]
    fn test_load_rejects_duplicate_names() {
        let json = r#"{"min_id":1,"names":["a","a","b"]}"#;
        let err = serde_json::from_str::<Dictionary>(json).unwrap_err();
        assert!(err.to_string().contains(r#"duplicate dictionary name "a""#));
    }

    #[test]
    fn test_load_keeps_stored_ids() {
        let json = r#"{"min_id":5,"names":["x","y","z"]}"#;
        let dict: Dictionary = serde_json::from_str(json).unwrap();
        assert_eq!(dict.id_from_name("z"), Some(7));
        assert_eq!(dict.name_from_id(5), Some("x"));
        assert_eq!(dict.next_id(), 8);
    }
}
