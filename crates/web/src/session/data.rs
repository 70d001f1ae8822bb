//! Session payload.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use domain::{SessionScope, AUTH_SESSION_KEY};

/// Key/value data kept for one client session, stored as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionData(BTreeMap<String, Value>);

impl SessionData {
    /// Typed read of a key; `None` when absent or of another type.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.0
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Authenticated driver, if any
    pub fn driver_id(&self) -> Option<Uuid> {
        self.get(AUTH_SESSION_KEY)
    }

    pub fn set_driver_id(&mut self, id: Uuid) {
        self.insert(AUTH_SESSION_KEY, id.to_string());
    }
}

impl SessionScope for SessionData {
    fn counter(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    fn set_counter(&mut self, key: &str, value: u64) {
        self.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{record_visit, VISITS_SESSION_KEY};

    #[test]
    fn test_visits_counted_in_session_data() {
        let mut data = SessionData::default();
        assert_eq!(record_visit(&mut data), 1);
        assert_eq!(record_visit(&mut data), 2);
        assert_eq!(data.get::<u64>(VISITS_SESSION_KEY), Some(2));
    }

    #[test]
    fn test_non_integer_counter_restarts() {
        let mut data = SessionData::default();
        data.insert(VISITS_SESSION_KEY, "many");
        assert_eq!(record_visit(&mut data), 1);
    }

    #[test]
    fn test_driver_id_round_trips_through_json() {
        let id = Uuid::new_v4();
        let mut data = SessionData::default();
        data.set_driver_id(id);

        let json = serde_json::to_string(&data).unwrap();
        let restored: SessionData = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.driver_id(), Some(id));
    }

    #[test]
    fn test_clear() {
        let mut data = SessionData::default();
        data.set_driver_id(Uuid::new_v4());
        data.clear();
        assert!(data.is_empty());
        assert_eq!(data.driver_id(), None);
    }
}
