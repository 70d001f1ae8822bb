//! Dashboard visit counting.
//!
//! The counter lives in the caller's session; this module only knows how to
//! read and bump it. No locking happens here, so two concurrent requests on
//! the same session may both observe the same previous value.

use crate::constants::VISITS_SESSION_KEY;

/// The part of a client session the domain needs.
pub trait SessionScope {
    /// Read an integer counter, `None` when the key is absent or not a counter.
    fn counter(&self, key: &str) -> Option<u64>;

    /// Store an integer counter.
    fn set_counter(&mut self, key: &str, value: u64);
}

/// Increment the session's visit counter and return the new value.
pub fn record_visit<S: SessionScope + ?Sized>(session: &mut S) -> u64 {
    let visits = session.counter(VISITS_SESSION_KEY).unwrap_or(0) + 1;
    session.set_counter(VISITS_SESSION_KEY, visits);
    visits
}

/// Read the visit counter without changing it.
pub fn visit_count<S: SessionScope + ?Sized>(session: &S) -> u64 {
    session.counter(VISITS_SESSION_KEY).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct TestSession(HashMap<String, u64>);

    impl SessionScope for TestSession {
        fn counter(&self, key: &str) -> Option<u64> {
            self.0.get(key).copied()
        }

        fn set_counter(&mut self, key: &str, value: u64) {
            self.0.insert(key.to_string(), value);
        }
    }

    #[test]
    fn test_fresh_session_starts_at_one() {
        let mut session = TestSession::default();
        assert_eq!(visit_count(&session), 0);
        assert_eq!(record_visit(&mut session), 1);
    }

    #[test]
    fn test_visits_increase_per_call() {
        let mut session = TestSession::default();
        assert_eq!(record_visit(&mut session), 1);
        assert_eq!(record_visit(&mut session), 2);
        assert_eq!(record_visit(&mut session), 3);
        assert_eq!(visit_count(&session), 3);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut first = TestSession::default();
        let mut second = TestSession::default();
        assert_eq!(record_visit(&mut first), 1);
        assert_eq!(record_visit(&mut second), 1);
    }

    #[test]
    fn test_counter_written_under_visits_key() {
        let mut session = TestSession::default();
        record_visit(&mut session);
        assert_eq!(session.0.get("num_visits"), Some(&1));
    }

    #[test]
    fn test_resumes_from_existing_count() {
        let mut session = TestSession::default();
        session.set_counter(VISITS_SESSION_KEY, 41);
        assert_eq!(record_visit(&mut session), 42);
    }

    #[test]
    fn test_works_through_trait_object() {
        let mut session = TestSession::default();
        let scope: &mut dyn SessionScope = &mut session;
        assert_eq!(record_visit(scope), 1);
    }
}
