use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

pub const DEFAULT_WINDOW_WEEKS: i64 = 4;
pub const MAX_WINDOW_WEEKS: i64 = 5200;

/// Block and ban status of other players, as seen by the authenticated user.
pub trait ProfileLookup {
    /// Whether the authenticated user is blocking `username`.
    fn is_blocked(&self, username: &str) -> Result<bool, AppError>;

    /// Whether `username` has been marked for a terms-of-service violation.
    fn is_banned(&self, username: &str) -> Result<bool, AppError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockEvent {
    pub opponent_id: String,
    pub banned: bool,
    pub blocked: u32,
    pub blocked_and_banned: u32,
    pub percentage: f64,
}

pub struct OpponentAuditor {
    seen: HashSet<String>,
    window: Duration,
    blocked: u32,
    blocked_and_banned: u32,
}

impl OpponentAuditor {
    pub fn new(window: Duration) -> Self {
        OpponentAuditor {
            seen: HashSet::new(),
            window,
            blocked: 0,
            blocked_and_banned: 0,
        }
    }

    /// Saturates at the earliest representable time instead of overflowing.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Checks one opponent at most once per run.
    ///
    /// Games created before `now - window` are skipped without marking the
    /// opponent, so a later game inside the window would still be checked.
    /// Returns an event only when the opponent turns out to be blocked.
    pub fn audit(
        &mut self,
        opponent_id: &str,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
        lookup: &dyn ProfileLookup,
    ) -> Result<Option<BlockEvent>, AppError> {
        if self.seen.contains(opponent_id) {
            return Ok(None);
        }
        if created_at < self.cutoff(now) {
            log::debug!("skipping {}: game from {} is outside the window", opponent_id, created_at);
            return Ok(None);
        }
        self.seen.insert(opponent_id.to_string());

        if !lookup.is_blocked(opponent_id)? {
            return Ok(None);
        }
        self.blocked += 1;

        let banned = lookup.is_banned(opponent_id)?;
        if banned {
            self.blocked_and_banned += 1;
        }

        Ok(Some(BlockEvent {
            opponent_id: opponent_id.to_string(),
            banned,
            blocked: self.blocked,
            blocked_and_banned: self.blocked_and_banned,
            percentage: self.blocked_and_banned as f64 / self.blocked as f64 * 100.0,
        }))
    }

    pub fn opponents_checked(&self) -> usize {
        self.seen.len()
    }

    pub fn blocked(&self) -> u32 {
        self.blocked
    }

    pub fn blocked_and_banned(&self) -> u32 {
        self.blocked_and_banned
    }

    pub fn percentage(&self) -> Option<f64> {
        if self.blocked == 0 {
            None
        } else {
            Some(self.blocked_and_banned as f64 / self.blocked as f64 * 100.0)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::RefCell;

    #[derive(Default)]
    pub(crate) struct FakeLookup {
        pub blocked: Vec<&'static str>,
        pub banned: Vec<&'static str>,
        pub calls: RefCell<Vec<String>>,
    }

    impl ProfileLookup for FakeLookup {
        fn is_blocked(&self, username: &str) -> Result<bool, AppError> {
            self.calls.borrow_mut().push(format!("blocked:{}", username));
            Ok(self.blocked.iter().any(|b| *b == username))
        }

        fn is_banned(&self, username: &str) -> Result<bool, AppError> {
            self.calls.borrow_mut().push(format!("banned:{}", username));
            Ok(self.banned.iter().any(|b| *b == username))
        }
    }

    struct FailingLookup;

    impl ProfileLookup for FailingLookup {
        fn is_blocked(&self, _username: &str) -> Result<bool, AppError> {
            Err(AppError::HttpError("connection reset".to_string()))
        }

        fn is_banned(&self, _username: &str) -> Result<bool, AppError> {
            unreachable!()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn auditor() -> OpponentAuditor {
        OpponentAuditor::new(Duration::weeks(DEFAULT_WINDOW_WEEKS))
    }

    #[test]
    fn test_same_opponent_checked_once() {
        let lookup = FakeLookup::default();
        let mut auditor = auditor();

        auditor.audit("bob", now() - Duration::days(1), now(), &lookup).unwrap();
        auditor.audit("bob", now() - Duration::days(2), now(), &lookup).unwrap();
        auditor.audit("bob", now() - Duration::weeks(10), now(), &lookup).unwrap();

        assert_eq!(*lookup.calls.borrow(), vec!["blocked:bob".to_string()]);
        assert_eq!(auditor.opponents_checked(), 1);
    }

    #[test]
    fn test_old_game_is_skipped_on_first_encounter() {
        let lookup = FakeLookup {
            blocked: vec!["bob"],
            ..Default::default()
        };
        let mut auditor = auditor();

        let event = auditor
            .audit("bob", now() - Duration::weeks(5), now(), &lookup)
            .unwrap();

        assert!(event.is_none());
        assert!(lookup.calls.borrow().is_empty());
        assert_eq!(auditor.opponents_checked(), 0);
    }

    #[test]
    fn test_game_at_cutoff_is_checked() {
        let lookup = FakeLookup::default();
        let mut auditor = auditor();
        let cutoff = auditor.cutoff(now());

        auditor.audit("bob", cutoff, now(), &lookup).unwrap();
        assert_eq!(lookup.calls.borrow().len(), 1);
    }

    #[test]
    fn test_huge_window_does_not_overflow() {
        let lookup = FakeLookup::default();
        let mut auditor = OpponentAuditor::new(Duration::MAX);

        assert_eq!(auditor.cutoff(now()), DateTime::<Utc>::MIN_UTC);
        auditor
            .audit("bob", now() - Duration::weeks(MAX_WINDOW_WEEKS), now(), &lookup)
            .unwrap();
        assert_eq!(lookup.calls.borrow().len(), 1);
    }

    #[test]
    fn test_ban_only_queried_when_blocked() {
        let lookup = FakeLookup {
            banned: vec!["carol"],
            ..Default::default()
        };
        let mut auditor = auditor();

        let event = auditor.audit("carol", now(), now(), &lookup).unwrap();
        assert!(event.is_none());
        assert_eq!(*lookup.calls.borrow(), vec!["blocked:carol".to_string()]);
        assert_eq!(auditor.blocked(), 0);
        assert_eq!(auditor.percentage(), None);
    }

    #[test]
    fn test_running_percentage() {
        let lookup = FakeLookup {
            blocked: vec!["a", "b", "c"],
            banned: vec!["a"],
            ..Default::default()
        };
        let mut auditor = auditor();

        let first = auditor.audit("a", now(), now(), &lookup).unwrap().unwrap();
        assert!(first.banned);
        assert_eq!(first.percentage, 100.0);

        let second = auditor.audit("b", now(), now(), &lookup).unwrap().unwrap();
        assert!(!second.banned);
        assert_eq!(second.percentage, 50.0);

        assert!(auditor.audit("d", now(), now(), &lookup).unwrap().is_none());

        let third = auditor.audit("c", now(), now(), &lookup).unwrap().unwrap();
        assert_eq!(third.blocked, 3);
        assert_eq!(third.blocked_and_banned, 1);
        assert!((third.percentage - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(auditor.percentage(), Some(third.percentage));
    }

    #[test]
    fn test_lookup_error_propagates() {
        let mut auditor = auditor();
        let result = auditor.audit("bob", now(), now(), &FailingLookup);
        assert!(matches!(result, Err(AppError::HttpError(_))));
    }
}
