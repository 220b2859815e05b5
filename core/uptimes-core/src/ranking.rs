//! Upsert, sort and truncate for the ranked lists.
//!
//! Both lists go through the same [`rank`] step and only differ in the
//! comparator. Durations are recomputed from each record's own boot/end pair
//! on every comparison, so a record whose end time was just refreshed sorts
//! by its new uptime.

use std::cmp::Ordering;

use crate::time::Timestamp;
use crate::types::{CurrentSession, Database, RankOrder, SessionRecord};

/// Default bound on the length of each ranked list.
pub const DEFAULT_KEEP_COUNT: usize = 10;

/// Stable-sorts `list` with `compare` and keeps the first `limit` entries.
pub fn rank<F>(mut list: Vec<SessionRecord>, compare: F, limit: usize) -> Vec<SessionRecord>
where
    F: FnMut(&SessionRecord, &SessionRecord) -> Ordering,
{
    list.sort_by(compare);
    list.truncate(limit);
    list
}

/// Descending comparator for `order`.
pub fn descending(order: RankOrder) -> impl Fn(&SessionRecord, &SessionRecord) -> Ordering {
    move |a, b| order.sort_value(b).total_cmp(&order.sort_value(a))
}

/// Records that `current` was alive at `now`, then re-ranks the list.
///
/// An existing entry for the session keeps its original boot time and only
/// has its end time moved forward. Extra entries sharing the session's key
/// are dropped.
pub fn update(
    mut list: Vec<SessionRecord>,
    current: &CurrentSession,
    now: Timestamp,
    order: RankOrder,
    keep_count: usize,
) -> Vec<SessionRecord> {
    let mut seen = false;
    list.retain_mut(|record| {
        if record.key != current.key {
            return true;
        }
        if seen {
            return false;
        }
        seen = true;
        record.end_time = now;
        true
    });

    if !seen {
        list.push(SessionRecord::new(current, now));
    }

    rank(list, descending(order), keep_count)
}

/// Runs [`update`] on both lists of `db`.
pub fn update_database(
    db: Database,
    current: &CurrentSession,
    now: Timestamp,
    keep_count: usize,
) -> Database {
    Database {
        recency: update(db.recency, current, now, RankOrder::Recency, keep_count),
        duration: update(db.duration, current, now, RankOrder::Duration, keep_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(boot: f64) -> CurrentSession {
        CurrentSession::new(Timestamp::from_secs_f64(boot))
    }

    fn ts(secs: f64) -> Timestamp {
        Timestamp::from_secs_f64(secs)
    }

    fn boots(list: &[SessionRecord]) -> Vec<f64> {
        list.iter().map(|r| r.boot_time.as_secs_f64()).collect()
    }

    #[test]
    fn test_update_inserts_new_session() {
        let list = update(vec![], &session(0.0), ts(100.0), RankOrder::Recency, 10);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].end_time, ts(100.0));
        assert_eq!(list[0].key, session(0.0).key);
    }

    #[test]
    fn test_update_refreshes_end_time_and_keeps_boot() {
        let current = session(10.0);
        let list = update(vec![], &current, ts(20.0), RankOrder::Duration, 10);
        let list = update(list, &current, ts(50.0), RankOrder::Duration, 10);
        let list = update(list, &current, ts(70.0), RankOrder::Duration, 10);

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].boot_time, ts(10.0));
        assert_eq!(list[0].end_time, ts(70.0));
    }

    #[test]
    fn test_update_keeps_stored_boot_time_for_existing_key() {
        let current = session(10.0);
        let stored = SessionRecord {
            key: current.key.clone(),
            boot_time: ts(5.0),
            end_time: ts(20.0),
        };
        let list = update(vec![stored], &current, ts(30.0), RankOrder::Recency, 10);
        assert_eq!(list[0].boot_time, ts(5.0));
        assert_eq!(list[0].end_time, ts(30.0));
    }

    #[test]
    fn test_update_collapses_duplicate_keys() {
        let current = session(1.0);
        let dup = SessionRecord::new(&current, ts(2.0));
        let list = update(
            vec![dup.clone(), dup],
            &current,
            ts(9.0),
            RankOrder::Recency,
            10,
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].end_time, ts(9.0));
    }

    #[test]
    fn test_recency_sorts_by_end_time_descending() {
        let list = update(vec![], &session(0.0), ts(100.0), RankOrder::Recency, 10);
        let list = update(list, &session(50.0), ts(90.0), RankOrder::Recency, 10);
        let list = update(list, &session(10.0), ts(200.0), RankOrder::Recency, 10);
        assert_eq!(boots(&list), vec![10.0, 0.0, 50.0]);
    }

    #[test]
    fn test_duration_sorts_by_uptime_descending() {
        let list = update(vec![], &session(0.0), ts(100.0), RankOrder::Duration, 10);
        let list = update(list, &session(50.0), ts(90.0), RankOrder::Duration, 10);
        let list = update(list, &session(10.0), ts(200.0), RankOrder::Duration, 10);
        assert_eq!(boots(&list), vec![10.0, 0.0, 50.0]);
    }

    #[test]
    fn test_duration_ranking_follows_refreshed_end_time() {
        let long = session(0.0);
        let short = session(100.0);
        let list = update(vec![], &long, ts(50.0), RankOrder::Duration, 10);
        let list = update(list, &short, ts(120.0), RankOrder::Duration, 10);
        assert_eq!(boots(&list), vec![0.0, 100.0]);

        let list = update(list, &short, ts(400.0), RankOrder::Duration, 10);
        assert_eq!(boots(&list), vec![100.0, 0.0]);
    }

    #[test]
    fn test_truncation_drops_lowest_ranked() {
        let mut list = vec![];
        for i in 0..5 {
            let boot = f64::from(i) * 10.0;
            list = update(list, &session(boot), ts(boot + 1.0), RankOrder::Recency, 3);
            assert!(list.len() <= 3);
        }
        assert_eq!(boots(&list), vec![40.0, 30.0, 20.0]);
    }

    #[test]
    fn test_new_session_can_be_truncated_away() {
        let list = update(vec![], &session(0.0), ts(1000.0), RankOrder::Duration, 1);
        let list = update(list, &session(990.0), ts(1001.0), RankOrder::Duration, 1);
        assert_eq!(boots(&list), vec![0.0]);
    }

    #[test]
    fn test_keep_count_zero_yields_empty_list() {
        let list = update(vec![], &session(0.0), ts(10.0), RankOrder::Recency, 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let a = SessionRecord::new(&session(1.0), ts(10.0));
        let b = SessionRecord::new(&session(2.0), ts(10.0));
        let ranked = rank(vec![a.clone(), b.clone()], descending(RankOrder::Recency), 5);
        assert_eq!(ranked, vec![a.clone(), b.clone()]);
        let ranked = rank(vec![b.clone(), a.clone()], descending(RankOrder::Recency), 5);
        assert_eq!(ranked, vec![b, a]);
    }

    #[test]
    fn test_update_database_touches_both_lists() {
        let db = update_database(Database::default(), &session(0.0), ts(100.0), 10);
        assert_eq!(db.recency.len(), 1);
        assert_eq!(db.duration.len(), 1);
        assert_eq!(db.recency[0], db.duration[0]);
    }
}
