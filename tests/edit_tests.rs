use chrono::FixedOffset;
use clockblocks::core::edit::{EditLogic, commit_plan};
use clockblocks::core::reconcile::reconcile;
use clockblocks::core::tracker::{activate, stop};
use clockblocks::db::pool::DbPool;
use clockblocks::db::queries::{
    list_intervals, list_sessions, soft_delete_category, upsert_interval, upsert_session,
};
use clockblocks::errors::{AppError, ValidationError};
use clockblocks::models::session::Session;

mod common;
use common::{box_id, closed, hm, memory_pool};

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// Store an ended session made of closed `(box, start, end)` intervals.
fn seed_session(pool: &mut DbPool, spans: &[(&str, &str, &str)]) -> Session {
    let ids: Vec<String> = spans.iter().map(|(name, _, _)| box_id(pool, name)).collect();

    let mut session = Session::new();
    session.start = Some(hm(spans[0].1));
    session.end = Some(hm(spans[spans.len() - 1].2));
    session.duration = (session.end.unwrap() - session.start.unwrap()).num_seconds();

    let tx = pool.begin().unwrap();
    upsert_session(&tx, &session).unwrap();
    for ((_, s, e), id) in spans.iter().zip(&ids) {
        upsert_interval(&tx, &closed(&session.id, id, hm(s), hm(e))).unwrap();
    }
    tx.commit().unwrap();
    session
}

fn layout(pool: &DbPool, session: &Session) -> Vec<(String, String, String)> {
    let read = box_id(pool, "Read");
    let code = box_id(pool, "Code");
    list_intervals(&pool.conn, &session.id)
        .unwrap()
        .into_iter()
        .map(|i| {
            let name = if i.category_id == read {
                "Read"
            } else if i.category_id == code {
                "Code"
            } else {
                "Other"
            };
            (
                name.to_string(),
                i.start.format("%H:%M").to_string(),
                i.end.map(|e| e.format("%H:%M").to_string()).unwrap_or_default(),
            )
        })
        .collect()
}

fn row(name: &str, s: &str, e: &str) -> (String, String, String) {
    (name.to_string(), s.to_string(), e.to_string())
}

#[test]
fn scenario_a_is_committed_to_storage() {
    let mut pool = memory_pool();
    let session = seed_session(&mut pool, &[("Read", "08:00", "09:00")]);

    let report =
        EditLogic::apply(&mut pool, "1", "08:30", "08:45", Some("Code"), utc(), hm("12:00"))
            .unwrap();

    assert_eq!(report.session_number, 1);
    assert_eq!((report.deleted, report.updated, report.inserted), (0, 1, 2));
    assert_eq!(report.intervals.len(), 3);
    assert_eq!(
        layout(&pool, &session),
        vec![
            row("Read", "08:00", "08:30"),
            row("Code", "08:30", "08:45"),
            row("Read", "08:45", "09:00"),
        ]
    );

    let stored = &list_sessions(&pool.conn).unwrap()[0];
    assert_eq!(stored.duration, 3600);
    assert_eq!(stored.start, Some(hm("08:00")));
    assert_eq!(stored.end, Some(hm("09:00")));
}

#[test]
fn duration_is_recomputed_from_intervals() {
    let mut pool = memory_pool();
    let session = seed_session(
        &mut pool,
        &[("Read", "08:00", "09:00"), ("Read", "09:30", "10:00")],
    );

    // Filling the break and running past the session end.
    EditLogic::apply(&mut pool, &session.id, "08:45", "10:30", Some("code"), utc(), hm("12:00"))
        .unwrap();

    assert_eq!(
        layout(&pool, &session),
        vec![row("Read", "08:00", "08:45"), row("Code", "08:45", "10:30")]
    );
    let stored = &list_sessions(&pool.conn).unwrap()[0];
    assert_eq!(stored.duration, 150 * 60);
    assert_eq!(stored.end, Some(hm("10:30")));
}

#[test]
fn invalid_input_leaves_storage_untouched() {
    let mut pool = memory_pool();
    let session = seed_session(&mut pool, &[("Read", "08:00", "09:00")]);
    let before = list_intervals(&pool.conn, &session.id).unwrap();

    let cases = [
        (Some("Code"), "8:30", "08:45", ValidationError::InvalidFormat),
        (None, "08:30", "08:45", ValidationError::NoCategory),
        (Some("Code"), "14:00", "15:00", ValidationError::InvalidRange),
    ];
    for (category, from, to, expected) in cases {
        let err = EditLogic::apply(&mut pool, "1", from, to, category, utc(), hm("12:00"))
            .unwrap_err();
        assert!(
            matches!(&err, AppError::Validation(v) if *v == expected),
            "{from}-{to}: {err}"
        );
    }

    assert_eq!(list_intervals(&pool.conn, &session.id).unwrap(), before);
}

#[test]
fn deleted_or_unknown_targets_are_rejected() {
    let mut pool = memory_pool();
    seed_session(&mut pool, &[("Read", "08:00", "09:00")]);
    let chess = box_id(&pool, "Chess");
    soft_delete_category(&pool.conn, &chess).unwrap();

    let err = EditLogic::apply(&mut pool, "1", "08:00", "08:30", Some("Chess"), utc(), hm("12:00"))
        .unwrap_err();
    assert!(matches!(err, AppError::Inactive(_)));

    let err = EditLogic::apply(&mut pool, "1", "08:00", "08:30", Some("Golf"), utc(), hm("12:00"))
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = EditLogic::apply(&mut pool, "7", "08:00", "08:30", Some("Code"), utc(), hm("12:00"))
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn storage_failure_rolls_back_the_whole_plan() {
    let mut pool = memory_pool();
    let session = seed_session(
        &mut pool,
        &[("Read", "08:00", "09:00"), ("Write", "09:00", "10:00")],
    );
    let before = list_intervals(&pool.conn, &session.id).unwrap();

    // Deletes succeed, then the insert violates the time-box foreign key.
    let plan = reconcile(
        &before,
        hm("08:00"),
        hm("10:00"),
        "no-such-box",
        &session.id,
        hm("12:00"),
    )
    .unwrap();
    assert_eq!(plan.to_delete.len(), 2);

    let mut changed = session.clone();
    changed.duration = 1;
    let err = commit_plan(&mut pool, &plan, &changed).unwrap_err();
    assert!(matches!(err, AppError::Db(_)));

    assert_eq!(list_intervals(&pool.conn, &session.id).unwrap(), before);
    assert_eq!(list_sessions(&pool.conn).unwrap()[0].duration, 7200);
}

#[test]
fn editing_an_active_session_keeps_it_running() {
    let mut pool = memory_pool();
    let read = box_id(&pool, "Read");

    let mut session = Session::new();
    session.start = Some(hm("08:00"));
    let running = clockblocks::models::interval::Interval::start_running(&session.id, &read, hm("08:00"));
    {
        let tx = pool.begin().unwrap();
        upsert_session(&tx, &session).unwrap();
        upsert_interval(&tx, &running).unwrap();
        tx.commit().unwrap();
    }

    EditLogic::apply(&mut pool, "1", "09:00", "09:30", Some("Code"), utc(), hm("11:00")).unwrap();

    let intervals = list_intervals(&pool.conn, &session.id).unwrap();
    let live: Vec<_> = intervals.iter().filter(|i| i.is_running()).collect();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, running.id);
    assert_eq!(live[0].start, hm("09:30"));

    let stored = &list_sessions(&pool.conn).unwrap()[0];
    assert!(stored.end.is_none());
}

fn assert_no_overlap(pool: &DbPool, session_id: &str, now: chrono::DateTime<chrono::Utc>) {
    let intervals = list_intervals(&pool.conn, session_id).unwrap();
    for (i, a) in intervals.iter().enumerate() {
        for b in &intervals[i + 1..] {
            let disjoint = a.effective_end(now) <= b.start || b.effective_end(now) <= a.start;
            assert!(disjoint, "{:?} overlaps {:?}", (a.start, a.end), (b.start, b.end));
        }
    }
}

#[test]
fn edit_ending_after_now_is_refused_and_tracking_continues() {
    let mut pool = memory_pool();
    activate(&mut pool, "Read", hm("10:00")).unwrap();
    let session = list_sessions(&pool.conn).unwrap()[0].clone();
    let before = list_intervals(&pool.conn, &session.id).unwrap();

    let err = EditLogic::apply(&mut pool, "1", "09:30", "12:00", Some("Code"), utc(), hm("11:00"))
        .unwrap_err();
    assert!(matches!(&err, AppError::Validation(ValidationError::EndInFuture)));
    assert_eq!(err.to_string(), "End cannot be later than now");
    assert_eq!(list_intervals(&pool.conn, &session.id).unwrap(), before);

    EditLogic::apply(&mut pool, "1", "10:15", "10:45", Some("Code"), utc(), hm("11:00")).unwrap();
    activate(&mut pool, "Calls", hm("11:05")).unwrap();
    assert_no_overlap(&pool, &session.id, hm("11:05"));

    stop(&mut pool, hm("11:30")).unwrap();
    assert_no_overlap(&pool, &session.id, hm("11:30"));
    let stored = &list_sessions(&pool.conn).unwrap()[0];
    assert_eq!(stored.end, Some(hm("11:30")));
}

#[test]
fn switching_before_recorded_history_ends_is_refused() {
    let mut pool = memory_pool();
    let code = box_id(&pool, "Code");
    activate(&mut pool, "Read", hm("10:00")).unwrap();
    let session = list_sessions(&pool.conn).unwrap()[0].clone();

    // Closed interval reaching past the instants used below.
    {
        let tx = pool.begin().unwrap();
        upsert_interval(&tx, &closed(&session.id, &code, hm("10:30"), hm("12:00"))).unwrap();
        tx.commit().unwrap();
    }
    let before = list_intervals(&pool.conn, &session.id).unwrap();

    let err = activate(&mut pool, "Calls", hm("11:05")).unwrap_err();
    assert!(matches!(err, AppError::Precondition(_)));
    let err = stop(&mut pool, hm("11:10")).unwrap_err();
    assert!(matches!(err, AppError::Precondition(_)));

    assert_eq!(list_intervals(&pool.conn, &session.id).unwrap(), before);
    assert!(list_sessions(&pool.conn).unwrap()[0].end.is_none());
}
