use chrono::NaiveDate;
use proptest::prelude::*;
use rrbackup::{
    BackupRecord, RetentionError, RetentionPolicy, RetentionReason, Tier, calendar_date, decide,
    partition, retained_dates, rotating_slot_for, slot_for,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn default_policy_keeps_anchor_but_not_neighbours_outside_slots() {
    let policy = RetentionPolicy::new(6, 5, 6, 10, d(2004, 2, 21)).unwrap();
    let retained = retained_dates(&policy);
    assert!(retained.contains(&d(2004, 2, 21)));
    assert!(!retained.contains(&d(2004, 2, 22)));
    assert!(!retained.contains(&d(1996, 1, 21)));

    let records = vec![
        BackupRecord::new("backup-1996-01-21", d(1996, 1, 21)),
        BackupRecord::new("backup-2004-02-21.tar.bzip2", d(2004, 2, 21)),
        BackupRecord::new("backup-2004-02-22.tar", d(2004, 2, 22)),
    ];
    assert_eq!(
        decide(&records, &retained),
        vec!["backup-1996-01-21", "backup-2004-02-22.tar"]
    );
}

#[test]
fn default_policy_slot_count() {
    let policy = RetentionPolicy::new(6, 5, 6, 10, d(2004, 2, 21)).unwrap();
    let retained = retained_dates(&policy);
    // anchor + 5 more days + 4 more weeks + 5 more months + 9 more years
    assert_eq!(retained.len(), 1 + 5 + 4 + 5 + 9);
    assert_eq!(retained.dates().next(), Some(d(1995, 2, 21)));
    assert_eq!(retained.dates().last(), Some(d(2004, 2, 21)));
}

#[test]
fn week_slot_keeps_backup_the_day_tier_misses() {
    let anchor = d(2004, 2, 21);
    let policy = RetentionPolicy::new(3, 2, 0, 0, anchor).unwrap();
    let retained = retained_dates(&policy);
    let week_ago = d(2004, 2, 14);
    assert_eq!(
        retained.reason(&week_ago),
        Some(RetentionReason::Slot {
            tier: Tier::Week,
            offset: 1
        })
    );
    assert!(!retained.contains(&d(2004, 2, 17)));

    let records = vec![
        BackupRecord::new("w", week_ago),
        BackupRecord::new("gap", d(2004, 2, 16)),
    ];
    assert_eq!(decide(&records, &retained), vec!["gap"]);
}

#[test]
fn same_date_duplicates_are_kept_or_removed_together() {
    let policy = RetentionPolicy::new(1, 0, 0, 0, d(2010, 6, 30)).unwrap();
    let retained = retained_dates(&policy);
    let records = vec![
        BackupRecord::new("keep-a", d(2010, 6, 30)),
        BackupRecord::new("drop-a", d(2010, 6, 1)),
        BackupRecord::new("keep-b", d(2010, 6, 30)),
        BackupRecord::new("drop-b", d(2010, 6, 1)),
    ];
    let plan = partition(&records, &retained);
    let kept: Vec<_> = plan.keep.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(kept, vec!["keep-a", "keep-b"]);
    assert_eq!(plan.remove_ids(), vec!["drop-a", "drop-b"]);
}

#[test]
fn month_slots_clamp_at_month_end() {
    let policy = RetentionPolicy::new(0, 0, 3, 0, d(2004, 3, 31)).unwrap();
    let retained = retained_dates(&policy);
    let dates: Vec<_> = retained.dates().collect();
    assert_eq!(dates, vec![d(2004, 1, 31), d(2004, 2, 29), d(2004, 3, 31)]);
}

#[test]
fn invalid_inputs_are_reported() {
    assert!(matches!(
        calendar_date(2005, 2, 29),
        Err(RetentionError::InvalidDate(_))
    ));
    assert!(matches!(
        RetentionPolicy::new(-1, 0, 0, 0, d(2005, 1, 1)),
        Err(RetentionError::InvalidPolicy(_))
    ));
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1990i32..2030, 1u32..=12, 1u32..=31)
        .prop_filter_map("real calendar date", |(y, m, day)| {
            NaiveDate::from_ymd_opt(y, m, day)
        })
}

fn policy_strategy() -> impl Strategy<Value = RetentionPolicy> {
    (0i64..12, 0i64..8, 0i64..14, 0i64..12, date_strategy()).prop_map(
        |(days, weeks, months, years, anchor)| {
            RetentionPolicy::new(days, weeks, months, years, anchor).unwrap()
        },
    )
}

fn records_strategy() -> impl Strategy<Value = Vec<BackupRecord>> {
    prop::collection::vec(date_strategy(), 0..24).prop_map(|dates| {
        dates
            .into_iter()
            .enumerate()
            .map(|(idx, date)| BackupRecord::new(format!("backup-{idx}"), date))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_anchor_is_always_retained(policy in policy_strategy()) {
        let retained = retained_dates(&policy);
        prop_assert_eq!(retained.reason(&policy.anchor()), Some(RetentionReason::Anchor));
    }

    #[test]
    fn prop_raising_a_count_never_drops_dates(policy in policy_strategy(), tier_idx in 0usize..4) {
        let counts = policy.counts();
        let mut raised = counts;
        match Tier::ALL[tier_idx] {
            Tier::Day => raised.days += 1,
            Tier::Week => raised.weeks += 1,
            Tier::Month => raised.months += 1,
            Tier::Year => raised.years += 1,
        }
        let before = retained_dates(&policy);
        let after = retained_dates(&RetentionPolicy::from_counts(raised, policy.anchor()));
        for date in before.dates() {
            prop_assert!(after.contains(&date), "{} dropped", date);
        }
    }

    #[test]
    fn prop_all_zero_policy_is_anchor_only(anchor in date_strategy()) {
        let policy = RetentionPolicy::new(0, 0, 0, 0, anchor).unwrap();
        let dates: Vec<_> = retained_dates(&policy).dates().collect();
        prop_assert_eq!(dates, vec![anchor]);
    }

    #[test]
    fn prop_slot_for_agrees_with_enumeration(policy in policy_strategy(), back in -30i64..5000) {
        let retained = retained_dates(&policy);
        let date = policy.anchor() - chrono::Duration::days(back);
        prop_assert_eq!(slot_for(&policy, date), retained.reason(&date));
    }

    #[test]
    fn prop_partition_is_exact_and_decide_is_stable(
        policy in policy_strategy(),
        records in records_strategy(),
    ) {
        let retained = retained_dates(&policy);
        let plan = partition(&records, &retained);
        prop_assert_eq!(plan.keep.len() + plan.remove.len(), records.len());
        for backup in &plan.keep {
            prop_assert!(!plan.remove.iter().any(|r| r.id == backup.id));
        }

        let first = decide(&records, &retained);
        let second = decide(&records, &retained_dates(&policy));
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, plan.remove_ids());
    }

    #[test]
    fn prop_rotating_slots_cover_every_forward_shift(policy in policy_strategy(), tier_idx in 0usize..4) {
        let tier = Tier::ALL[tier_idx];
        for offset in 0..policy.retain_count(tier).min(40) {
            let Some(date) = rrbackup::bucket::shift_forward(tier, policy.anchor(), offset) else {
                break;
            };
            prop_assert!(rotating_slot_for(&policy, date).is_some(), "{} not retained", date);
        }
    }

    #[test]
    fn prop_rotating_agrees_with_slot_for_up_to_the_anchor(policy in policy_strategy(), back in 0i64..5000) {
        let date = policy.anchor() - chrono::Duration::days(back);
        prop_assert_eq!(rotating_slot_for(&policy, date), slot_for(&policy, date));
    }
}
