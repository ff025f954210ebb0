#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use crate::funding::{
        apply_target_update, close_funding, close_manually, ensure_deletable, invest, Funding,
        FundingError, FundingKind, Source, Target, TargetUpdate,
    };
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, minute, 0)
            .unwrap()
    }

    fn funding(full_amount: i64, invested_amount: i64, minute: u32) -> Funding {
        Funding {
            full_amount,
            invested_amount,
            fully_invested: false,
            created_at: at(minute),
            closed_at: None,
        }
    }

    fn target(id: i32, full_amount: i64, invested_amount: i64, minute: u32) -> Target {
        Target {
            id,
            name: format!("Project {}", id),
            description: "Shelter for homeless cats".to_string(),
            funding: funding(full_amount, invested_amount, minute),
        }
    }

    fn source(id: i32, full_amount: i64, invested_amount: i64, minute: u32) -> Source {
        Source {
            id,
            donor_id: Some("donor-1".to_string()),
            comment: None,
            funding: funding(full_amount, invested_amount, minute),
        }
    }

    fn now() -> NaiveDateTime {
        at(59)
    }

    // ==================== Allocation scenarios ====================

    #[test]
    fn test_exact_fit_closes_both_sides() {
        let mut incoming = source(1, 100, 0, 30);
        let outcome = invest(&mut incoming, vec![target(1, 100, 0, 0)], now()).unwrap();

        assert_eq!(incoming.funding.invested_amount, 100);
        assert!(incoming.funding.fully_invested);
        assert_eq!(incoming.funding.closed_at, Some(now()));

        assert_eq!(outcome.touched.len(), 1);
        let project = &outcome.touched[0];
        assert_eq!(project.funding.invested_amount, 100);
        assert!(project.funding.fully_invested);
        assert_eq!(project.funding.closed_at, Some(now()));
        assert!(outcome.allocations[0].counterpart_closed);
    }

    #[test]
    fn test_overflow_splits_across_oldest_targets() {
        let mut incoming = source(1, 150, 0, 30);
        let open = vec![target(1, 100, 0, 0), target(2, 100, 0, 1)];

        let outcome = invest(&mut incoming, open, now()).unwrap();

        assert!(incoming.funding.fully_invested);
        assert_eq!(incoming.funding.invested_amount, 150);

        let first = &outcome.touched[0];
        let second = &outcome.touched[1];
        assert_eq!(first.id, 1);
        assert_eq!(first.funding.invested_amount, 100);
        assert!(first.funding.fully_invested);
        assert_eq!(second.id, 2);
        assert_eq!(second.funding.invested_amount, 50);
        assert!(!second.funding.fully_invested);
        assert_eq!(second.funding.closed_at, None);
        assert_eq!(outcome.total_allocated(), 150);
    }

    #[test]
    fn test_empty_open_set_leaves_incoming_untouched() {
        let mut incoming = target(1, 50, 0, 0);
        let outcome = invest::<Target, Source>(&mut incoming, Vec::new(), now()).unwrap();

        assert!(outcome.touched.is_empty());
        assert!(outcome.allocations.is_empty());
        assert_eq!(incoming.funding.invested_amount, 0);
        assert!(!incoming.funding.fully_invested);
        assert_eq!(incoming.funding.closed_at, None);
    }

    #[test]
    fn test_larger_counterpart_absorbs_incoming_and_stays_open() {
        let mut incoming = target(1, 40, 0, 30);
        let open = vec![source(1, 100, 10, 0), source(2, 100, 0, 1)];

        let outcome = invest(&mut incoming, open, now()).unwrap();

        assert!(incoming.funding.fully_invested);
        assert_eq!(outcome.touched.len(), 1);
        assert_eq!(outcome.touched[0].id, 1);
        assert_eq!(outcome.touched[0].funding.invested_amount, 50);
        assert!(!outcome.touched[0].funding.fully_invested);
    }

    #[test]
    fn test_fifo_leaves_youngest_untouched() {
        let mut incoming = source(1, 70, 0, 30);
        let open = vec![
            target(1, 30, 0, 0),
            target(2, 40, 0, 1),
            target(3, 50, 0, 2),
        ];

        let outcome = invest(&mut incoming, open, now()).unwrap();

        let ids: Vec<i32> = outcome.touched.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(outcome.touched.iter().all(|t| t.funding.fully_invested));
        assert!(incoming.funding.fully_invested);
    }

    #[test]
    fn test_candidates_are_ordered_by_creation_then_id() {
        let mut incoming = source(1, 10, 0, 30);
        // Same creation time for 7 and 3; 3 wins on id. 9 is younger.
        let open = vec![target(9, 10, 0, 5), target(7, 10, 0, 1), target(3, 10, 0, 1)];

        let outcome = invest(&mut incoming, open, now()).unwrap();

        assert_eq!(outcome.touched.len(), 1);
        assert_eq!(outcome.touched[0].id, 3);
    }

    #[test]
    fn test_exhausted_open_set_keeps_incoming_open() {
        let mut incoming = target(1, 500, 0, 30);
        let open = vec![source(1, 100, 60, 0), source(2, 80, 0, 1)];

        let outcome = invest(&mut incoming, open, now()).unwrap();

        assert_eq!(incoming.funding.invested_amount, 120);
        assert!(!incoming.funding.fully_invested);
        assert_eq!(incoming.funding.closed_at, None);
        assert!(outcome.touched.iter().all(|s| s.funding.fully_invested));
        assert_eq!(outcome.allocations[0].amount, 40);
        assert_eq!(outcome.allocations[1].amount, 80);
    }

    #[test]
    fn test_invested_amounts_never_decrease() {
        let open = vec![target(1, 100, 25, 0), target(2, 100, 99, 1)];
        let before: Vec<i64> = open.iter().map(|t| t.funding.invested_amount).collect();

        let mut incoming = source(1, 60, 0, 30);
        let outcome = invest(&mut incoming, open, now()).unwrap();

        for (touched, previous) in outcome.touched.iter().zip(before) {
            assert!(touched.funding.invested_amount >= previous);
            assert!(touched.funding.invested_amount <= touched.funding.full_amount);
        }
    }

    // ==================== Invariant violations ====================

    #[test]
    fn test_overinvested_candidate_aborts_run() {
        let mut incoming = source(1, 50, 0, 30);
        let result = invest(&mut incoming, vec![target(4, 100, 120, 0)], now());

        match result {
            Err(Error::Funding(FundingError::InvestedOutOfRange {
                kind,
                id,
                invested_amount,
                full_amount,
            })) => {
                assert_eq!(kind, FundingKind::Target);
                assert_eq!(id, Some(4));
                assert_eq!(invested_amount, 120);
                assert_eq!(full_amount, 100);
            }
            other => panic!("expected InvestedOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_incoming_is_rejected() {
        let mut incoming = source(1, 0, 0, 30);
        let result = invest(&mut incoming, vec![target(1, 100, 0, 0)], now());

        assert!(matches!(
            result,
            Err(Error::Funding(FundingError::NonPositiveFullAmount { .. }))
        ));
    }

    #[test]
    fn test_closed_candidate_in_open_set_is_rejected() {
        let mut closed = target(2, 10, 10, 0);
        close_funding(&mut closed.funding, at(1));

        let mut incoming = source(1, 10, 0, 30);
        let result = invest(&mut incoming, vec![closed], now());

        assert!(matches!(
            result,
            Err(Error::Funding(FundingError::AlreadyClosed { id: 2, .. }))
        ));
    }

    // ==================== Closing rule ====================

    #[test]
    fn test_closing_twice_keeps_first_close_date() {
        let mut state = funding(100, 100, 0);
        close_funding(&mut state, at(10));
        let once = state.clone();
        close_funding(&mut state, at(20));

        assert_eq!(state, once);
        assert_eq!(state.closed_at, Some(at(10)));
    }

    #[test]
    fn test_manual_close_matches_allocation_close() {
        let mut manual = target(1, 100, 100, 0);
        close_manually(&mut manual, now()).unwrap();

        let mut incoming = source(1, 100, 0, 30);
        let outcome = invest(&mut incoming, vec![target(1, 100, 0, 0)], now()).unwrap();

        assert_eq!(manual.funding, outcome.touched[0].funding);
    }

    #[test]
    fn test_manual_close_rejects_unfunded_record() {
        let mut record = source(5, 100, 40, 0);
        let result = close_manually(&mut record, now());

        assert!(matches!(
            result,
            Err(Error::Funding(FundingError::NotFullyInvested {
                id: 5,
                invested_amount: 40,
                full_amount: 100,
                ..
            }))
        ));
        assert!(!record.funding.fully_invested);
    }

    #[test]
    fn test_manual_close_on_closed_record_is_noop() {
        let mut record = source(5, 100, 100, 0);
        close_manually(&mut record, at(10)).unwrap();
        close_manually(&mut record, at(20)).unwrap();

        assert_eq!(record.funding.closed_at, Some(at(10)));
    }

    // ==================== Target edits ====================

    #[test]
    fn test_update_to_invested_amount_closes_target() {
        let mut project = target(1, 100, 60, 0);
        let update = TargetUpdate {
            full_amount: Some(60),
            ..Default::default()
        };

        apply_target_update(&mut project, update, now()).unwrap();

        assert_eq!(project.funding.full_amount, 60);
        assert!(project.funding.fully_invested);
        assert_eq!(project.funding.closed_at, Some(now()));
    }

    #[test]
    fn test_update_below_invested_amount_is_rejected() {
        let mut project = target(1, 100, 60, 0);
        let update = TargetUpdate {
            full_amount: Some(59),
            ..Default::default()
        };

        let result = apply_target_update(&mut project, update, now());

        assert!(matches!(
            result,
            Err(Error::Funding(FundingError::FullAmountBelowInvested { .. }))
        ));
        assert_eq!(project.funding.full_amount, 100);
    }

    #[test]
    fn test_update_of_closed_target_is_rejected() {
        let mut project = target(1, 100, 100, 0);
        close_funding(&mut project.funding, at(1));
        let update = TargetUpdate {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };

        let result = apply_target_update(&mut project, update, now());

        assert!(matches!(
            result,
            Err(Error::Funding(FundingError::AlreadyClosed { .. }))
        ));
        assert_eq!(project.name, "Project 1");
    }

    #[test]
    fn test_update_attributes_keeps_target_open() {
        let mut project = target(1, 100, 10, 0);
        let update = TargetUpdate {
            name: Some("Renamed".to_string()),
            description: Some("New description".to_string()),
            full_amount: Some(200),
        };

        apply_target_update(&mut project, update, now()).unwrap();

        assert_eq!(project.name, "Renamed");
        assert_eq!(project.description, "New description");
        assert_eq!(project.funding.full_amount, 200);
        assert!(!project.funding.fully_invested);
    }

    #[test]
    fn test_only_untouched_targets_are_deletable() {
        assert!(ensure_deletable(&target(1, 100, 0, 0)).is_ok());
        assert!(matches!(
            ensure_deletable(&target(2, 100, 1, 0)),
            Err(Error::Funding(FundingError::AlreadyInvested { .. }))
        ));
    }

    // ==================== Serialization ====================

    #[test]
    fn test_target_serializes_flat_camel_case() {
        let mut project = target(3, 100, 100, 0);
        close_funding(&mut project.funding, at(5));

        let json = serde_json::to_value(&project).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["fullAmount"], 100);
        assert_eq!(json["investedAmount"], 100);
        assert_eq!(json["fullyInvested"], true);
        assert!(json["closedAt"].is_string());
        assert!(json.get("funding").is_none());

        let back: Target = serde_json::from_value(json).unwrap();
        assert_eq!(back, project);
    }
}
