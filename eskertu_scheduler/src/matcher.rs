use eskertu_models::{chrono::NaiveDate, tenant::Tenant};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NoticeKind {
    ThreeDayNotice,
    OneDayNotice,
}

impl NoticeKind {
    pub fn lead_days(self) -> i64 {
        match self {
            NoticeKind::ThreeDayNotice => 3,
            NoticeKind::OneDayNotice => 1,
        }
    }
}

/// A tenant whose due date matched one of the lead notices on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEvent {
    pub tenant: Tenant,
    pub kind: NoticeKind,
}

impl ReminderEvent {
    pub fn due_date(&self) -> NaiveDate {
        self.tenant.due_date
    }
}

/// Classifies `due` against `today`. Only exact whole-day distances of 3 and 1 match.
pub fn classify(today: NaiveDate, due: NaiveDate) -> Option<NoticeKind> {
    match due.signed_duration_since(today).num_days() {
        3 => Some(NoticeKind::ThreeDayNotice),
        1 => Some(NoticeKind::OneDayNotice),
        _ => None,
    }
}

pub fn match_tenants(today: NaiveDate, tenants: impl IntoIterator<Item = Tenant>) -> Vec<ReminderEvent> {
    tenants
        .into_iter()
        .filter_map(|tenant| {
            classify(today, tenant.due_date).map(|kind| ReminderEvent { tenant, kind })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use eskertu_models::chrono::Days;
    use proptest::prelude::*;
    use proptest_arbitrary_interop::arb;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tenant(id: i64, due_date: NaiveDate) -> Tenant {
        Tenant {
            id,
            name: format!("Tenant {id}"),
            apartment: format!("{id}A"),
            due_date,
        }
    }

    #[test]
    fn three_days_ahead_is_three_day_notice() {
        assert_eq!(
            classify(date(2024, 3, 7), date(2024, 3, 10)),
            Some(NoticeKind::ThreeDayNotice)
        );
    }

    #[test]
    fn one_day_ahead_is_one_day_notice() {
        assert_eq!(
            classify(date(2024, 3, 9), date(2024, 3, 10)),
            Some(NoticeKind::OneDayNotice)
        );
    }

    #[test]
    fn other_distances_do_not_match() {
        let due = date(2024, 3, 10);
        for today in [date(2024, 3, 8), date(2024, 3, 10), date(2024, 3, 6), date(2024, 3, 11)] {
            assert_eq!(classify(today, due), None, "today = {today}");
        }
    }

    #[test]
    fn matching_crosses_month_and_leap_day() {
        assert_eq!(
            classify(date(2024, 2, 27), date(2024, 3, 1)),
            Some(NoticeKind::ThreeDayNotice)
        );
        assert_eq!(
            classify(date(2024, 2, 29), date(2024, 3, 1)),
            Some(NoticeKind::OneDayNotice)
        );
        assert_eq!(
            classify(date(2024, 12, 31), date(2025, 1, 1)),
            Some(NoticeKind::OneDayNotice)
        );
    }

    #[test]
    fn match_tenants_keeps_only_matching_tenants() {
        let today = date(2024, 3, 7);
        let tenants = vec![
            tenant(1, date(2024, 3, 10)),
            tenant(2, date(2024, 3, 8)),
            tenant(3, date(2024, 3, 9)),
        ];

        let events = match_tenants(today, tenants);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tenant.id, 1);
        assert_eq!(events[0].kind, NoticeKind::ThreeDayNotice);
        assert_eq!(events[1].tenant.id, 2);
        assert_eq!(events[1].kind, NoticeKind::OneDayNotice);
    }

    proptest! {
        #[test]
        fn classification_partitions_all_pairs(today in arb::<NaiveDate>(), due in arb::<NaiveDate>()) {
            let distance = due.signed_duration_since(today).num_days();

            match classify(today, due) {
                Some(NoticeKind::ThreeDayNotice) => prop_assert_eq!(distance, 3),
                Some(NoticeKind::OneDayNotice) => prop_assert_eq!(distance, 1),
                None => prop_assert!(distance != 3 && distance != 1),
            }
        }

        #[test]
        fn lead_days_round_trip(today in arb::<NaiveDate>(), offset in 0u64..10) {
            if let Some(due) = today.checked_add_days(Days::new(offset)) {
                let kind = classify(today, due);
                prop_assert_eq!(kind.map(NoticeKind::lead_days), [1, 3].contains(&offset).then_some(offset as i64));
            }
        }
    }
}
