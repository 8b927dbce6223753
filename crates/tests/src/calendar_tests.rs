//! Business-day calendar tests.

use pretty_assertions::assert_eq;

use server::engine::calendar::{is_weekend, BusinessCalendar};

use crate::common::{date, holiday};

#[test]
fn saturday_is_weekend() {
    assert!(is_weekend(date(2026, 1, 3)));
    assert!(is_weekend(date(2026, 1, 4)));
}

#[test]
fn monday_is_not_weekend() {
    assert!(!is_weekend(date(2026, 1, 5)));
}

#[test]
fn empty_calendar_counts_only_weekends() {
    let cal = BusinessCalendar::empty();
    assert!(cal.is_business_day(date(2026, 1, 5)));
    assert!(!cal.is_business_day(date(2026, 1, 3)));
}

#[test]
fn holiday_is_not_a_business_day() {
    let cal = BusinessCalendar::new(&[holiday(2026, 1, 5, true)]);
    assert!(!cal.is_business_day(date(2026, 1, 5)));
}

#[test]
fn commemorative_holiday_does_not_count() {
    // considera_para_slas = false entries are display-only
    let cal = BusinessCalendar::new(&[holiday(2026, 1, 5, false)]);
    assert!(cal.is_business_day(date(2026, 1, 5)));
}

#[test]
fn next_business_day_on_weekday_unchanged() {
    let cal = BusinessCalendar::empty();
    assert_eq!(cal.next_business_day(date(2026, 1, 7)), date(2026, 1, 7));
}

#[test]
fn next_business_day_on_saturday_goes_to_monday() {
    let cal = BusinessCalendar::empty();
    assert_eq!(cal.next_business_day(date(2026, 1, 3)), date(2026, 1, 5));
}

#[test]
fn next_business_day_skips_monday_holiday() {
    let cal = BusinessCalendar::new(&[holiday(2026, 1, 5, true)]);
    assert_eq!(cal.next_business_day(date(2026, 1, 3)), date(2026, 1, 6));
}

#[test]
fn add_zero_days_on_business_day_is_identity() {
    let cal = BusinessCalendar::empty();
    assert_eq!(cal.add_business_days(date(2026, 1, 5), 0), date(2026, 1, 5));
}

#[test]
fn add_zero_days_on_weekend_advances() {
    let cal = BusinessCalendar::empty();
    assert_eq!(cal.add_business_days(date(2026, 1, 3), 0), date(2026, 1, 5));
}

#[test]
fn add_five_days_skips_weekend() {
    let cal = BusinessCalendar::empty();
    // Mon Jan 5 + 5 business days = Mon Jan 12
    assert_eq!(cal.add_business_days(date(2026, 1, 5), 5), date(2026, 1, 12));
}

#[test]
fn add_days_skips_holiday_landing() {
    // Mon Jan 12 is a holiday, so the 5th business day moves to Tue Jan 13
    let cal = BusinessCalendar::new(&[holiday(2026, 1, 12, true)]);
    assert_eq!(cal.add_business_days(date(2026, 1, 5), 5), date(2026, 1, 13));
}

#[test]
fn add_business_days_lands_strictly_after_on_business_days() {
    let cal = BusinessCalendar::new(&[holiday(2026, 1, 12, true)]);
    for start in [date(2026, 1, 5), date(2026, 1, 9), date(2026, 1, 10)] {
        for n in 1..=10 {
            let result = cal.add_business_days(start, n);
            assert!(result > start, "{start} + {n}");
            assert!(cal.is_business_day(result), "{start} + {n} -> {result}");
        }
    }
}

#[test]
fn business_days_between_is_half_open() {
    let cal = BusinessCalendar::empty();
    // (Fri Jan 9, Mon Jan 12] contains only Monday
    assert_eq!(cal.business_days_between(date(2026, 1, 9), date(2026, 1, 12)), 1);
    assert_eq!(cal.business_days_between(date(2026, 1, 5), date(2026, 1, 5)), 0);
    assert_eq!(cal.business_days_between(date(2026, 1, 5), date(2026, 1, 9)), 4);
}

#[test]
fn business_days_between_is_signed() {
    let cal = BusinessCalendar::empty();
    assert_eq!(
        cal.business_days_between(date(2026, 1, 12), date(2026, 1, 9)),
        -1
    );
}
