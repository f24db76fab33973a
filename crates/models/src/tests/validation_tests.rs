use chrono::NaiveTime;

use crate::{assignment, course, person, schedule_block, subject};
use crate::person::PersonKind;
use crate::schedule_block::Weekday;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn national_id_is_normalized() {
    assert_eq!(person::validate_national_id(" 4567890-lp ").unwrap(), "4567890-LP");
    assert!(person::validate_national_id("123").is_err());
    assert!(person::validate_national_id("12 345 67").is_err());
}

#[test]
fn email_rules() {
    assert_eq!(person::validate_email("Ana.Perez@School.edu.bo").unwrap(), "ana.perez@school.edu.bo");
    for bad in ["no-at-sign", "a@b", "@school.bo", "a@@b.com", "a b@c.com", "a@.com"] {
        assert!(person::validate_email(bad).is_err(), "{bad} should be rejected");
    }
}

#[test]
fn phone_allows_common_punctuation() {
    assert_eq!(person::validate_phone(Some("+591 (2) 245-6789")).unwrap().as_deref(), Some("+591 (2) 245-6789"));
    assert!(person::validate_phone(Some("call me")).is_err());
    assert_eq!(person::validate_phone(Some("  ")).unwrap(), None);
}

#[test]
fn person_kind_parsing() {
    assert_eq!("Teacher".parse::<PersonKind>().unwrap(), PersonKind::Teacher);
    assert_eq!(PersonKind::Support.as_str(), "support");
    assert!("janitor".parse::<PersonKind>().is_err());
}

#[test]
fn weekday_accepts_english_and_spanish() {
    assert_eq!("Monday".parse::<Weekday>().unwrap(), Weekday::Monday);
    assert_eq!("miércoles".parse::<Weekday>().unwrap(), Weekday::Wednesday);
    assert_eq!("sabado".parse::<Weekday>().unwrap(), Weekday::Saturday);
    assert!("someday".parse::<Weekday>().is_err());
    assert!(Weekday::Monday < Weekday::Friday);

    let d: Weekday = serde_json::from_str("\"viernes\"").unwrap();
    assert_eq!(d, Weekday::Friday);
    assert_eq!(serde_json::to_string(&d).unwrap(), "\"friday\"");
}

#[test]
fn time_range_must_be_increasing() {
    assert!(schedule_block::validate_time_range(t(8, 0), t(9, 30)).is_ok());
    assert!(schedule_block::validate_time_range(t(9, 0), t(9, 0)).is_err());
    assert!(schedule_block::validate_time_range(t(10, 0), t(9, 0)).is_err());
}

#[test]
fn time_range_rejects_seconds() {
    let half_past = NaiveTime::from_hms_opt(8, 0, 30).unwrap();
    assert!(schedule_block::validate_time_range(half_past, t(9, 0)).is_err());
    assert!(schedule_block::validate_time_range(t(8, 0), NaiveTime::from_hms_opt(9, 0, 1).unwrap()).is_err());
    assert!(schedule_block::validate_time_range(NaiveTime::from_hms_opt(8, 0, 0).unwrap(), t(9, 0)).is_ok());
}

#[test]
fn subject_code_and_course_section() {
    assert_eq!(subject::validate_code("mat-101").unwrap(), "MAT-101");
    assert!(subject::validate_code("m@t").is_err());
    assert_eq!(course::validate_section(Some("a")).unwrap().as_deref(), Some("A"));
}

#[test]
fn planned_hours_bounds() {
    assert_eq!(assignment::validate_planned_hours(Some(6)).unwrap(), Some(6));
    assert_eq!(assignment::validate_planned_hours(None).unwrap(), None);
    assert!(assignment::validate_planned_hours(Some(-1)).is_err());
    assert!(assignment::validate_planned_hours(Some(61)).is_err());
}
