use campus_voice_api::{
    domain::{
        cluster::similarity::{CLUSTER_MATCH_THRESHOLD, keyword_overlap, meets_threshold},
        complaint::{
            entity::{ComplaintStatus, Severity},
            value_objects::ComplaintText,
        },
        shared::{pagination::PaginationRequest, urgency::Urgency},
        social::reaction::Reaction,
        user::value_objects::{Password, RollNumber},
    },
    infrastructure::security::abuse_detector::{ban_expiration, normalize, scan_local},
};
use chrono::{TimeZone, Utc};
use std::str::FromStr;

#[test]
fn roll_number_accepts_expected_format_and_uppercases() {
    let roll = RollNumber::new("22cs05".to_string()).expect("valid roll number");
    assert_eq!(roll.value, "22CS05");
    assert!(RollNumber::new("24EE12".to_string()).is_ok());
}

#[test]
fn roll_number_rejects_wrong_year_branch_or_length() {
    assert!(RollNumber::new("21CS05".to_string()).is_err());
    assert!(RollNumber::new("22XX05".to_string()).is_err());
    assert!(RollNumber::new("22CS5".to_string()).is_err());
}

#[test]
fn password_requires_six_characters() {
    assert!(Password::new("12345".to_string()).is_err());
    assert!(Password::new("123456".to_string()).is_ok());
}

#[test]
fn complaint_text_enforces_length_bounds() {
    assert!(ComplaintText::new(String::new()).is_err());
    assert!(ComplaintText::new("x".repeat(5000)).is_ok());
    assert!(ComplaintText::new("x".repeat(5001)).is_err());
}

#[test]
fn pagination_defaults_are_safe_and_stable() {
    let p = PaginationRequest::default();
    assert_eq!(p.limit, 50);
    assert_eq!(p.offset, 0);

    let clamped = PaginationRequest {
        limit: 10_000,
        offset: -4,
    }
    .sanitized();
    assert_eq!(clamped.limit, 200);
    assert_eq!(clamped.offset, 0);
}

#[test]
fn urgency_tiers_follow_thresholds() {
    assert_eq!(Urgency::for_count(0), Urgency::Normal);
    assert_eq!(Urgency::for_count(9), Urgency::Normal);
    assert_eq!(Urgency::for_count(10), Urgency::Urgent);
    assert_eq!(Urgency::for_count(25), Urgency::Critical);
    assert_eq!(Urgency::for_count(50), Urgency::TopPriority);
    assert_eq!(Urgency::for_count(100), Urgency::Emergency);
}

#[test]
fn keyword_overlap_is_case_insensitive_jaccard() {
    let overlap = keyword_overlap(&["WiFi", "library"], &["wifi", "hostel"]);
    assert!((overlap - 1.0 / 3.0).abs() < 1e-9);
    assert!(meets_threshold(overlap));
    assert!(!meets_threshold(CLUSTER_MATCH_THRESHOLD - 0.01));
    assert_eq!(keyword_overlap::<&str, &str>(&[], &[]), 0.0);
}

#[test]
fn status_and_severity_parse_from_wire_names() {
    assert_eq!(
        ComplaintStatus::from_str("solved").ok(),
        Some(ComplaintStatus::Solved)
    );
    assert!(ComplaintStatus::Solved.is_solved());
    assert_eq!(Severity::from_str("critical").ok(), Some(Severity::Critical));
    assert!(Reaction::from_str("🙂").is_err());
}

#[test]
fn normalization_undoes_leetspeak() {
    assert_eq!(normalize("B1TCH"), "bitch");
    let (hits, _) = scan_local(&normalize("this fuck"));
    assert_eq!(hits, vec!["fuck".to_string()]);
}

#[test]
fn ban_expiration_adds_hours() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(
        ban_expiration(now, 48).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()
    );
    assert!(ban_expiration(now, 10_000_000_000).is_err());
}
