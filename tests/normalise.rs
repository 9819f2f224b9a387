use pos_listmonk_sync::contract::{Address, Customer};
use pos_listmonk_sync::normalise::{
    clean_email, clean_phone, full_name, last_visit_date, most_recent_date, NormalisedAttributes,
};

#[test]
fn zero_epoch_returns_empty_string() {
    assert_eq!(last_visit_date(0), "");
}

#[test]
fn epoch_converts_to_eastern_time_date() {
    // January 1, 2022 00:00:00 UTC is still Dec 31, 2021 in Eastern time.
    assert_eq!(last_visit_date(1_640_995_200_000), "2021-12-31");
    // January 1, 2023 00:00:00 UTC likewise.
    assert_eq!(last_visit_date(1_672_531_200_000), "2022-12-31");
}

#[test]
fn epoch_mid_day_stays_on_same_calendar_day() {
    // July 1, 2022 16:00:00 UTC is noon EDT, same calendar day.
    assert_eq!(last_visit_date(1_656_691_200_000), "2022-07-01");
}

#[test]
fn nonzero_epoch_is_well_formed_date() {
    for millis in [1i64, 86_400_000, 1_700_000_000_123] {
        let date = last_visit_date(millis);
        assert_eq!(date.len(), 10, "unexpected shape: {date}");
        assert!(chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());
    }
}

#[test]
fn most_recent_date_picks_later_date() {
    assert_eq!(
        most_recent_date("2023-12-31", "2023-01-01").unwrap(),
        "2023-12-31"
    );
    assert_eq!(
        most_recent_date("2023-01-01", "2023-12-31").unwrap(),
        "2023-12-31"
    );
}

#[test]
fn most_recent_date_equal_dates_return_second_argument() {
    assert_eq!(
        most_recent_date("2023-06-15", "2023-06-15").unwrap(),
        "2023-06-15"
    );
}

#[test]
fn most_recent_date_rejects_malformed_input() {
    let err = most_recent_date("invalid-date", "2023-01-01").unwrap_err();
    assert!(err.to_string().contains("invalid-date"), "got: {err}");

    let err = most_recent_date("2023-01-01", "not-a-date").unwrap_err();
    assert!(err.to_string().contains("not-a-date"), "got: {err}");
}

#[test]
fn phone_strips_formatting_characters() {
    assert_eq!(clean_phone("(555) 123-4567"), "5551234567");
}

#[test]
fn phone_keeps_last_ten_digits() {
    assert_eq!(clean_phone("15551234567890"), "1234567890");
    assert_eq!(clean_phone("+1 (555) 123-4567"), "5551234567");
}

#[test]
fn phone_short_input_passes_through() {
    assert_eq!(clean_phone("555-1234"), "5551234");
    assert_eq!(clean_phone(""), "");
    assert_eq!(clean_phone("no digits here"), "");
}

#[test]
fn email_removes_spaces_and_commas() {
    assert_eq!(clean_email(" jo hn,@ example.com "), "john@example.com");
}

#[test]
fn email_cleaning_is_idempotent() {
    for raw in ["a b,c@d.com", "clean@example.com", "", " , ", ",,  ,"] {
        let once = clean_email(raw);
        assert_eq!(clean_email(&once), once);
    }
}

#[test]
fn name_concatenates_and_trims() {
    assert_eq!(full_name("John", "Doe"), "John Doe");
    assert_eq!(full_name("John", ""), "John");
    assert_eq!(full_name("", "Doe"), "Doe");
    assert_eq!(full_name("", ""), "");
}

#[test]
fn attributes_derive_from_first_phone_and_first_address() {
    let customer = Customer {
        phone_numbers: vec!["(555) 123-4567".into(), "999".into()],
        last_visit_date: 1_640_995_200_000,
        addresses: vec![
            Address {
                zip_code: "12345".into(),
                ..Default::default()
            },
            Address {
                zip_code: "99999".into(),
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    let attrs = NormalisedAttributes::from_customer(&customer);
    assert_eq!(attrs.phone, "5551234567");
    assert_eq!(attrs.zip_code, "12345");
    assert_eq!(attrs.last_visit, "2021-12-31");
}

#[test]
fn attributes_default_empty_without_phone_or_address() {
    let customer = Customer::default();
    let attrs = NormalisedAttributes::from_customer(&customer);
    assert_eq!(attrs.phone, "");
    assert_eq!(attrs.zip_code, "");
    assert_eq!(attrs.last_visit, "");

    let attribs = attrs.to_attribs();
    assert_eq!(attribs["lastVisit"], "");
    assert_eq!(attribs["zipCode"], "");
    assert_eq!(attribs["phone"], "");
}
