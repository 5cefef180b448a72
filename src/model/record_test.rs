use chrono::TimeZone;
use chrono::Utc;

use super::*;

fn crypto(
    name: &str,
    votes: i32,
    price_usd: f64,
) -> CryptoCurrency {
    let mut c = CryptoCurrency::new(CryptoFields {
        name: name.to_string(),
        asset_id: name[..2].to_uppercase(),
        price_usd,
    });
    c.votes = votes;
    c
}

#[test]
fn test_new_record_starts_with_zero_votes() {
    let c = crypto("Bitcoin", 0, 1.0);
    assert_eq!(c.votes, 0);
    assert_eq!(c.created_at, c.updated_at);
}

#[test]
fn test_to_proto_formats_timestamps() {
    let mut c = crypto("Bitcoin", 3, 27000.5);
    c.created_at = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
    c.updated_at = Utc.timestamp_millis_opt(1685620800123).unwrap();

    let p = c.to_proto();
    assert_eq!(p.id, c.id.to_hex());
    assert_eq!(p.votes, 3);
    assert_eq!(p.created_at, "2023-06-01T12:00:00.000Z");
    assert_eq!(p.updated_at, "2023-06-01T12:00:00.123Z");
}

#[test]
fn test_sort_field_falls_back_to_name() {
    assert_eq!(SortField::from_field("votes"), SortField::Votes);
    assert_eq!(SortField::from_field("price_usd"), SortField::PriceUsd);
    assert_eq!(SortField::from_field("created_at"), SortField::Name);
}

#[test]
fn test_sort_params_orders_by_field_and_direction() {
    let mut records = vec![crypto("Cardano", 5, 0.3), crypto("Bitcoin", 1, 27000.0), crypto("Ethereum", 9, 1800.0)];

    SortParams::new(SortField::Votes, false).sort(&mut records);
    let votes: Vec<i32> = records.iter().map(|c| c.votes).collect();
    assert_eq!(votes, vec![9, 5, 1]);

    SortParams::new(SortField::PriceUsd, true).sort(&mut records);
    let names: Vec<&str> = records.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Cardano", "Ethereum", "Bitcoin"]);

    SortParams::default().sort(&mut records);
    let names: Vec<&str> = records.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Bitcoin", "Cardano", "Ethereum"]);
}

#[test]
fn test_vote_direction_delta() {
    assert_eq!(VoteDirection::Up.delta(), 1);
    assert_eq!(VoteDirection::Down.delta(), -1);
}
