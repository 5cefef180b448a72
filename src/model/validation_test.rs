use super::*;
use crate::ValidationError;

#[test]
fn test_validate_name() {
    assert!(validate_name("Bitcoin Cash").is_ok());
    assert!(matches!(validate_name(""), Err(ValidationError::InvalidName(_))));
    assert!(matches!(validate_name("Bt"), Err(ValidationError::InvalidName(_))));
    assert!(matches!(validate_name("Bit2coin"), Err(ValidationError::InvalidName(_))));
}

#[test]
fn test_validate_asset_id() {
    assert!(validate_asset_id("BTC").is_ok());
    assert!(validate_asset_id("bt").is_ok());
    assert!(validate_asset_id("B").is_err());
    assert!(validate_asset_id("").is_err());
}

#[test]
fn test_validate_price() {
    assert!(validate_price(0.0).is_ok());
    assert!(validate_price(27000.25).is_ok());
    assert!(validate_price(-0.01).is_err());
    assert!(validate_price(f64::NAN).is_err());
    assert!(validate_price(f64::INFINITY).is_err());
}

#[test]
fn test_validate_sort() {
    assert_eq!(
        validate_sort("votes", false).unwrap(),
        SortParams::new(SortField::Votes, false)
    );
    assert_eq!(
        validate_sort("unknown", true).unwrap(),
        SortParams::new(SortField::Name, true)
    );
    assert!(matches!(validate_sort("abc", true), Err(ValidationError::InvalidSortField(_))));
}

#[test]
fn test_normalize_fields_title_cases_name_and_upper_cases_asset() {
    let fields = normalize_fields("bitcoin cASH", "bch", 250.0).unwrap();
    assert_eq!(fields.name, "Bitcoin Cash");
    assert_eq!(fields.asset_id, "BCH");
    assert_eq!(fields.price_usd, 250.0);
}

#[test]
fn test_normalize_fields_reports_first_invalid_field() {
    assert!(matches!(
        normalize_fields("ok name", "x", -1.0),
        Err(ValidationError::InvalidAssetId(_))
    ));
}
