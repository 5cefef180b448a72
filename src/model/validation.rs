//! Request validation and normalisation.
//!
//! Validation failures are reported immediately as `InvalidArgument` and
//! never reach the store.

use super::CryptoFields;
use super::CryptoId;
use super::SortField;
use super::SortParams;
use crate::ValidationError;

pub fn validate_id(id: &str) -> Result<CryptoId, ValidationError> {
    CryptoId::parse(id)
}

/// Name: more than 2 characters, ASCII letters and spaces only
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let only_letters = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ');
    if name.len() <= 2 || !only_letters {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Asset symbol: at least 2 characters
pub fn validate_asset_id(asset_id: &str) -> Result<(), ValidationError> {
    if asset_id.trim().len() < 2 {
        return Err(ValidationError::InvalidAssetId(asset_id.to_string()));
    }
    Ok(())
}

pub fn validate_price(price_usd: f64) -> Result<(), ValidationError> {
    if !price_usd.is_finite() || price_usd < 0.0 {
        return Err(ValidationError::InvalidPrice(format!("{}", price_usd)));
    }
    Ok(())
}

/// Validates the raw sort field and resolves it. Well-formed but unknown
/// fields sort by name.
pub fn validate_sort(
    field: &str,
    ascending: bool,
) -> Result<SortParams, ValidationError> {
    if field.len() <= 3 {
        return Err(ValidationError::InvalidSortField(field.to_string()));
    }
    Ok(SortParams::new(SortField::from_field(field), ascending))
}

/// Validates and normalises descriptive fields: the name is title-cased
/// word by word and the asset symbol upper-cased.
pub fn normalize_fields(
    name: &str,
    asset_id: &str,
    price_usd: f64,
) -> Result<CryptoFields, ValidationError> {
    validate_name(name)?;
    validate_asset_id(asset_id)?;
    validate_price(price_usd)?;

    Ok(CryptoFields {
        name: title_case(name),
        asset_id: asset_id.trim().to_uppercase(),
        price_usd,
    })
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
