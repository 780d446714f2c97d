//! Recognition categories
//!
//! Each category is one document or image class the cloud service can
//! recognize. The category table below fixes the endpoint, any extra form
//! fields, and the response parser for every class.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::error::RecognitionError;
use super::parsers;

/// Signature shared by every response parser
pub type ParseFn = fn(&Value) -> Result<String, RecognitionError>;

/// Document or image class selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    BankCard,
    Plant,
    Animal,
    Receipt,
    BusinessLicense,
    IdCard,
    LicensePlate,
    DrivingLicense,
    VehicleLicense,
    Car,
    Logo,
}

impl Category {
    /// All categories, in selector index order
    pub const ALL: [Category; 11] = [
        Category::BankCard,
        Category::Plant,
        Category::Animal,
        Category::Receipt,
        Category::BusinessLicense,
        Category::IdCard,
        Category::LicensePlate,
        Category::DrivingLicense,
        Category::VehicleLicense,
        Category::Car,
        Category::Logo,
    ];

    /// Numeric selector index
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Look up a category by numeric selector index
    pub fn from_index(index: usize) -> Option<Category> {
        Self::ALL.get(index).copied()
    }

    /// Kebab-case name used on the command line and in config files
    pub fn name(&self) -> &'static str {
        match self {
            Category::BankCard => "bank-card",
            Category::Plant => "plant",
            Category::Animal => "animal",
            Category::Receipt => "receipt",
            Category::BusinessLicense => "business-license",
            Category::IdCard => "id-card",
            Category::LicensePlate => "license-plate",
            Category::DrivingLicense => "driving-license",
            Category::VehicleLicense => "vehicle-license",
            Category::Car => "car",
            Category::Logo => "logo",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::BankCard => "Bank card",
            Category::Plant => "Plant",
            Category::Animal => "Animal",
            Category::Receipt => "Receipt",
            Category::BusinessLicense => "Business license",
            Category::IdCard => "ID card",
            Category::LicensePlate => "License plate",
            Category::DrivingLicense => "Driving license",
            Category::VehicleLicense => "Vehicle license",
            Category::Car => "Car",
            Category::Logo => "Logo",
        }
    }

    /// Endpoint path relative to the service base URL
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            Category::BankCard => "/rest/2.0/ocr/v1/bankcard",
            Category::Plant => "/rest/2.0/image-classify/v1/plant",
            Category::Animal => "/rest/2.0/image-classify/v1/animal",
            Category::Receipt => "/rest/2.0/ocr/v1/receipt",
            Category::BusinessLicense => "/rest/2.0/ocr/v1/business_license",
            Category::IdCard => "/rest/2.0/ocr/v1/idcard",
            Category::LicensePlate => "/rest/2.0/ocr/v1/license_plate",
            Category::DrivingLicense => "/rest/2.0/ocr/v1/driving_license",
            Category::VehicleLicense => "/rest/2.0/ocr/v1/vehicle_license",
            Category::Car => "/rest/2.0/image-classify/v1/car",
            Category::Logo => "/rest/2.0/image-classify/v2/logo",
        }
    }

    /// Form fields sent alongside the image
    pub fn extra_form_fields(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            // Side with the photo; the service detects a reversed card on its own
            Category::IdCard => &[("id_card_side", "front")],
            _ => &[],
        }
    }

    /// Parser turning this category's response into display text
    pub fn parser(&self) -> ParseFn {
        match self {
            Category::BankCard => parsers::bank_card,
            Category::Plant => parsers::plant,
            Category::Animal => parsers::animal,
            Category::Receipt => parsers::receipt,
            Category::BusinessLicense => parsers::business_license,
            Category::IdCard => parsers::id_card,
            Category::LicensePlate => parsers::license_plate,
            Category::DrivingLicense => parsers::driving_license,
            Category::VehicleLicense => parsers::vehicle_license,
            Category::Car => parsers::car,
            Category::Logo => parsers::logo,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = RecognitionError;

    /// Accepts a kebab-case name (case-insensitive, `_` allowed) or an index
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(index) = trimmed.parse::<usize>() {
            return Category::from_index(index)
                .ok_or_else(|| RecognitionError::UnknownCategory(trimmed.to_string()));
        }

        let normalized = trimmed.to_ascii_lowercase().replace('_', "-");
        Category::ALL
            .into_iter()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| RecognitionError::UnknownCategory(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trips() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
            assert_eq!(Category::from_index(i), Some(*category));
        }
        assert_eq!(Category::from_index(11), None);
    }

    #[test]
    fn test_parse_by_name_and_index() {
        assert_eq!("bank-card".parse::<Category>().unwrap(), Category::BankCard);
        assert_eq!("ID_CARD".parse::<Category>().unwrap(), Category::IdCard);
        assert_eq!(" logo ".parse::<Category>().unwrap(), Category::Logo);
        assert_eq!("9".parse::<Category>().unwrap(), Category::Car);
    }

    #[test]
    fn test_parse_unknown_fails() {
        assert!(matches!(
            "11".parse::<Category>(),
            Err(RecognitionError::UnknownCategory(s)) if s == "11"
        ));
        assert!(matches!(
            "passport".parse::<Category>(),
            Err(RecognitionError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_only_id_card_sends_side() {
        assert_eq!(
            Category::IdCard.extra_form_fields(),
            &[("id_card_side", "front")]
        );
        assert!(Category::ALL
            .iter()
            .filter(|c| **c != Category::IdCard)
            .all(|c| c.extra_form_fields().is_empty()));
    }

    #[test]
    fn test_endpoints_are_distinct() {
        let mut paths: Vec<_> = Category::ALL.iter().map(|c| c.endpoint_path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), Category::ALL.len());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            category: Category,
        }

        let parsed: Wrapper = toml::from_str(r#"category = "driving-license""#).unwrap();
        assert_eq!(parsed.category, Category::DrivingLicense);
    }
}
