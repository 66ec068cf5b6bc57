use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::{ValidateEmail, ValidateUrl};

use crate::errors::FieldErrors;
use crate::models::{CreateListingRequest, NewProvider, Provider};

/// Which detail-payload shape a category expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Restaurant,
    Doctor,
    Hotel,
    Generic,
}

impl CategoryKind {
    /// Select the detail variant from a category slug.
    pub fn from_slug(slug: &str) -> Self {
        let slug = slug.to_ascii_lowercase();
        if slug.contains("restaurant") {
            CategoryKind::Restaurant
        } else if slug.contains("doctor") || slug.contains("clinic") {
            CategoryKind::Doctor
        } else if slug.contains("hotel") {
            CategoryKind::Hotel
        } else {
            CategoryKind::Generic
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum VegNonVeg {
    #[serde(rename = "Veg")]
    Veg,
    #[serde(rename = "Non-Veg", alias = "NonVeg")]
    NonVeg,
    #[serde(rename = "Both")]
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantDetails {
    pub cuisines: Vec<String>,
    pub veg_non_veg: VegNonVeg,
    pub avg_cost: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorDetails {
    pub specialization: String,
    #[serde(default)]
    pub experience_years: Option<i32>,
    #[serde(default)]
    pub consultation_fee: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelDetails {
    pub star_rating: i32,
    pub check_in: String,
    pub check_out: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenericDetails {
    #[serde(default)]
    pub services: Vec<String>,
}

/// Detail payload after variant selection and validation.
#[derive(Debug, Clone)]
pub enum CategoryDetails {
    Restaurant(RestaurantDetails),
    Doctor(DoctorDetails),
    Hotel(HotelDetails),
    Generic(GenericDetails),
}

impl CategoryDetails {
    /// Normalized JSON shape persisted in the `details` column.
    pub fn to_value(&self) -> Value {
        match self {
            CategoryDetails::Restaurant(d) => serde_json::to_value(d),
            CategoryDetails::Doctor(d) => serde_json::to_value(d),
            CategoryDetails::Hotel(d) => serde_json::to_value(d),
            CategoryDetails::Generic(d) => serde_json::to_value(d),
        }
        .unwrap_or(Value::Null)
    }
}

/// A listing submission that passed validation, with fields trimmed and the
/// detail payload resolved to its category variant.
#[derive(Debug, Clone)]
pub struct ValidatedListing {
    pub business_name: String,
    pub description: String,
    pub city: String,
    pub area: String,
    pub address: String,
    pub pincode: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub details: CategoryDetails,
}

impl ValidatedListing {
    /// Stamp the insertable row: fresh id and timestamps, unverified,
    /// unrated, active.
    pub fn into_new_provider(self, user_id: Uuid, category_id: Uuid, slug: String) -> NewProvider {
        let now = Utc::now();
        NewProvider {
            id: Uuid::new_v4(),
            user_id,
            category_id,
            slug,
            business_name: self.business_name,
            description: self.description,
            city: self.city,
            area: self.area,
            address: self.address,
            pincode: self.pincode,
            phone: self.phone,
            email: self.email,
            website: self.website,
            details: self.details.to_value(),
            is_verified: false,
            rating: 0.0,
            review_count: 0,
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy the normalized fields onto a stored row for the edit path. The
    /// owning user, slug, verification flag and rating aggregates are
    /// untouched.
    pub fn apply_to(self, existing: &mut Provider) {
        existing.details = self.details.to_value();
        existing.business_name = self.business_name;
        existing.description = self.description;
        existing.city = self.city;
        existing.area = self.area;
        existing.address = self.address;
        existing.pincode = self.pincode;
        existing.phone = self.phone;
        existing.email = self.email;
        existing.website = self.website;
        existing.updated_at = Utc::now();
    }
}

/// Validate a listing submission against the flat field rules and the
/// category-specific detail shape.
///
/// Returns the normalized submission or a field -> messages map. Malformed
/// user input never panics; the map is meant for inline form re-display.
pub fn validate_listing(
    req: &CreateListingRequest,
    kind: CategoryKind,
) -> Result<ValidatedListing, FieldErrors> {
    let mut errors = FieldErrors::new();

    let business_name = req.business_name.trim();
    if business_name.chars().count() < 3 {
        push(&mut errors, "business_name", "Business name must be at least 3 characters");
    }

    let description = req.description.trim();
    if description.chars().count() < 10 {
        push(&mut errors, "description", "Description must be at least 10 characters");
    }

    let city = req.city.trim();
    if city.is_empty() {
        push(&mut errors, "city", "City is required");
    }
    let area = req.area.trim();
    if area.is_empty() {
        push(&mut errors, "area", "Area is required");
    }
    let address = req.address.trim();
    if address.is_empty() {
        push(&mut errors, "address", "Address is required");
    }

    let pincode = req.pincode.as_deref().map(str::trim).filter(|p| !p.is_empty());
    if let Some(pin) = pincode {
        if pin.len() != 6 || !pin.chars().all(|c| c.is_ascii_digit()) {
            push(&mut errors, "pincode", "Pincode must be a 6-digit number");
        }
    }

    if !is_valid_phone(&req.phone) {
        push(&mut errors, "phone", "Enter a valid phone number with at least 10 digits");
    }

    let email = req.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    if let Some(value) = email {
        if !value.validate_email() {
            push(&mut errors, "email", "Enter a valid email address");
        }
    }

    let website = req.website.as_deref().map(str::trim).filter(|w| !w.is_empty());
    if let Some(value) = website {
        if !value.validate_url() {
            push(&mut errors, "website", "Enter a valid URL");
        }
    }

    let details = validate_details(&req.details, kind, &mut errors);

    match details {
        Some(details) if errors.is_empty() => Ok(ValidatedListing {
            business_name: business_name.to_string(),
            description: description.to_string(),
            city: city.to_string(),
            area: area.to_string(),
            address: address.to_string(),
            pincode: pincode.map(str::to_string),
            phone: req.phone.trim().to_string(),
            email: email.map(str::to_string),
            website: website.map(str::to_string),
            details,
        }),
        _ => Err(errors),
    }
}

/// Loose phone rule: digits plus common separators, at least 10 digits total.
fn is_valid_phone(raw: &str) -> bool {
    let trimmed = raw.trim();
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    let allowed = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
    digits >= 10 && allowed
}

fn validate_details(
    raw: &Value,
    kind: CategoryKind,
    errors: &mut FieldErrors,
) -> Option<CategoryDetails> {
    match kind {
        CategoryKind::Restaurant => {
            let details: RestaurantDetails = deserialize_details(raw, errors)?;
            if details.cuisines.iter().all(|c| c.trim().is_empty()) {
                push(errors, "details.cuisines", "Select at least one cuisine");
            }
            if details.avg_cost.trim().is_empty() {
                push(errors, "details.avg_cost", "Average cost is required");
            }
            Some(CategoryDetails::Restaurant(details))
        }
        CategoryKind::Doctor => {
            let details: DoctorDetails = deserialize_details(raw, errors)?;
            if details.specialization.trim().is_empty() {
                push(errors, "details.specialization", "Specialization is required");
            }
            if let Some(years) = details.experience_years {
                if !(0..=80).contains(&years) {
                    push(errors, "details.experience_years", "Experience must be between 0 and 80 years");
                }
            }
            if let Some(fee) = details.consultation_fee {
                if fee < 0 {
                    push(errors, "details.consultation_fee", "Consultation fee cannot be negative");
                }
            }
            Some(CategoryDetails::Doctor(details))
        }
        CategoryKind::Hotel => {
            let details: HotelDetails = deserialize_details(raw, errors)?;
            if !(1..=7).contains(&details.star_rating) {
                push(errors, "details.star_rating", "Star rating must be between 1 and 7");
            }
            if details.check_in.trim().is_empty() {
                push(errors, "details.check_in", "Check-in time is required");
            }
            if details.check_out.trim().is_empty() {
                push(errors, "details.check_out", "Check-out time is required");
            }
            Some(CategoryDetails::Hotel(details))
        }
        CategoryKind::Generic => {
            // Freeform services list; an absent payload is fine.
            let details: GenericDetails = if raw.is_null() {
                GenericDetails::default()
            } else {
                deserialize_details(raw, errors)?
            };
            Some(CategoryDetails::Generic(details))
        }
    }
}

fn deserialize_details<T: serde::de::DeserializeOwned>(
    raw: &Value,
    errors: &mut FieldErrors,
) -> Option<T> {
    match serde_json::from_value(raw.clone()) {
        Ok(details) => Some(details),
        Err(err) => {
            push(
                errors,
                "details",
                &format!("Details do not match the category: {err}"),
            );
            None
        }
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn base_request() -> CreateListingRequest {
        CreateListingRequest {
            business_name: "Joe's Pizza".into(),
            description: "Best pizza in town since 1990".into(),
            city: "Mumbai".into(),
            area: "Bandra West".into(),
            address: "12 Main St".into(),
            pincode: None,
            phone: "9876543210".into(),
            email: None,
            website: None,
            category_id: Uuid::new_v4(),
            details: json!({
                "cuisines": ["Italian"],
                "veg_non_veg": "Both",
                "avg_cost": "500 for two"
            }),
            images: Vec::new(),
            services: Vec::new(),
        }
    }

    #[test]
    fn accepts_a_complete_restaurant_submission() {
        let validated = validate_listing(&base_request(), CategoryKind::Restaurant).unwrap();
        assert_eq!(validated.business_name, "Joe's Pizza");
        match validated.details {
            CategoryDetails::Restaurant(d) => {
                assert_eq!(d.cuisines, vec!["Italian"]);
                assert_eq!(d.veg_non_veg, VegNonVeg::Both);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn short_business_name_is_keyed_by_field() {
        let mut req = base_request();
        req.business_name = "Jo".into();
        let errors = validate_listing(&req, CategoryKind::Restaurant).unwrap_err();
        assert!(!errors["business_name"].is_empty());
    }

    #[test]
    fn short_description_rejected() {
        let mut req = base_request();
        req.description = "too short".into();
        assert!(validate_listing(&req, CategoryKind::Restaurant)
            .unwrap_err()
            .contains_key("description"));
    }

    #[test]
    fn pincode_must_be_six_digits() {
        let mut req = base_request();
        req.pincode = Some("12345".into());
        assert!(validate_listing(&req, CategoryKind::Restaurant)
            .unwrap_err()
            .contains_key("pincode"));

        req.pincode = Some("400050".into());
        assert!(validate_listing(&req, CategoryKind::Restaurant).is_ok());
    }

    #[test]
    fn phone_allows_separators_but_needs_ten_digits() {
        assert!(is_valid_phone("+91 98765-43210"));
        assert!(is_valid_phone("(022) 1234 5678 90"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("98765x43210"));
    }

    #[test]
    fn invalid_optional_email_and_website_are_reported() {
        let mut req = base_request();
        req.email = Some("not-an-email".into());
        req.website = Some("not a url".into());
        let errors = validate_listing(&req, CategoryKind::Restaurant).unwrap_err();
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("website"));
    }

    #[test]
    fn empty_optional_fields_are_skipped() {
        let mut req = base_request();
        req.email = Some("   ".into());
        req.pincode = Some("".into());
        let validated = validate_listing(&req, CategoryKind::Restaurant).unwrap();
        assert_eq!(validated.email, None);
        assert_eq!(validated.pincode, None);
    }

    #[test]
    fn doctor_details_validate_ranges() {
        let mut req = base_request();
        req.details = json!({
            "specialization": "Cardiology",
            "experience_years": 90
        });
        let errors = validate_listing(&req, CategoryKind::Doctor).unwrap_err();
        assert!(errors.contains_key("details.experience_years"));

        req.details = json!({ "specialization": "Cardiology", "experience_years": 12 });
        assert!(validate_listing(&req, CategoryKind::Doctor).is_ok());
    }

    #[test]
    fn hotel_star_rating_bounds() {
        let mut req = base_request();
        req.details = json!({ "star_rating": 8, "check_in": "14:00", "check_out": "11:00" });
        assert!(validate_listing(&req, CategoryKind::Hotel)
            .unwrap_err()
            .contains_key("details.star_rating"));

        req.details = json!({ "star_rating": 3, "check_in": "14:00", "check_out": "11:00" });
        assert!(validate_listing(&req, CategoryKind::Hotel).is_ok());
    }

    #[test]
    fn generic_category_accepts_missing_details() {
        let mut req = base_request();
        req.details = Value::Null;
        let validated = validate_listing(&req, CategoryKind::Generic).unwrap();
        match validated.details {
            CategoryDetails::Generic(d) => assert!(d.services.is_empty()),
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn mismatched_details_shape_is_a_details_error() {
        let mut req = base_request();
        req.details = json!({ "star_rating": "five" });
        let errors = validate_listing(&req, CategoryKind::Hotel).unwrap_err();
        assert!(errors.contains_key("details"));
    }

    fn existing_provider() -> Provider {
        Provider {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            business_name: "Old Name".into(),
            slug: "old-name-ab12c".into(),
            description: "Old description text".into(),
            city: "Pune".into(),
            area: "Kothrud".into(),
            address: "1 Old St".into(),
            pincode: None,
            phone: "0123456789".into(),
            email: Some("owner@example.com".into()),
            website: None,
            details: Value::Null,
            is_verified: true,
            rating: 4.5,
            review_count: 12,
            status: "active".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn applying_an_edit_stores_normalized_fields() {
        let mut req = base_request();
        req.email = Some("   ".into());
        req.phone = " 9876543210 ".into();
        let validated = validate_listing(&req, CategoryKind::Restaurant).unwrap();

        let mut provider = existing_provider();
        validated.apply_to(&mut provider);

        assert_eq!(provider.business_name, "Joe's Pizza");
        assert_eq!(provider.email, None);
        assert_eq!(provider.phone, "9876543210");
    }

    #[test]
    fn applying_an_edit_leaves_ownership_and_aggregates_alone() {
        let validated = validate_listing(&base_request(), CategoryKind::Restaurant).unwrap();

        let mut provider = existing_provider();
        let user_id = provider.user_id;
        let slug = provider.slug.clone();
        validated.apply_to(&mut provider);

        assert_eq!(provider.user_id, user_id);
        assert_eq!(provider.slug, slug);
        assert!(provider.is_verified);
        assert_eq!(provider.rating, 4.5);
        assert_eq!(provider.review_count, 12);
    }

    #[test]
    fn new_providers_start_unverified_and_unrated() {
        let validated = validate_listing(&base_request(), CategoryKind::Restaurant).unwrap();
        let provider =
            validated.into_new_provider(Uuid::new_v4(), Uuid::new_v4(), "joes-pizza-a1b2c".into());
        assert!(!provider.is_verified);
        assert_eq!(provider.rating, 0.0);
        assert_eq!(provider.review_count, 0);
        assert_eq!(provider.status, "active");
    }

    #[test]
    fn category_kind_selection_from_slug() {
        assert_eq!(CategoryKind::from_slug("restaurants"), CategoryKind::Restaurant);
        assert_eq!(CategoryKind::from_slug("doctors-clinics"), CategoryKind::Doctor);
        assert_eq!(CategoryKind::from_slug("hotels"), CategoryKind::Hotel);
        assert_eq!(CategoryKind::from_slug("electricians"), CategoryKind::Generic);
    }
}
