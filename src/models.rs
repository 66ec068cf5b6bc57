use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// ENUMS
// ============================================================================

/// Enquiry lifecycle status (also a Postgres enum)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "enquiry_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnquiryStatus {
    New,
    Contacted,
    Closed,
}

/// Interaction event kinds recorded against a provider (also a Postgres enum)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "analytics_event_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsEventType {
    View,
    PhoneClick,
    WhatsappClick,
    EnquiryClick,
}

/// Booking payment lifecycle (also a Postgres enum)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Paid,
    Cancelled,
}

// ============================================================================
// PROVIDERS (Business Listings)
// ============================================================================

/// Business listing persisted in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Provider {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub business_name: String,
    pub slug: String,
    pub description: String,
    pub city: String,
    pub area: String,
    pub address: String,
    pub pincode: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub details: Value,
    pub is_verified: bool,
    pub rating: f64,
    pub review_count: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Helper struct used when inserting a new provider
#[derive(Debug, Clone)]
pub struct NewProvider {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub business_name: String,
    pub slug: String,
    pub description: String,
    pub city: String,
    pub area: String,
    pub address: String,
    pub pincode: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub details: Value,
    pub is_verified: bool,
    pub rating: f64,
    pub review_count: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Service category (read-only from the listing flow's perspective)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub display_order: i32,
}

/// Image attached to a provider listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProviderImage {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub url: String,
    pub is_primary: bool,
    pub display_order: i32,
}

/// Named service offered by a provider
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Service {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub name: String,
    pub price: Option<String>,
    pub display_order: i32,
}

// ============================================================================
// ENQUIRIES / REVIEWS / FAVORITES
// ============================================================================

/// Customer enquiry directed at a provider
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Enquiry {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub message: String,
    pub status: EnquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User review of a provider
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Saved-provider bookmark
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// BOOKINGS / FEEDBACK / ANALYTICS
// ============================================================================

/// Service booking with payment pass-through state
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub user_id: Uuid,
    pub service_name: String,
    pub amount: i64,
    pub currency: String,
    pub payment_order_id: Option<String>,
    pub payment_id: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Site feedback entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only interaction event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub event_type: AnalyticsEventType,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// REQUEST/RESPONSE DTOs
// ============================================================================

/// Success envelope; error responses are rendered by `errors::ApiError`
/// with the matching shape.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }
}

/// Image submitted alongside a new listing
#[derive(Debug, Clone, Deserialize)]
pub struct ImageInput {
    pub url: String,
}

/// Service submitted alongside a new listing
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    pub price: Option<String>,
}

/// Payload sent by owners to create a business listing.
///
/// Field rules live in `validation::validate_listing`, which returns a
/// per-field error map suitable for form re-display instead of the
/// aggregate message the derive macro produces.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListingRequest {
    pub business_name: String,
    pub description: String,
    pub city: String,
    pub area: String,
    pub address: String,
    pub pincode: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub category_id: Uuid,
    #[serde(default)]
    pub details: Value,
    #[serde(default)]
    pub images: Vec<ImageInput>,
    #[serde(default)]
    pub services: Vec<ServiceInput>,
}

/// Payload for editing an existing listing. The owning user, slug,
/// verification flag and rating aggregates are not editable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateListingRequest {
    pub business_name: String,
    pub description: String,
    pub city: String,
    pub area: String,
    pub address: String,
    pub pincode: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub details: Value,
}

/// Enquiry submission (open to unauthenticated visitors)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEnquiryRequest {
    #[validate(length(min = 2, max = 120))]
    pub customer_name: String,
    #[validate(length(min = 10, max = 20))]
    pub customer_phone: String,
    #[validate(email)]
    pub customer_email: Option<String>,
    #[validate(length(min = 5, max = 2000))]
    pub message: String,
}

/// Enquiry status transition, allowed only for the provider owner
#[derive(Debug, Deserialize)]
pub struct UpdateEnquiryStatusRequest {
    pub status: EnquiryStatus,
}

/// Review submission
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Booking submission; `amount` is in minor currency units
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(length(min = 2, max = 200))]
    pub service_name: String,
    #[validate(range(min = 100, max = 100_000_000))]
    pub amount: i64,
    pub currency: Option<String>,
}

/// Payment confirmation relayed by the client after checkout
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Site feedback submission
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    #[validate(length(max = 120))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 5, max = 4000))]
    pub message: String,
}

/// Interaction event reported by the client
#[derive(Debug, Deserialize)]
pub struct RecordEventRequest {
    pub event_type: AnalyticsEventType,
    pub metadata: Option<Value>,
}

// ============================================================================
// COMPOSITE RESPONSE TYPES
// ============================================================================

/// Provider joined with its category, services and images
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDetail {
    pub provider: Provider,
    pub category: Category,
    pub services: Vec<Service>,
    pub images: Vec<ProviderImage>,
}

/// Outcome of a favorite toggle
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteToggleResult {
    Favorited,
    Unfavorited,
}

/// Aggregated counts for a provider owner's dashboard
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStats {
    pub enquiries: i64,
    pub reviews: i64,
    pub favorites: i64,
    pub views: i64,
}
