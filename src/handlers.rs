use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::analytics::EngagementRecorder;
use crate::auth::{ensure_owner, require_actor, Actor};
use crate::clients::email::EmailClient;
use crate::clients::payments::PaymentClient;
use crate::database::Database;
use crate::errors::{ApiError, FieldErrors};
use crate::models::{
    AnalyticsEventType, ApiResponse, CreateBookingRequest, CreateEnquiryRequest,
    CreateFeedbackRequest, CreateListingRequest, CreateReviewRequest, Provider, ProviderDetail,
    RecordEventRequest, UpdateEnquiryStatusRequest, UpdateListingRequest, VerifyPaymentRequest,
};
use crate::slug::generate_slug;
use crate::validation::{validate_listing, CategoryKind};

/// Convert derive-macro validation output into the field -> messages map the
/// API contract uses everywhere.
fn field_errors_from(errors: validator::ValidationErrors) -> ApiError {
    let mut map = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = map.entry(field.to_string()).or_default();
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("invalid value ({})", error.code));
            messages.push(message);
        }
    }
    ApiError::Validation(map)
}

/// Load a provider for a mutating operation. Absent and not-owned both
/// surface as the same generic denial so callers cannot probe for existence.
async fn load_owned_provider(
    db: &Database,
    actor: Actor,
    provider_id: Uuid,
) -> Result<Provider, ApiError> {
    let provider = db
        .get_provider(provider_id)
        .await?
        .ok_or(ApiError::Forbidden)?;
    ensure_owner(actor, provider.user_id)?;
    Ok(provider)
}

// ============================================================================
// HEALTH CHECK
// ============================================================================

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "hyperlocal-listings-service",
        "timestamp": Utc::now()
    }))
}

// ============================================================================
// CATEGORIES
// ============================================================================

#[get("/categories")]
pub async fn list_categories(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    let categories = db.list_categories().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(categories)))
}

// ============================================================================
// PROVIDERS (Business Listings)
// ============================================================================

#[post("/providers")]
pub async fn create_listing(
    req: HttpRequest,
    db: web::Data<Database>,
    payload: web::Json<CreateListingRequest>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&req)?;
    let body = payload.into_inner();

    let category = match db.get_category(body.category_id).await? {
        Some(category) => category,
        None => {
            let mut map = FieldErrors::new();
            map.insert("category_id".into(), vec!["Unknown category".into()]);
            return Err(ApiError::Validation(map));
        }
    };

    let kind = CategoryKind::from_slug(&category.slug);
    let validated = validate_listing(&body, kind).map_err(ApiError::Validation)?;

    let slug = generate_slug(&validated.business_name);
    let new_provider = validated.into_new_provider(actor.user_id, category.id, slug);

    let image_urls = body.images.into_iter().map(|image| image.url).collect();
    let (provider, images, services) = db
        .create_listing(new_provider, image_urls, body.services)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(ProviderDetail {
        provider,
        category,
        services,
        images,
    })))
}

#[derive(Deserialize)]
pub struct ListProvidersQuery {
    pub city: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[get("/providers")]
pub async fn list_providers(
    db: web::Data<Database>,
    query: web::Query<ListProvidersQuery>,
) -> Result<HttpResponse, ApiError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let providers = db
        .list_providers(
            query.city.as_deref(),
            query.category.as_deref(),
            limit,
            offset,
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(providers)))
}

#[get("/providers/mine")]
pub async fn list_my_providers(
    req: HttpRequest,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&req)?;
    let providers = db.list_providers_for_user(actor.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(providers)))
}

#[get("/providers/slug/{slug}")]
pub async fn get_provider_by_slug(
    db: web::Data<Database>,
    recorder: web::Data<EngagementRecorder>,
    slug: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let detail = db
        .get_provider_detail_by_slug(&slug)
        .await?
        .ok_or(ApiError::NotFound("Provider"))?;

    recorder
        .record(detail.provider.id, AnalyticsEventType::View, None)
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(detail)))
}

#[get("/providers/{provider_id}")]
pub async fn get_provider(
    db: web::Data<Database>,
    recorder: web::Data<EngagementRecorder>,
    provider_id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let provider_id = provider_id.into_inner();
    let detail = db
        .get_provider_detail(provider_id)
        .await?
        .ok_or(ApiError::NotFound("Provider"))?;

    recorder
        .record(provider_id, AnalyticsEventType::View, None)
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(detail)))
}

#[put("/providers/{provider_id}")]
pub async fn update_listing(
    req: HttpRequest,
    db: web::Data<Database>,
    provider_id: web::Path<Uuid>,
    payload: web::Json<UpdateListingRequest>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&req)?;
    let mut provider = load_owned_provider(&db, actor, provider_id.into_inner()).await?;

    let category = db
        .get_category(provider.category_id)
        .await?
        .ok_or(ApiError::NotFound("Category"))?;
    let kind = CategoryKind::from_slug(&category.slug);

    let body = payload.into_inner();
    let submission = CreateListingRequest {
        business_name: body.business_name,
        description: body.description,
        city: body.city,
        area: body.area,
        address: body.address,
        pincode: body.pincode,
        phone: body.phone,
        email: body.email,
        website: body.website,
        category_id: provider.category_id,
        details: body.details,
        images: Vec::new(),
        services: Vec::new(),
    };
    let validated = validate_listing(&submission, kind).map_err(ApiError::Validation)?;

    validated.apply_to(&mut provider);
    let updated = db.update_provider(provider).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

#[delete("/providers/{provider_id}")]
pub async fn delete_listing(
    req: HttpRequest,
    db: web::Data<Database>,
    provider_id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&req)?;
    let provider = load_owned_provider(&db, actor, provider_id.into_inner()).await?;

    db.delete_provider(provider.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/providers/{provider_id}/stats")]
pub async fn get_provider_stats(
    req: HttpRequest,
    db: web::Data<Database>,
    provider_id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&req)?;
    let provider = load_owned_provider(&db, actor, provider_id.into_inner()).await?;

    let stats = db.provider_stats(provider.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(stats)))
}

// ============================================================================
// ENQUIRIES
// ============================================================================

#[post("/providers/{provider_id}/enquiries")]
pub async fn create_enquiry(
    db: web::Data<Database>,
    recorder: web::Data<EngagementRecorder>,
    email_client: web::Data<EmailClient>,
    provider_id: web::Path<Uuid>,
    payload: web::Json<CreateEnquiryRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = payload.into_inner();
    body.validate().map_err(field_errors_from)?;

    let provider = db
        .get_provider(provider_id.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Provider"))?;

    let enquiry = db
        .create_enquiry(
            provider.id,
            &body.customer_name,
            &body.customer_phone,
            body.customer_email.as_deref(),
            &body.message,
        )
        .await?;

    // Secondary effects: neither may fail the stored enquiry.
    if let Some(customer_email) = &enquiry.customer_email {
        email_client
            .send_enquiry_confirmation(customer_email, &provider.business_name)
            .await;
    }
    recorder
        .record(provider.id, AnalyticsEventType::EnquiryClick, None)
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(enquiry)))
}

#[get("/providers/{provider_id}/enquiries")]
pub async fn list_enquiries(
    req: HttpRequest,
    db: web::Data<Database>,
    provider_id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&req)?;
    let provider = load_owned_provider(&db, actor, provider_id.into_inner()).await?;

    let enquiries = db.list_enquiries_for_provider(provider.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(enquiries)))
}

#[put("/enquiries/{enquiry_id}")]
pub async fn update_enquiry_status(
    req: HttpRequest,
    db: web::Data<Database>,
    enquiry_id: web::Path<Uuid>,
    payload: web::Json<UpdateEnquiryStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&req)?;

    let enquiry = db
        .get_enquiry(enquiry_id.into_inner())
        .await?
        .ok_or(ApiError::Forbidden)?;
    load_owned_provider(&db, actor, enquiry.provider_id).await?;

    let updated = db
        .update_enquiry_status(enquiry.id, payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

// ============================================================================
// REVIEWS
// ============================================================================

#[post("/providers/{provider_id}/reviews")]
pub async fn create_review(
    req: HttpRequest,
    db: web::Data<Database>,
    provider_id: web::Path<Uuid>,
    payload: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&req)?;
    let body = payload.into_inner();
    body.validate().map_err(field_errors_from)?;

    let provider = db
        .get_provider(provider_id.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Provider"))?;

    let review = db
        .create_review(provider.id, actor.user_id, body.rating, body.comment.as_deref())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(review)))
}

#[derive(Deserialize)]
pub struct PaginationQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[get("/providers/{provider_id}/reviews")]
pub async fn list_reviews(
    db: web::Data<Database>,
    provider_id: web::Path<Uuid>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, ApiError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let reviews = db
        .list_reviews_for_provider(provider_id.into_inner(), limit, offset)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(reviews)))
}

// ============================================================================
// FAVORITES
// ============================================================================

#[post("/providers/{provider_id}/favorite")]
pub async fn toggle_favorite(
    req: HttpRequest,
    db: web::Data<Database>,
    provider_id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&req)?;

    let provider = db
        .get_provider(provider_id.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Provider"))?;

    let result = db.toggle_favorite(actor.user_id, provider.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

#[get("/favorites")]
pub async fn list_favorites(
    req: HttpRequest,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&req)?;
    let providers = db.list_favorites_for_user(actor.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(providers)))
}

// ============================================================================
// BOOKINGS & PAYMENTS
// ============================================================================

#[post("/providers/{provider_id}/bookings")]
pub async fn create_booking(
    req: HttpRequest,
    db: web::Data<Database>,
    payments: web::Data<PaymentClient>,
    provider_id: web::Path<Uuid>,
    payload: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&req)?;
    let body = payload.into_inner();
    body.validate().map_err(field_errors_from)?;

    let provider = db
        .get_provider(provider_id.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Provider"))?;

    let currency = body.currency.as_deref().unwrap_or("INR");
    let receipt = format!("booking-{}", Uuid::new_v4());

    // Order creation is a primary effect: a gateway failure fails the booking.
    let order_id = payments
        .create_order(body.amount, currency, &receipt)
        .await
        .map_err(ApiError::Upstream)?;

    let booking = db
        .create_booking(
            provider.id,
            actor.user_id,
            &body.service_name,
            body.amount,
            currency,
            Some(&order_id),
        )
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(booking)))
}

#[post("/payments/verify")]
pub async fn verify_payment(
    db: web::Data<Database>,
    payments: web::Data<PaymentClient>,
    payload: web::Json<VerifyPaymentRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = payload.into_inner();

    let booking = db
        .get_booking_by_order(&body.order_id)
        .await?
        .ok_or(ApiError::NotFound("Booking"))?;

    if !payments.verify_signature(&body.order_id, &body.payment_id, &body.signature) {
        let mut map = FieldErrors::new();
        map.insert("signature".into(), vec!["Payment signature mismatch".into()]);
        return Err(ApiError::Validation(map));
    }

    let updated = db.mark_booking_paid(booking.id, &body.payment_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

#[get("/bookings")]
pub async fn list_my_bookings(
    req: HttpRequest,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let actor = require_actor(&req)?;
    let bookings = db.list_bookings_for_user(actor.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(bookings)))
}

// ============================================================================
// FEEDBACK
// ============================================================================

#[post("/feedback")]
pub async fn create_feedback(
    db: web::Data<Database>,
    payload: web::Json<CreateFeedbackRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = payload.into_inner();
    body.validate().map_err(field_errors_from)?;

    let feedback = db
        .create_feedback(body.name.as_deref(), body.email.as_deref(), &body.message)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(feedback)))
}

// ============================================================================
// ANALYTICS EVENTS
// ============================================================================

/// Always accepted: the insert is best-effort and a store failure is not
/// the client's problem.
#[post("/providers/{provider_id}/events")]
pub async fn record_event(
    recorder: web::Data<EngagementRecorder>,
    provider_id: web::Path<Uuid>,
    payload: web::Json<RecordEventRequest>,
) -> HttpResponse {
    let body = payload.into_inner();
    recorder
        .record(provider_id.into_inner(), body.event_type, body.metadata)
        .await;
    HttpResponse::Accepted().json(ApiResponse::success("recorded"))
}
