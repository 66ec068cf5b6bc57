mod analytics;
mod auth;
mod clients;
mod database;
mod errors;
mod handlers;
mod models;
mod slug;
mod validation;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::env;

use crate::analytics::Recorder;
use crate::clients::email::EmailClient;
use crate::clients::payments::PaymentClient;
use crate::database::Database;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8084".to_string());
    let bind_address = format!("{}:{}", host, port);

    let database_url = env::var("DATABASE_URL").map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "DATABASE_URL must be set in environment",
        )
    })?;

    let payment_base_url = env::var("PAYMENT_API_URL")
        .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string());
    let payment_key_id = env::var("PAYMENT_KEY_ID").unwrap_or_default();
    let payment_key_secret = env::var("PAYMENT_KEY_SECRET").unwrap_or_default();

    let email_base_url =
        env::var("EMAIL_API_URL").unwrap_or_else(|_| "https://api.resend.com".to_string());
    let email_api_key = env::var("EMAIL_API_KEY").unwrap_or_default();
    let email_from = env::var("EMAIL_FROM")
        .unwrap_or_else(|_| "no-reply@hyperlocal.example".to_string());

    let db = Database::connect(&database_url).await.map_err(|err| {
        log::error!("Failed to initialize database: {err:?}");
        std::io::Error::new(std::io::ErrorKind::Other, err)
    })?;
    log::info!("Database connected and migrations applied");

    let recorder = web::Data::new(Recorder::new(db.clone()));
    let db_data = web::Data::new(db);
    let payments = web::Data::new(PaymentClient::new(
        payment_base_url,
        payment_key_id,
        payment_key_secret,
    ));
    let email = web::Data::new(EmailClient::new(email_base_url, email_api_key, email_from));

    log::info!("🚀 Starting Hyperlocal Listings Service on {}", bind_address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(db_data.clone())
            .app_data(recorder.clone())
            .app_data(payments.clone())
            .app_data(email.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                web::scope("/api/v1")
                    // Health
                    .service(handlers::health_check)
                    // Categories
                    .service(handlers::list_categories)
                    // Providers; static segments registered before {provider_id}
                    .service(handlers::create_listing)
                    .service(handlers::list_providers)
                    .service(handlers::list_my_providers)
                    .service(handlers::get_provider_by_slug)
                    .service(handlers::get_provider_stats)
                    .service(handlers::get_provider)
                    .service(handlers::update_listing)
                    .service(handlers::delete_listing)
                    // Enquiries
                    .service(handlers::create_enquiry)
                    .service(handlers::list_enquiries)
                    .service(handlers::update_enquiry_status)
                    // Reviews
                    .service(handlers::create_review)
                    .service(handlers::list_reviews)
                    // Favorites
                    .service(handlers::toggle_favorite)
                    .service(handlers::list_favorites)
                    // Bookings & payments
                    .service(handlers::create_booking)
                    .service(handlers::verify_payment)
                    .service(handlers::list_my_bookings)
                    // Feedback
                    .service(handlers::create_feedback)
                    // Analytics
                    .service(handlers::record_event),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
