use std::time::Duration;

use futures_util::try_join;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgPool};
use uuid::Uuid;

use crate::models::{
    AnalyticsEvent, AnalyticsEventType, Booking, Category, Enquiry, EnquiryStatus, Favorite,
    Feedback, FavoriteToggleResult, NewProvider, Provider, ProviderDetail, ProviderImage,
    ProviderStats, Review, Service, ServiceInput,
};

const PROVIDER_COLUMNS: &str = r#"
    id, user_id, category_id, business_name, slug, description,
    city, area, address, pincode, phone, email, website, details,
    is_verified, rating, review_count, status, created_at, updated_at
"#;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = match Self::pool_options().connect(database_url).await {
            Ok(pool) => pool,
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some("3D000") =>
            {
                log::info!("Database missing, attempting to create it");
                create_database_if_missing(database_url).await?;
                Self::pool_options().connect(database_url).await?
            }
            Err(err) => return Err(err),
        };

        // Run embedded migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    fn pool_options() -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Some(Duration::from_secs(600)))
            .test_before_acquire(true)
    }

    // ========================================================================
    // CATEGORIES
    // ========================================================================

    pub async fn list_categories(&self) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, icon, display_order
            FROM categories
            ORDER BY display_order ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_category(&self, category_id: Uuid) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, icon, display_order
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
    }

    // ========================================================================
    // PROVIDERS (Listing Repository)
    // ========================================================================

    /// Persist a new listing: the provider row first, then its images and
    /// services. The dependent inserts are intentionally not transactional
    /// with the provider insert; a failure there is logged and the listing
    /// survives without the affected rows.
    pub async fn create_listing(
        &self,
        provider: NewProvider,
        image_urls: Vec<String>,
        services: Vec<ServiceInput>,
    ) -> Result<(Provider, Vec<ProviderImage>, Vec<Service>), sqlx::Error> {
        let created = self.insert_provider(provider).await?;

        let images = match self.insert_images(created.id, &image_urls).await {
            Ok(images) => images,
            Err(err) => {
                log::error!(
                    "Failed to attach images to provider {}: {err:?}; listing kept without images",
                    created.id
                );
                Vec::new()
            }
        };

        let services = match self.insert_services(created.id, &services).await {
            Ok(services) => services,
            Err(err) => {
                log::error!(
                    "Failed to attach services to provider {}: {err:?}; listing kept without services",
                    created.id
                );
                Vec::new()
            }
        };

        Ok((created, images, services))
    }

    async fn insert_provider(&self, provider: NewProvider) -> Result<Provider, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO providers (
                id, user_id, category_id, business_name, slug, description,
                city, area, address, pincode, phone, email, website, details,
                is_verified, rating, review_count, status, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
            )
            RETURNING {PROVIDER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Provider>(&sql)
            .bind(provider.id)
            .bind(provider.user_id)
            .bind(provider.category_id)
            .bind(provider.business_name)
            .bind(provider.slug)
            .bind(provider.description)
            .bind(provider.city)
            .bind(provider.area)
            .bind(provider.address)
            .bind(provider.pincode)
            .bind(provider.phone)
            .bind(provider.email)
            .bind(provider.website)
            .bind(provider.details)
            .bind(provider.is_verified)
            .bind(provider.rating)
            .bind(provider.review_count)
            .bind(provider.status)
            .bind(provider.created_at)
            .bind(provider.updated_at)
            .fetch_one(&self.pool)
            .await
    }

    /// Index 0 of the submitted URLs becomes the primary image.
    async fn insert_images(
        &self,
        provider_id: Uuid,
        urls: &[String],
    ) -> Result<Vec<ProviderImage>, sqlx::Error> {
        let mut stored = Vec::with_capacity(urls.len());
        for (index, url) in urls.iter().enumerate() {
            let image = sqlx::query_as::<_, ProviderImage>(
                r#"
                INSERT INTO provider_images (id, provider_id, url, is_primary, display_order)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, provider_id, url, is_primary, display_order
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(provider_id)
            .bind(url)
            .bind(index == 0)
            .bind(index as i32)
            .fetch_one(&self.pool)
            .await?;
            stored.push(image);
        }
        Ok(stored)
    }

    async fn insert_services(
        &self,
        provider_id: Uuid,
        services: &[ServiceInput],
    ) -> Result<Vec<Service>, sqlx::Error> {
        let mut stored = Vec::with_capacity(services.len());
        for (index, service) in services.iter().enumerate() {
            let row = sqlx::query_as::<_, Service>(
                r#"
                INSERT INTO services (id, provider_id, name, price, display_order)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, provider_id, name, price, display_order
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(provider_id)
            .bind(&service.name)
            .bind(&service.price)
            .bind(index as i32)
            .fetch_one(&self.pool)
            .await?;
            stored.push(row);
        }
        Ok(stored)
    }

    pub async fn get_provider(&self, provider_id: Uuid) -> Result<Option<Provider>, sqlx::Error> {
        let sql = format!("SELECT {PROVIDER_COLUMNS} FROM providers WHERE id = $1");
        sqlx::query_as::<_, Provider>(&sql)
            .bind(provider_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_provider_by_slug(&self, slug: &str) -> Result<Option<Provider>, sqlx::Error> {
        let sql = format!("SELECT {PROVIDER_COLUMNS} FROM providers WHERE slug = $1");
        sqlx::query_as::<_, Provider>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
    }

    /// Read-with-joins: the provider plus its category, services and images.
    pub async fn get_provider_detail(
        &self,
        provider_id: Uuid,
    ) -> Result<Option<ProviderDetail>, sqlx::Error> {
        let provider = match self.get_provider(provider_id).await? {
            Some(provider) => provider,
            None => return Ok(None),
        };
        self.load_provider_relations(provider).await.map(Some)
    }

    pub async fn get_provider_detail_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ProviderDetail>, sqlx::Error> {
        let provider = match self.get_provider_by_slug(slug).await? {
            Some(provider) => provider,
            None => return Ok(None),
        };
        self.load_provider_relations(provider).await.map(Some)
    }

    async fn load_provider_relations(
        &self,
        provider: Provider,
    ) -> Result<ProviderDetail, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, icon, display_order FROM categories WHERE id = $1",
        )
        .bind(provider.category_id)
        .fetch_one(&self.pool)
        .await?;

        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, provider_id, name, price, display_order
            FROM services
            WHERE provider_id = $1
            ORDER BY display_order ASC
            "#,
        )
        .bind(provider.id)
        .fetch_all(&self.pool)
        .await?;

        let images = sqlx::query_as::<_, ProviderImage>(
            r#"
            SELECT id, provider_id, url, is_primary, display_order
            FROM provider_images
            WHERE provider_id = $1
            ORDER BY is_primary DESC, display_order ASC
            "#,
        )
        .bind(provider.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ProviderDetail {
            provider,
            category,
            services,
            images,
        })
    }

    pub async fn list_providers(
        &self,
        city: Option<&str>,
        category_slug: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Provider>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {}
            FROM providers p
            WHERE ($1::text IS NULL OR LOWER(p.city) = LOWER($1))
              AND ($2::text IS NULL OR p.category_id IN (SELECT id FROM categories WHERE slug = $2))
              AND p.status = 'active'
            ORDER BY p.is_verified DESC, p.rating DESC, p.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
            prefixed_provider_columns("p")
        );

        sqlx::query_as::<_, Provider>(&sql)
            .bind(city)
            .bind(category_slug)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn list_providers_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Provider>, sqlx::Error> {
        let sql = format!(
            "SELECT {PROVIDER_COLUMNS} FROM providers WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Provider>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    /// `user_id`, `slug` and the rating aggregates are deliberately absent
    /// from the SET list: they are immutable through the edit path.
    pub async fn update_provider(&self, provider: Provider) -> Result<Provider, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE providers
            SET business_name = $2, description = $3, city = $4, area = $5,
                address = $6, pincode = $7, phone = $8, email = $9,
                website = $10, details = $11, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROVIDER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Provider>(&sql)
            .bind(provider.id)
            .bind(provider.business_name)
            .bind(provider.description)
            .bind(provider.city)
            .bind(provider.area)
            .bind(provider.address)
            .bind(provider.pincode)
            .bind(provider.phone)
            .bind(provider.email)
            .bind(provider.website)
            .bind(provider.details)
            .fetch_one(&self.pool)
            .await
    }

    /// Dependent rows are removed by the store's cascade rules.
    pub async fn delete_provider(&self, provider_id: Uuid) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM providers WHERE id = $1")
            .bind(provider_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    // ========================================================================
    // ENQUIRIES
    // ========================================================================

    pub async fn create_enquiry(
        &self,
        provider_id: Uuid,
        customer_name: &str,
        customer_phone: &str,
        customer_email: Option<&str>,
        message: &str,
    ) -> Result<Enquiry, sqlx::Error> {
        sqlx::query_as::<_, Enquiry>(
            r#"
            INSERT INTO enquiries (
                id, provider_id, customer_name, customer_phone, customer_email, message, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'new')
            RETURNING id, provider_id, customer_name, customer_phone, customer_email,
                      message, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(provider_id)
        .bind(customer_name)
        .bind(customer_phone)
        .bind(customer_email)
        .bind(message)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_enquiries_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Enquiry>, sqlx::Error> {
        sqlx::query_as::<_, Enquiry>(
            r#"
            SELECT id, provider_id, customer_name, customer_phone, customer_email,
                   message, status, created_at, updated_at
            FROM enquiries
            WHERE provider_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_enquiry(&self, enquiry_id: Uuid) -> Result<Option<Enquiry>, sqlx::Error> {
        sqlx::query_as::<_, Enquiry>(
            r#"
            SELECT id, provider_id, customer_name, customer_phone, customer_email,
                   message, status, created_at, updated_at
            FROM enquiries
            WHERE id = $1
            "#,
        )
        .bind(enquiry_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn update_enquiry_status(
        &self,
        enquiry_id: Uuid,
        status: EnquiryStatus,
    ) -> Result<Enquiry, sqlx::Error> {
        sqlx::query_as::<_, Enquiry>(
            r#"
            UPDATE enquiries
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, provider_id, customer_name, customer_phone, customer_email,
                      message, status, created_at, updated_at
            "#,
        )
        .bind(enquiry_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    // ========================================================================
    // REVIEWS
    // ========================================================================

    /// Insert a review and recompute the provider's rating aggregates in one
    /// transaction so the aggregates never drift from the review rows.
    /// Repeat reviews by the same user are allowed; the store carries no
    /// uniqueness constraint for (user, provider).
    pub async fn create_review(
        &self,
        provider_id: Uuid,
        user_id: Uuid,
        rating: i32,
        comment: Option<&str>,
    ) -> Result<Review, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, provider_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, provider_id, user_id, rating, comment, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(provider_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(tx.as_mut())
        .await?;

        sqlx::query(
            r#"
            UPDATE providers
            SET rating = (SELECT COALESCE(AVG(rating), 0) FROM reviews WHERE provider_id = $1),
                review_count = (SELECT COUNT(*) FROM reviews WHERE provider_id = $1),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(provider_id)
        .execute(tx.as_mut())
        .await?;

        tx.commit().await?;

        Ok(review)
    }

    pub async fn list_reviews_for_provider(
        &self,
        provider_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT id, provider_id, user_id, rating, comment, created_at
            FROM reviews
            WHERE provider_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(provider_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    // ========================================================================
    // FAVORITES
    // ========================================================================

    /// Idempotent toggle: an existing (user, provider) pair is removed, a
    /// missing one is created. The local profile row is upserted first so a
    /// favorite never fails merely because the identity provider's user has
    /// not been synced into the local `users` table yet.
    ///
    /// Concurrent toggles from the same user are not serialized; the unique
    /// constraint on (user_id, provider_id) bounds the damage to a failed
    /// insert rather than a duplicate row.
    pub async fn toggle_favorite(
        &self,
        user_id: Uuid,
        provider_id: Uuid,
    ) -> Result<FavoriteToggleResult, sqlx::Error> {
        let existing = sqlx::query_as::<_, Favorite>(
            r#"
            SELECT id, user_id, provider_id, created_at
            FROM favorites
            WHERE user_id = $1 AND provider_id = $2
            "#,
        )
        .bind(user_id)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(favorite) = existing {
            sqlx::query("DELETE FROM favorites WHERE id = $1")
                .bind(favorite.id)
                .execute(&self.pool)
                .await?;
            return Ok(FavoriteToggleResult::Unfavorited);
        }

        self.upsert_user_profile(user_id).await?;

        sqlx::query(
            r#"
            INSERT INTO favorites (id, user_id, provider_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(provider_id)
        .execute(&self.pool)
        .await?;

        Ok(FavoriteToggleResult::Favorited)
    }

    async fn upsert_user_profile(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id)
            VALUES ($1)
            ON CONFLICT (id) DO UPDATE SET updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_favorites_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Provider>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {}
            FROM providers p
            INNER JOIN favorites f ON f.provider_id = p.id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
            prefixed_provider_columns("p")
        );

        sqlx::query_as::<_, Provider>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    // ========================================================================
    // BOOKINGS
    // ========================================================================

    pub async fn create_booking(
        &self,
        provider_id: Uuid,
        user_id: Uuid,
        service_name: &str,
        amount: i64,
        currency: &str,
        payment_order_id: Option<&str>,
    ) -> Result<Booking, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, provider_id, user_id, service_name, amount, currency,
                payment_order_id, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')
            RETURNING id, provider_id, user_id, service_name, amount, currency,
                      payment_order_id, payment_id, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(provider_id)
        .bind(user_id)
        .bind(service_name)
        .bind(amount)
        .bind(currency)
        .bind(payment_order_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_booking_by_order(
        &self,
        payment_order_id: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, provider_id, user_id, service_name, amount, currency,
                   payment_order_id, payment_id, status, created_at, updated_at
            FROM bookings
            WHERE payment_order_id = $1
            "#,
        )
        .bind(payment_order_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn mark_booking_paid(
        &self,
        booking_id: Uuid,
        payment_id: &str,
    ) -> Result<Booking, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET payment_id = $2, status = 'paid', updated_at = NOW()
            WHERE id = $1
            RETURNING id, provider_id, user_id, service_name, amount, currency,
                      payment_order_id, payment_id, status, created_at, updated_at
            "#,
        )
        .bind(booking_id)
        .bind(payment_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_bookings_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, provider_id, user_id, service_name, amount, currency,
                   payment_order_id, payment_id, status, created_at, updated_at
            FROM bookings
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    // ========================================================================
    // FEEDBACK
    // ========================================================================

    pub async fn create_feedback(
        &self,
        name: Option<&str>,
        email: Option<&str>,
        message: &str,
    ) -> Result<Feedback, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedbacks (id, name, email, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, message, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(message)
        .fetch_one(&self.pool)
        .await
    }

    // ========================================================================
    // ANALYTICS EVENTS
    // ========================================================================

    pub async fn insert_analytics_event(
        &self,
        provider_id: Uuid,
        event_type: AnalyticsEventType,
        metadata: Option<serde_json::Value>,
    ) -> Result<AnalyticsEvent, sqlx::Error> {
        sqlx::query_as::<_, AnalyticsEvent>(
            r#"
            INSERT INTO analytics_events (id, provider_id, event_type, metadata)
            VALUES ($1, $2, $3, $4)
            RETURNING id, provider_id, event_type, metadata, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(provider_id)
        .bind(event_type)
        .bind(metadata)
        .fetch_one(&self.pool)
        .await
    }

    // ========================================================================
    // OWNER DASHBOARD
    // ========================================================================

    /// Independent count queries fanned out concurrently; any failure fails
    /// the aggregate read.
    pub async fn provider_stats(&self, provider_id: Uuid) -> Result<ProviderStats, sqlx::Error> {
        let enquiries = self.count("SELECT COUNT(*) FROM enquiries WHERE provider_id = $1", provider_id);
        let reviews = self.count("SELECT COUNT(*) FROM reviews WHERE provider_id = $1", provider_id);
        let favorites = self.count("SELECT COUNT(*) FROM favorites WHERE provider_id = $1", provider_id);
        let views = self.count(
            "SELECT COUNT(*) FROM analytics_events WHERE provider_id = $1 AND event_type = 'view'",
            provider_id,
        );

        let (enquiries, reviews, favorites, views) =
            try_join!(enquiries, reviews, favorites, views)?;

        Ok(ProviderStats {
            enquiries,
            reviews,
            favorites,
            views,
        })
    }

    async fn count(&self, sql: &str, provider_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(sql)
            .bind(provider_id)
            .fetch_one(&self.pool)
            .await
    }
}

fn prefixed_provider_columns(alias: &str) -> String {
    PROVIDER_COLUMNS
        .split(',')
        .map(|col| format!("{}.{}", alias, col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

async fn create_database_if_missing(database_url: &str) -> Result<(), sqlx::Error> {
    let options: PgConnectOptions = database_url.parse()?;
    let database_name = options
        .get_database()
        .map(|name| name.to_string())
        .unwrap_or_else(|| "postgres".to_string());

    // Already targeting the maintenance database: nothing to do.
    if database_name.eq_ignore_ascii_case("postgres") {
        return Ok(());
    }

    let maintenance_options = options.clone().database("postgres");
    let mut connection = sqlx::postgres::PgConnection::connect_with(&maintenance_options).await?;

    let escaped_name = database_name.replace('"', "\"\"");
    let create_stmt = format!("CREATE DATABASE \"{}\"", escaped_name);
    match sqlx::query(&create_stmt).execute(&mut connection).await {
        Ok(_) => log::info!("Database '{database_name}' created"),
        Err(err) => log::warn!("Could not create database '{database_name}': {err:?}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_column_list_prefixes_cleanly() {
        let cols = prefixed_provider_columns("p");
        assert!(cols.starts_with("p.id, p.user_id"));
        assert!(cols.contains("p.review_count"));
        assert!(!cols.contains("\n"));
    }
}
