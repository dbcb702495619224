use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use axum::{middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        // Emailed confirmation link lands here, outside the API prefix
        .route(
            "/validare-anunt",
            routing::get(handlers::validation::confirm_listing),
        )
}

fn api_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    let auth = auth_routes(&rate_limit_config);
    let public_read = public_read_routes(&rate_limit_config);
    let protected =
        protected_routes(&rate_limit_config).layer(middleware::from_fn(auth_middleware));

    auth.merge(public_read).merge(protected)
}

/// Auth routes: register, login.
fn auth_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/auth/register", routing::post(handlers::register))
        .route("/auth/login", routing::post(handlers::login));

    with_optional_rate_limit(router, config.enabled, config.auth)
}

/// Public read routes: browse and view listings.
fn public_read_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/listings", routing::get(handlers::listing::list_listings))
        .route(
            // Parameter must be named `{id}` to match the other `/listings/{id}/...`
            // routes; axum rejects differing names at the same position. The
            // handler still receives the slug (positional extraction).
            "/listings/{id}",
            routing::get(handlers::listing::get_listing),
        );

    with_optional_rate_limit(router, config.enabled, config.public_read)
}

/// Protected routes: all authenticated operations.
fn protected_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Auth
        .route("/auth/me", routing::get(handlers::get_current_user))
        // Listings
        .route(
            "/listings",
            routing::post(handlers::listing::create_listing),
        )
        .route(
            "/listings/{id}",
            routing::put(handlers::listing::update_listing),
        )
        .route(
            "/listings/{id}/resend-validation",
            routing::post(handlers::listing::resend_validation),
        )
        // Favorites
        .route(
            "/listings/{id}/favorite",
            routing::post(handlers::favorite::add_favorite)
                .delete(handlers::favorite::remove_favorite),
        )
        .route(
            "/favorites",
            routing::get(handlers::favorite::list_favorites),
        )
        // Messages
        .route(
            "/listings/{id}/messages",
            routing::post(handlers::message::send_message),
        )
        .route("/messages", routing::get(handlers::message::inbox))
        // Notifications
        .route(
            "/notifications",
            routing::get(handlers::notification::list_notifications)
                .delete(handlers::notification::delete_all),
        )
        .route(
            "/notifications/unread-count",
            routing::get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            routing::put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            routing::put(handlers::notification::mark_read),
        )
        // Admin (role checked in handlers)
        .route(
            "/admin/listings",
            routing::get(handlers::admin::list_listings_by_status),
        )
        .route(
            "/admin/listings/{id}/status",
            routing::put(handlers::admin::set_listing_status),
        )
        .route("/admin/stats", routing::get(handlers::admin::stats));

    with_optional_rate_limit(router, config.enabled, config.protected)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}
