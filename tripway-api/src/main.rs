use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tripway_api::{app, state::{AppState, AuthConfig}};
use tripway_domain::UserRole;
use tripway_policy::{AccessDefault, RoutePolicy};
use tripway_pricing::{CommissionRates, QuoteEngine};
use tripway_store::{InMemoryBookingRepo, InMemoryUserRepo, UserRepository};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripway_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = tripway_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Tripway API on port {}", config.server.port);

    let rates = CommissionRates {
        car_rental_bps: config.business_rules.car_rental_commission_bps,
        hotel_bps: config.business_rules.hotel_commission_bps,
        hotel_featured_bps: config.business_rules.hotel_featured_commission_bps,
    };

    let access_default = match config.business_rules.route_access_default.as_str() {
        "deny" => AccessDefault::Deny,
        _ => AccessDefault::Allow,
    };

    let users = Arc::new(InMemoryUserRepo::new());
    seed_accounts(users.as_ref()).await;

    let app_state = AppState {
        bookings: Arc::new(InMemoryBookingRepo::new()),
        users,
        quotes: QuoteEngine::new(rates),
        route_policy: Arc::new(RoutePolicy::new(access_default)),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// One account per role so a fresh instance is usable immediately; the
/// store is in-memory and starts empty otherwise.
async fn seed_accounts(users: &InMemoryUserRepo) {
    let seeds = [
        ("admin@tripway.dev", "Platform Admin", UserRole::Admin),
        ("driver@tripway.dev", "Demo Driver", UserRole::Driver),
        ("client@tripway.dev", "Demo Client", UserRole::Client),
    ];

    for (email, name, role) in seeds {
        if let Err(e) = users.create(email, name, role).await {
            tracing::warn!("Failed to seed account {}: {}", email, e);
        }
    }
}
