//! Storefront client smoke CLI.
//!
//! Resumes a cached session if one exists, bootstraps the catalog and logs
//! the first product page. Useful for poking a storefront API from a shell.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storefront_client::{ApiClient, CatalogStore, Config, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting storefront client");
    tracing::info!("API url: {}", config.api_url);
    tracing::info!("Credential cache: {:?}", config.token_path);

    let api = ApiClient::from_config(&config);

    // Resume the previous session if a credential was cached
    let mut session = SessionStore::new();
    session.resume(&api).await;
    match session.user() {
        Some(user) => tracing::info!("Authenticated as {}", user.email),
        None => tracing::info!("Browsing anonymously"),
    }

    // Bootstrap the catalog and show the first page
    let mut catalog = CatalogStore::new(config.page_size);
    catalog.bootstrap(&api).await?;

    tracing::info!(
        "Loaded {} categories, {} subcategories",
        catalog.categories().len(),
        catalog.subcategories().len()
    );
    tracing::info!(
        "Page {}/{} ({} products total)",
        catalog.pagination().current_page,
        catalog.pagination().total_pages,
        catalog.pagination().total_products
    );
    for product in catalog.displayed() {
        let price = product
            .display_price()
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "-".to_string());
        tracing::info!("  {} ({})", product.title, price);
    }

    Ok(())
}
