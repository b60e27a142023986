use kitchen::config::Config;
use kitchen::{db, services};
use shared::ExpiryStatus;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Load configuration
    let config = Config::from_env()?;

    log::info!("Opening inventory database at {}", config.database_url);

    let pool = db::connect(&config).await?;

    db::migrate(&pool).await?;
    log::info!("Database migrations completed");

    let sentinel = services::users::get_sentinel_user(&pool, &config.sentinel_username).await?;
    log::info!("Fallback user is '{}' ({})", sentinel.username, sentinel.id);

    let today = shared::today();
    for household in services::households::list_households(&pool).await? {
        let expiring = services::food_items::list_expiring_items(&pool, &household.id, today).await?;
        if expiring.is_empty() {
            continue;
        }

        log::info!("{}: {} item(s) need attention", household, expiring.len());
        for details in expiring {
            let item = &details.item;
            let name = details.food_name().unwrap_or("Unnamed item");
            let days = item.days_until_expiry(today)?;
            let package = item.package.label();
            match item.expiry_status(today)? {
                ExpiryStatus::Expired => {
                    log::warn!("{}: {} x {} of {} expired {} day(s) ago", household, item.quantity, package, name, -days);
                }
                ExpiryStatus::NearExpiry => {
                    log::warn!("{}: {} x {} of {} expires in {} day(s)", household, item.quantity, package, name, days);
                }
                ExpiryStatus::Fresh => {}
            }
        }
    }

    pool.close().await;

    Ok(())
}
