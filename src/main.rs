use dotenvy::dotenv;
use storefront::{build_server, open_storage, Settings, Storefront};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let storage = open_storage(&settings);
    let storefront = Storefront::open(storage, &settings.user_id);

    log::info!(
        "Starting storefront for '{}' at http://{}:{}",
        storefront.basket().user_id(),
        settings.host,
        settings.port
    );

    build_server(storefront, &settings.host, settings.port)?.await
}
