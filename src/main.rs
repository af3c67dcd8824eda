use std::io;

use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::{Config, Environment, File};
use dotenvy::dotenv;

use wayfare_matching::db::establish_connection_pool;
use wayfare_matching::models::config::ServerConfig;
use wayfare_matching::routes;

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(Environment::with_prefix("APP"))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    let server_config = load_config().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        io::Error::other(e)
    })?;

    env_logger::init_from_env(
        env_logger::Env::default().default_filter_or(server_config.log_level.as_str()),
    );

    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        log::error!("Failed to establish database connection: {e}");
        io::Error::other(e)
    })?;

    let secret_key = Key::try_from(server_config.secret.as_bytes()).map_err(|e| {
        log::error!("Invalid secret key: {e}");
        io::Error::other(e)
    })?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting server at {}:{}, sessions issued by {}",
        server_config.address,
        server_config.port,
        server_config.auth_service_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .service(web::scope("/api").configure(routes::configure))
    })
    .bind(bind_address)?
    .run()
    .await
}
