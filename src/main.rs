use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};

use attendance_dashboards::auth::rate_limit::LoginThrottle;
use attendance_dashboards::backend::{BackendClient, ViewCache};
use attendance_dashboards::config::AppConfig;
use attendance_dashboards::handlers::auth_handlers;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    log::info!("Configuration: {config:?}");

    let client = BackendClient::new(&config.backend_url, config.backend_timeout).map_err(|e| {
        log::error!("Could not build backend client: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let client = web::Data::new(client);
    let cache = web::Data::new(ViewCache::new());
    let throttle = web::Data::new(LoginThrottle::default());
    let page_size = web::Data::new(config.page_size);
    let session_key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(client.clone())
            .app_data(cache.clone())
            .app_data(throttle.clone())
            .app_data(page_size.clone())
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            .configure(attendance_dashboards::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(auth_handlers::not_found))
    })
    .bind(config.bind_addr)?
    .run()
    .await
}
