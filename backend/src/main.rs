//! Backend entry point: wires configuration, the database pool, domain
//! services, and the HTTP server.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use cashpoints_backend::inbound::http::admin::{self, TelegramRelay};
use cashpoints_backend::inbound::http::auth::AdminToken;
use cashpoints_backend::inbound::http::health::{live, ready, HealthState};
use cashpoints_backend::inbound::http::state::HttpState;
use cashpoints_backend::inbound::http::{notifications, referrals, tasks, users, wallet};
use cashpoints_backend::outbound::persistence::{DbPool, PoolConfig};
use cashpoints_backend::outbound::telegram::TelegramClient;
use cashpoints_backend::server::config::AppConfig;
use cashpoints_backend::server::{run_migrations, state_builders::build_http_state};
#[cfg(debug_assertions)]
use cashpoints_backend::ApiDoc;

fn to_io_error(error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(error.to_string())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::load().map_err(to_io_error)?;
    let database_url = config
        .database_url
        .clone()
        .ok_or_else(|| to_io_error("CASHPOINTS_DATABASE_URL is required"))?;

    run_migrations(&database_url).await.map_err(to_io_error)?;

    let pool = DbPool::new(
        PoolConfig::new(&database_url).with_max_size(config.db_pool_size()),
    )
    .await
    .map_err(to_io_error)?;

    let relay = match config.telegram_bot_token.as_deref() {
        Some(token) if !token.is_empty() => {
            let client = Arc::new(TelegramClient::new(token).map_err(to_io_error)?);
            match client.get_me().await {
                Ok(bot) => info!(
                    bot_id = bot.id,
                    username = bot.username.as_deref().unwrap_or(""),
                    "telegram relay connected"
                ),
                Err(error) => warn!(%error, "telegram relay unavailable at startup"),
            }
            TelegramRelay::new(client)
        }
        _ => {
            info!("telegram relay disabled: no bot token configured");
            TelegramRelay::disabled()
        }
    };

    let http_state = build_http_state(&pool, config.referral_bonus());
    let admin_token = AdminToken::new(config.admin_token());
    let bind_addr = config.bind_addr().to_owned();

    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(
            server_health_state.clone(),
            http_state.clone(),
            admin_token.clone(),
            relay.clone(),
        )
    })
    .bind(bind_addr.as_str())?;

    health_state.mark_ready();
    info!(addr = %bind_addr, "cashpoints backend listening");
    server.run().await
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    admin_token: AdminToken,
    relay: TelegramRelay,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .app_data(web::Data::new(admin_token))
        .app_data(web::Data::new(relay))
        .service(tasks::task_board)
        .service(tasks::task_eligibility)
        .service(tasks::complete_task)
        .service(tasks::check_uid)
        .service(tasks::submit_uid)
        .service(tasks::list_submissions)
        .service(tasks::submission_status)
        .service(users::open_session)
        .service(users::my_profile)
        .service(users::update_my_profile)
        .service(users::my_stats)
        .service(wallet::request_withdrawal)
        .service(wallet::withdrawal_history)
        .service(referrals::record_referral)
        .service(referrals::referral_summary)
        .service(notifications::list_notifications)
        .service(notifications::unread_count)
        .service(notifications::mark_read)
        .service(notifications::delete_notification)
        .service(admin::resolve_submission)
        .service(admin::resolve_withdrawal)
        .service(admin::grant_experience)
        .service(admin::send_telegram_message)
        .service(admin::set_telegram_commands);

    let app = App::new()
        .app_data(health_state)
        .app_data(web::Data::new(http_state))
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}
