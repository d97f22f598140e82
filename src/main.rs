use std::time::{Duration, Instant};

use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use rust_schoolhub::config::AppConfig;
use rust_schoolhub::routes;
use rust_schoolhub::runtime::lifetime;
use rust_schoolhub::utils::{json_error_handler, query_error_handler};

/// 日志输出到非阻塞 stdout；开发环境带文件行号，其余环境输出 JSON
fn init_tracing(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.app.log_level))
        .with_writer(writer)
        .with_level(true)
        .with_ansi(config.is_development());

    if config.is_development() {
        builder.with_file(true).with_line_number(true).init();
    } else {
        builder.json().init();
    }
    guard
}

/// 扫码页面和管理端不同源，CORS 全部放开
fn cors(config: &AppConfig) -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(config.cors.max_age)
}

/// 接口返回的是会话相关数据，禁止缓存
fn default_headers(config: &AppConfig) -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Connection", "keep-alive"))
        .add((
            "Keep-Alive",
            format!("timeout={}, max=1000", config.server.timeouts.keep_alive),
        ))
        .add(("Cache-Control", "no-store"))
}

fn startup_error(stage: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{stage}: {err}"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let started = Instant::now();
    dotenv().ok();
    setup_panic!();

    AppConfig::init().map_err(|e| startup_error("Invalid configuration", e))?;
    let config = AppConfig::get();
    let _log_guard = init_tracing(config);

    info!(
        "{} {} ({}) starting: sessions {}h, attendance codes {} chars / {}-{} min, invitations {}d",
        config.app.system_name,
        env!("CARGO_PKG_VERSION"),
        config.app.environment,
        config.session.ttl_hours,
        config.attendance.code_length,
        config.attendance.default_duration_minutes,
        config.attendance.max_duration_minutes,
        config.invitation.ttl_days,
    );

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| startup_error("Startup failed", e))?;
    let storage = startup.storage;
    let cache = startup.cache;

    debug!(
        "Pre-startup processing completed in {} ms",
        started.elapsed().as_millis()
    );
    info!("Using {} worker(s)", config.server.workers);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors(config))
            .wrap(Compress::default())
            .wrap(default_headers(config))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .configure(routes::configure_api_routes)
    })
    .keep_alive(Duration::from_secs(config.server.timeouts.keep_alive))
    .client_request_timeout(Duration::from_millis(config.server.timeouts.client_request))
    .client_disconnect_timeout(Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    #[cfg(unix)]
    let server = match config.unix_socket_path() {
        Some(socket_path) => {
            warn!("Listening on Unix socket {}", socket_path);
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            server.bind_uds(socket_path)?
        }
        None => {
            warn!("Listening on http://{}", config.server_bind_address());
            server.bind(config.server_bind_address())?
        }
    };

    #[cfg(not(unix))]
    let server = {
        warn!("Listening on http://{}", config.server_bind_address());
        server.bind(config.server_bind_address())?
    };

    tokio::select! {
        res = server.run() => res?,
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Shutdown signal received, server stopped");
        }
    }

    Ok(())
}
