#![deny(missing_docs)]
//! RepoGrade server executable.
//!
//! Hosts the repository analysis endpoint used by the web UI and CLI.

mod analysis;
mod config;
mod github;
mod narrative;
mod openapi;
mod routes;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;

#[cfg(not(test))]
use crate::analysis::AnalysisService;
#[cfg(not(test))]
use crate::config::Config;
#[cfg(not(test))]
use crate::routes::{API_KEY_HEADER, AppState, analyze, health, json_config, openapi_json};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let analysis = AnalysisService::from_config(&config).map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState { analysis });

    let allowed_origins = config.listen.ui_origins.clone();
    let listen_addr = config.listen.host.clone();
    let listen_port = config.listen.port;
    log::info!("starting repograde-server on {listen_addr}:{listen_port}");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![
                    header::CONTENT_TYPE,
                    header::HeaderName::from_static(API_KEY_HEADER),
                ])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .app_data(json_config())
                .service(analyze)
                .service(health)
                .service(openapi_json)
        })
        .bind((listen_addr, listen_port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
