//! MBKM Portal Access Gate Demo
//!
//! Serves the portal's dashboards behind the role-based access gate.

use std::env;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use access_gate_core::http::security::{portal, AccessGate, AccessGateTransform, GateConfig};
use access_gate_test::{configure, AppState};

const CONFIG_ENV: &str = "ACCESS_GATE_CONFIG";
const BIND_ENV: &str = "ACCESS_GATE_BIND";
const DEFAULT_BIND: &str = "127.0.0.1:8080";

fn load_config() -> std::io::Result<GateConfig> {
    match env::var(CONFIG_ENV) {
        Ok(path) => {
            tracing::info!(path = %path, "loading gate configuration");
            GateConfig::from_file(&path)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
        }
        Err(_) => Ok(portal::gate_config()),
    }
}

fn print_startup_info(bind: &str, state: &AppState) {
    println!("=== MBKM Portal Access Gate ===");
    println!();
    println!("Server: http://{}", bind);
    println!();
    println!("Public:");
    for route in portal::PUBLIC_ROUTES {
        println!("  GET  {}", route);
    }
    println!();
    println!("Dashboards:");
    for role in state.gate.route_table().roles() {
        println!("  {:<17} -> {}", role, state.gate.landing().for_role(role));
    }
    println!();
    if state.issuer.is_some() {
        println!("Development sign-in:");
        println!("  curl -i -X POST http://{}/sign-in \\", bind);
        println!("    -H 'Content-Type: application/json' \\");
        println!("    -d '{{\"role\":\"mahasiswa\",\"subject_id\":\"2021001\",\"email\":\"m@ac.id\"}}'");
    } else {
        println!("Signing key unavailable: every credential is rejected.");
        println!("Set ACCESS_GATE_SECRET to enable sign-in.");
    }
    println!();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    let gate = AccessGate::from_config(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    let gate = Arc::new(gate);

    let state = web::Data::new(AppState::new(Arc::clone(&gate), portal::navigation()));
    let bind = env::var(BIND_ENV).unwrap_or_else(|_| DEFAULT_BIND.to_string());

    print_startup_info(&bind, &state);

    HttpServer::new(move || {
        App::new().app_data(state.clone()).service(
            web::scope("")
                .wrap(AccessGateTransform::new(Arc::clone(&gate)))
                .configure(configure),
        )
    })
    .bind(bind.as_str())?
    .run()
    .await
}
