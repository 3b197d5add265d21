//! # File Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor. Carga el archivo properties indicado por
//! CLI (o `CONFIG_FILE`), arma el router con los handlers del sitio de
//! demo y arranca el servidor. Cualquier problema de configuración es
//! fatal: se reporta y el proceso termina con código 1.

use clap::Parser;
use file_server::config::{Cli, Config};
use file_server::handlers;
use file_server::metrics::MetricsCollector;
use file_server::router::Router;
use file_server::server::Server;
use std::sync::Arc;

/// Directorio con los archivos que sirve el sitio de demo
const DOCUMENT_ROOT: &str = "public";

fn main() {
    println!("=================================");
    println!("  File Server HTTP/1.1");
    println!("  Pool de workers + allow-list");
    println!("=================================\n");

    let cli = Cli::parse();

    // La configuración viene completa del archivo properties; cualquier
    // clave faltante o inválida corta el arranque acá
    let config = match Config::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("💥 Error de configuración ({}): {}", cli.config, e);
            std::process::exit(1);
        }
    };

    config.print_summary();

    let metrics = Arc::new(MetricsCollector::new());

    // El router se arma completo antes de arrancar; después queda
    // congelado detrás del Arc del servidor
    let mut router = Router::new();
    router.register("GET", "/index.html", handlers::static_file(DOCUMENT_ROOT));
    router.register("GET", "/forms.html", handlers::static_file(DOCUMENT_ROOT));
    router.register("GET", "/classic.html", handlers::dynamic_page(DOCUMENT_ROOT));
    router.register("GET", "/status", handlers::server_status(Arc::clone(&metrics)));

    let mut server = Server::new(config, router, metrics);

    // Iniciar el servidor (esto bloquea el thread principal)
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
