//! # File Server
//! src/lib.rs
//!
//! Servidor de archivos estáticos HTTP/1.1 con pool fijo de workers.
//! Atiende un request por conexión: lee la request line, la valida contra
//! un allow-list de paths y despacha al handler registrado para el par
//! (método, path).
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `config`: Carga y validación del archivo properties
//! - `http`: Request line, headers de respuesta y template `{time}`
//! - `router`: Tabla (método, path) a handler
//! - `handlers`: Fábricas de handlers (archivo estático, página dinámica, status)
//! - `server`: Loop de accept, pool de workers y dispatcher por conexión
//! - `metrics`: Contadores del resultado de cada conexión
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use file_server::config::Config;
//! use file_server::handlers;
//! use file_server::metrics::MetricsCollector;
//! use file_server::router::Router;
//! use file_server::server::Server;
//! use std::sync::Arc;
//!
//! let config = Config::from_file("config.properties").expect("configuración inválida");
//! let metrics = Arc::new(MetricsCollector::new());
//!
//! let mut router = Router::new();
//! router.register("GET", "/index.html", handlers::static_file("public"));
//!
//! let mut server = Server::new(config, router, metrics);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod handlers;
pub mod http;
pub mod metrics;
pub mod router;
pub mod server;
