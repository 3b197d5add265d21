//! # Módulo HTTP
//!
//! Este módulo implementa el subconjunto mínimo de HTTP/1.1 que el servidor
//! necesita, sin librerías de alto nivel:
//!
//! - Parsing de la request line (y nada más: headers y body no se leen)
//! - Construcción de los bloques de respuesta con framing CRLF exacto
//! - Sustitución de placeholders para la página dinámica
//!
//! ## Formato de Request (lo único que se parsea)
//!
//! ```text
//! GET /index.html HTTP/1.1\r\n
//! ```
//!
//! ## Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 42\r\n
//! Connection: close\r\n
//! \r\n
//! <body>
//! ```
//!
//! Cada conexión atiende un solo request y siempre se cierra después
//! (`Connection: close`), no hay keep-alive.

pub mod request;   // Parsing de la request line
pub mod response;  // Construcción de HTTP responses

// Re-exportamos los tipos principales para facilitar su uso
// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use request::{ParseError, Request, RequestLine};
pub use response::{error_header, render_template, success_header};
