//! # Construcción de Respuestas HTTP
//!
//! Este módulo proporciona las funciones puras con las que los handlers y el
//! dispatcher arman sus respuestas. No hay un tipo `Response`: cada handler
//! escribe directo al socket, así que lo único que se necesita es producir
//! el bloque de status line + headers con el framing exacto.
//!
//! ## Formato de una respuesta exitosa
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
//! El orden de los headers es fijo. Si el resolver de MIME no conoce la
//! extensión, la línea `Content-Type` se omite completa.
//!
//! ## Formato de una respuesta de error
//!
//! ```text
//! HTTP/1.1 404 Not Found\r\n
//! Content-Length: 0\r\n
//! Connection: close\r\n
//! \r\n
//! ```
//!
//! La status line del error viene tal cual de la configuración
//! (`server.response.fileNotFound`, `server.response.badRequest`).

/// Construye el bloque de status line + headers para una respuesta 200.
///
/// `mime_type` es el resultado del resolver de MIME: con `None` la línea
/// `Content-Type` no se emite. `content_length` es el largo exacto del body
/// que el caller va a escribir a continuación.
///
/// # Ejemplo
///
/// ```
/// use file_server::http::success_header;
///
/// let header = success_header(Some("text/html"), 42);
/// assert_eq!(
///     header,
///     "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 42\r\nConnection: close\r\n\r\n"
/// );
/// ```
pub fn success_header(mime_type: Option<&str>, content_length: u64) -> String {
    let mut header = String::from("HTTP/1.1 200 OK\r\n");

    if let Some(mime) = mime_type {
        header.push_str("Content-Type: ");
        header.push_str(mime);
        header.push_str("\r\n");
    }

    header.push_str(&format!("Content-Length: {}\r\n", content_length));
    header.push_str("Connection: close\r\n\r\n");

    header
}

/// Construye una respuesta de error completa (headers sin body).
///
/// `status_line` es la parte después de `HTTP/1.1 `, tal cual viene de la
/// configuración (ej: `"404 Not Found"`). El body siempre es vacío, por eso
/// `Content-Length: 0`.
///
/// # Ejemplo
///
/// ```
/// use file_server::http::error_header;
///
/// let header = error_header("404 Not Found");
/// assert_eq!(
///     header,
///     "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
/// );
/// ```
pub fn error_header(status_line: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status_line
    )
}

/// Reemplaza placeholders literales en un template y retorna los bytes.
///
/// Es un reemplazo de substrings en una sola pasada por par, no un lenguaje
/// de templates: cada `(placeholder, valor)` se sustituye en todas sus
/// apariciones. La página dinámica usa un único par `("{time}", timestamp)`,
/// con el timestamp capturado una sola vez por el caller.
///
/// # Ejemplo
///
/// ```
/// use file_server::http::render_template;
///
/// let html = "<p>Hora del servidor: {time}</p>";
/// let rendered = render_template(html, &[("{time}", "2024-03-01T12:00:00")]);
/// assert_eq!(rendered, b"<p>Hora del servidor: 2024-03-01T12:00:00</p>");
/// ```
pub fn render_template(template: &str, substitutions: &[(&str, &str)]) -> Vec<u8> {
    let mut rendered = template.to_string();

    for (placeholder, value) in substitutions {
        rendered = rendered.replace(placeholder, value);
    }

    rendered.into_bytes()
}
