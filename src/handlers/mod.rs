//! # Handlers del Servidor
//! src/handlers/mod.rs
//!
//! Fábricas de los handlers que registra el binario:
//! - `static_file`: sirve un archivo del document root tal cual está
//! - `dynamic_page`: sirve un archivo reemplazando el placeholder `{time}`
//! - `server_status`: expone el snapshot de métricas como JSON
//!
//! Cada fábrica captura lo que necesita (document root, métricas) y retorna
//! el closure que el router guarda. El closure escribe la respuesta
//! completa en el sink y hace flush; si el archivo no está o el socket
//! falla, retorna el error de I/O y el dispatcher abandona la conexión.

use crate::http::{render_template, success_header, Request};
use crate::metrics::MetricsCollector;
use chrono::Local;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Placeholder que sustituye la página dinámica
const TIME_PLACEHOLDER: &str = "{time}";

/// Formato del timestamp que reemplaza a `{time}`
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Handler para servir archivos estáticos.
///
/// Resuelve el path del request debajo de `root`, consulta el Content-Type
/// por la extensión y escribe header + bytes del archivo. Si la extensión
/// no se conoce, la respuesta va sin línea `Content-Type`.
///
/// El allow-list del dispatcher garantiza que acá solo llegan paths
/// configurados.
///
/// # Ejemplo
///
/// ```
/// use file_server::handlers;
/// use file_server::router::Router;
///
/// let mut router = Router::new();
/// router.register("GET", "/index.html", handlers::static_file("public"));
/// router.register("GET", "/forms.html", handlers::static_file("public"));
/// ```
pub fn static_file(
    root: impl Into<PathBuf>,
) -> impl Fn(&Request, &mut dyn Write) -> io::Result<()> + Send + Sync + 'static {
    let root = root.into();

    move |req: &Request, out: &mut dyn Write| {
        let file_path = resolve_under_root(&root, req.path());

        let length = fs::metadata(&file_path)?.len();
        let mime = mime_guess::from_path(&file_path)
            .first()
            .map(|m| m.to_string());

        out.write_all(success_header(mime.as_deref(), length).as_bytes())?;

        let mut file = File::open(&file_path)?;
        io::copy(&mut file, out)?;
        out.flush()
    }
}

/// Handler para la página dinámica.
///
/// Lee el archivo como texto, captura el timestamp local una sola vez y
/// sustituye cada aparición de `{time}` antes de escribir la respuesta.
/// El `Content-Length` corresponde al contenido ya renderizado.
pub fn dynamic_page(
    root: impl Into<PathBuf>,
) -> impl Fn(&Request, &mut dyn Write) -> io::Result<()> + Send + Sync + 'static {
    let root = root.into();

    move |req: &Request, out: &mut dyn Write| {
        let file_path = resolve_under_root(&root, req.path());
        let template = fs::read_to_string(&file_path)?;

        // Una sola captura por request; todas las apariciones del
        // placeholder reciben el mismo valor
        let now = Local::now().format(TIME_FORMAT).to_string();
        let body = render_template(&template, &[(TIME_PLACEHOLDER, now.as_str())]);

        let mime = mime_guess::from_path(&file_path)
            .first()
            .map(|m| m.to_string());

        out.write_all(success_header(mime.as_deref(), body.len() as u64).as_bytes())?;
        out.write_all(&body)?;
        out.flush()
    }
}

/// Handler para `/status`: el snapshot de métricas como JSON.
pub fn server_status(
    metrics: Arc<MetricsCollector>,
) -> impl Fn(&Request, &mut dyn Write) -> io::Result<()> + Send + Sync + 'static {
    move |_req: &Request, out: &mut dyn Write| {
        let snapshot = metrics.snapshot();
        let body = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        out.write_all(success_header(Some("application/json"), body.len() as u64).as_bytes())?;
        out.write_all(body.as_bytes())?;
        out.flush()
    }
}

/// Resuelve un path de request debajo del document root.
///
/// El path llega siempre con `/` inicial (es el token 2 de la request
/// line), así que se recorta antes de unirlo.
fn resolve_under_root(root: &Path, request_path: &str) -> PathBuf {
    root.join(request_path.trim_start_matches('/'))
}
