//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el registro que mapea pares (método, path) a
//! handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → bytes al socket
//! ```
//!
//! El match es exacto en los dos niveles: primero el método, después el
//! path. No hay patterns, ni parámetros, ni normalización de slashes. Si
//! falta cualquiera de los dos niveles, `resolve` retorna `None` y es el
//! dispatcher quien decide qué hacer con eso.
//!
//! El router se llena durante el arranque y queda congelado: una vez que el
//! servidor acepta conexiones solo se hacen lecturas concurrentes, nunca
//! registros. Por eso no lleva lock, se comparte detrás de un `Arc`.

use crate::http::Request;
use std::collections::HashMap;
use std::io::{self, Write};

/// Tipo de handler registrado
///
/// Un handler recibe el Request y el sink de salida de la conexión, escribe
/// la respuesta completa (status line, headers, body) y hace flush. El
/// dispatcher cierra la conexión al retornar, haya error o no.
pub type Handler = Box<dyn Fn(&Request, &mut dyn Write) -> io::Result<()> + Send + Sync>;

/// Registro de handlers indexado por método y path
pub struct Router {
    /// Mapa de método → (path → handler)
    routes: HashMap<String, HashMap<String, Handler>>,
}

impl Router {
    /// Crea un router vacío
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Registra un handler bajo (método, path).
    ///
    /// Registrar dos veces el mismo par sobrescribe el handler anterior en
    /// silencio. Nunca falla.
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::router::Router;
    /// use file_server::http::Request;
    /// use std::io::Write;
    ///
    /// let mut router = Router::new();
    /// router.register("GET", "/hello", |_req: &Request, out: &mut dyn Write| {
    ///     out.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
    /// });
    ///
    /// assert!(router.resolve("GET", "/hello").is_some());
    /// ```
    pub fn register<H>(&mut self, method: &str, path: &str, handler: H)
    where
        H: Fn(&Request, &mut dyn Write) -> io::Result<()> + Send + Sync + 'static,
    {
        self.routes
            .entry(method.to_string())
            .or_default()
            .insert(path.to_string(), Box::new(handler));
    }

    /// Busca el handler para (método, path).
    ///
    /// Un método desconocido y un path desconocido producen el mismo
    /// resultado: `None`. El caller no puede distinguir los dos casos, y no
    /// necesita hacerlo.
    pub fn resolve(&self, method: &str, path: &str) -> Option<&Handler> {
        self.routes.get(method)?.get(path)
    }

    /// Cantidad total de handlers registrados
    pub fn len(&self) -> usize {
        self.routes.values().map(|paths| paths.len()).sum()
    }

    /// `true` si no hay ningún handler registrado
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
