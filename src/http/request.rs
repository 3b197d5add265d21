//! # Parsing de la request line HTTP
//! src/http/request.rs
//!
//! Este módulo implementa el parser mínimo que necesita el servidor: solo
//! la primera línea del request. Los headers y el body no se parsean; el
//! dispatcher lee una línea, la valida y cierra la conexión al terminar.
//!
//! ## Formato esperado
//!
//! ```text
//! GET /index.html HTTP/1.1\r\n
//! ```
//!
//! Exactamente tres tokens separados por un espacio simple. Cualquier otra
//! cantidad de tokens es una request malformada (400 Bad Request).

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// La request line no tiene exactamente 3 tokens (METHOD PATH VERSION).
    /// Guarda la cantidad de tokens encontrados.
    InvalidRequestLine(usize),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidRequestLine(found) => {
                write!(f, "Invalid request line: expected 3 tokens, found {}", found)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// La primera línea de un request, ya separada en sus tres tokens.
///
/// El método se conserva como string opaco: un método desconocido no es un
/// error de parsing, simplemente no va a resolver a ningún handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    path: String,
    version: String,
}

impl RequestLine {
    /// Parsea una request line.
    ///
    /// Acepta la línea con o sin terminador (`\r\n` o `\n` al final); los
    /// tokens se separan por espacio simple y los tokens vacíos al final se
    /// descartan. Eso significa que `"GET /x "` tiene dos tokens (malformada)
    /// y `"GET  /x HTTP/1.1"` tiene cuatro (también malformada).
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use file_server::http::RequestLine;
    ///
    /// let line = RequestLine::parse("GET /index.html HTTP/1.1\r\n").unwrap();
    /// assert_eq!(line.method(), "GET");
    /// assert_eq!(line.path(), "/index.html");
    /// assert_eq!(line.version(), "HTTP/1.1");
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim_end_matches('\n').trim_end_matches('\r');

        let mut tokens: Vec<&str> = line.split(' ').collect();
        while tokens.last() == Some(&"") {
            tokens.pop();
        }

        // Debe tener exactamente 3 tokens: METHOD PATH VERSION
        if tokens.len() != 3 {
            return Err(ParseError::InvalidRequestLine(tokens.len()));
        }

        Ok(RequestLine {
            method: tokens[0].to_string(),
            path: tokens[1].to_string(),
            version: tokens[2].to_string(),
        })
    }

    /// Obtiene el método (token 1)
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Obtiene el path (token 2)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión del protocolo (token 3)
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Representa un request ya validado, listo para entregarse a un handler.
///
/// Es inmutable después de construido: cada conexión crea el suyo y lo
/// descarta al cerrar. Los campos `raw_headers` y `raw_body` existen en el
/// modelo de datos pero el dispatcher no los llena (no lee más allá de la
/// request line); quedan disponibles para construir requests en tests o
/// desde otros frontends.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    path: String,
    raw_headers: Option<String>,
    raw_body: Option<String>,
}

impl Request {
    /// Crea un request con método y path, sin headers ni body.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use file_server::http::Request;
    ///
    /// let request = Request::new("GET", "/index.html");
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.path(), "/index.html");
    /// assert!(request.raw_headers().is_none());
    /// ```
    pub fn new(method: &str, path: &str) -> Self {
        Request {
            method: method.to_string(),
            path: path.to_string(),
            raw_headers: None,
            raw_body: None,
        }
    }

    /// Agrega el bloque de headers sin parsear (builder)
    pub fn with_raw_headers(mut self, raw_headers: &str) -> Self {
        self.raw_headers = Some(raw_headers.to_string());
        self
    }

    /// Agrega el body sin parsear (builder)
    pub fn with_raw_body(mut self, raw_body: &str) -> Self {
        self.raw_body = Some(raw_body.to_string());
        self
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método del request
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene el bloque de headers crudo, si existe
    pub fn raw_headers(&self) -> Option<&str> {
        self.raw_headers.as_deref()
    }

    /// Obtiene el body crudo, si existe
    pub fn raw_body(&self) -> Option<&str> {
        self.raw_body.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let line = RequestLine::parse("GET /index.html HTTP/1.1").unwrap();

        assert_eq!(line.method(), "GET");
        assert_eq!(line.path(), "/index.html");
        assert_eq!(line.version(), "HTTP/1.1");
    }

    #[test]
    fn test_parse_strips_crlf() {
        let line = RequestLine::parse("GET /index.html HTTP/1.1\r\n").unwrap();

        assert_eq!(line.path(), "/index.html");
        assert_eq!(line.version(), "HTTP/1.1");
    }

    #[test]
    fn test_parse_strips_bare_lf() {
        let line = RequestLine::parse("GET /index.html HTTP/1.1\n").unwrap();

        assert_eq!(line.version(), "HTTP/1.1");
    }

    #[test]
    fn test_parse_one_token() {
        let result = RequestLine::parse("BADLINE");

        assert_eq!(result, Err(ParseError::InvalidRequestLine(1)));
    }

    #[test]
    fn test_parse_two_tokens() {
        let result = RequestLine::parse("GET /index.html");

        assert_eq!(result, Err(ParseError::InvalidRequestLine(2)));
    }

    #[test]
    fn test_parse_four_tokens() {
        let result = RequestLine::parse("GET /index.html HTTP/1.1 extra");

        assert_eq!(result, Err(ParseError::InvalidRequestLine(4)));
    }

    #[test]
    fn test_parse_empty_line() {
        let result = RequestLine::parse("");

        assert_eq!(result, Err(ParseError::InvalidRequestLine(0)));
    }

    #[test]
    fn test_parse_crlf_only() {
        let result = RequestLine::parse("\r\n");

        assert_eq!(result, Err(ParseError::InvalidRequestLine(0)));
    }

    #[test]
    fn test_trailing_space_reduces_token_count() {
        // El espacio final produce un token vacío que se descarta
        let result = RequestLine::parse("GET /index.html \r\n");

        assert_eq!(result, Err(ParseError::InvalidRequestLine(2)));
    }

    #[test]
    fn test_double_space_is_malformed() {
        // Un espacio doble interno produce un token vacío en el medio
        let result = RequestLine::parse("GET  /index.html HTTP/1.1");

        assert_eq!(result, Err(ParseError::InvalidRequestLine(4)));
    }

    #[test]
    fn test_leading_space_keeps_three_tokens() {
        // Con espacio inicial el primer token queda vacío: sigue siendo una
        // línea de 3 tokens, pero ningún handler se registra con método ""
        let line = RequestLine::parse(" /index.html HTTP/1.1").unwrap();

        assert_eq!(line.method(), "");
        assert_eq!(line.path(), "/index.html");
    }

    #[test]
    fn test_unknown_method_is_not_a_parse_error() {
        let line = RequestLine::parse("BREW /index.html HTTP/1.1").unwrap();

        assert_eq!(line.method(), "BREW");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::InvalidRequestLine(2);

        assert_eq!(
            err.to_string(),
            "Invalid request line: expected 3 tokens, found 2"
        );
    }

    #[test]
    fn test_request_new() {
        let request = Request::new("GET", "/forms.html");

        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/forms.html");
        assert!(request.raw_headers().is_none());
        assert!(request.raw_body().is_none());
    }

    #[test]
    fn test_request_builder() {
        let request = Request::new("POST", "/forms.html")
            .with_raw_headers("Host: localhost\r\nContent-Length: 4")
            .with_raw_body("a=1b");

        assert_eq!(request.raw_headers(), Some("Host: localhost\r\nContent-Length: 4"));
        assert_eq!(request.raw_body(), Some("a=1b"));
    }
}
