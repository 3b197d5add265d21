//! Tests de integración del servidor completo
//! tests/integration_test.rs
//!
//! Cada test levanta el servidor real en un puerto efímero (puerto 0) con
//! un document root temporal y el mismo wiring de handlers que usa el
//! binario, y verifica las respuestas byte a byte desde clientes TCP.

use file_server::config::Config;
use file_server::handlers;
use file_server::metrics::MetricsCollector;
use file_server::router::Router;
use file_server::server::Server;
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Página estática de la demo, de exactamente 42 bytes
const INDEX_HTML: &str = "<html><body>Hola al servidor</body></html>";

const FORMS_HTML: &str =
    "<html><body><form action=\"/submit\"><input name=\"q\"/></form></body></html>";

const CLASSIC_HTML: &str = "<html><body><p>Hora del servidor: {time}</p></body></html>";

/// Response completa esperada para GET /index.html
const INDEX_RESPONSE: &[u8] =
    b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 42\r\nConnection: close\r\n\r\n<html><body>Hola al servidor</body></html>";

/// Servidor corriendo en background sobre un document root temporal
struct TestServer {
    addr: SocketAddr,
    root: PathBuf,
    metrics: Arc<MetricsCollector>,
}

impl TestServer {
    /// Arranca el servidor con el wiring del binario: dos páginas
    /// estáticas, la página dinámica, /status y /events.html permitido
    /// pero sin handler. El `tag` separa los document roots de los tests
    /// que corren en paralelo.
    fn start(tag: &str, workers: usize) -> TestServer {
        let root = std::env::temp_dir().join(format!(
            "file_server_it_{}_{}",
            tag,
            std::process::id()
        ));
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("index.html"), INDEX_HTML).unwrap();
        fs::write(root.join("forms.html"), FORMS_HTML).unwrap();
        fs::write(root.join("classic.html"), CLASSIC_HTML).unwrap();

        let mut config = Config::default();
        config.workers = workers;
        config.allowed_paths = [
            "/index.html",
            "/forms.html",
            "/classic.html",
            "/status",
            "/events.html",
        ]
        .iter()
        .map(|p| p.to_string())
        .collect();

        let metrics = Arc::new(MetricsCollector::new());

        let mut router = Router::new();
        router.register("GET", "/index.html", handlers::static_file(&root));
        router.register("GET", "/forms.html", handlers::static_file(&root));
        router.register("GET", "/classic.html", handlers::dynamic_page(&root));
        router.register("GET", "/status", handlers::server_status(Arc::clone(&metrics)));

        let mut server = Server::new(config, router, Arc::clone(&metrics));
        let addr = server.bind().expect("bind del puerto efímero");

        thread::spawn(move || {
            let _ = server.run();
        });

        TestServer { addr, root, metrics }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// Helper: envía bytes crudos y retorna la response completa
fn send_request(addr: SocketAddr, raw: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(addr)?;

    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    stream.set_write_timeout(Some(Duration::from_secs(5)))?;

    stream.write_all(raw.as_bytes())?;
    stream.flush()?;

    // El servidor cierra después de responder; leer hasta EOF
    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;

    Ok(response)
}

/// Helper: GET bien formado contra un path
fn get(addr: SocketAddr, path: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    send_request(addr, &format!("GET {} HTTP/1.1\r\n\r\n", path))
}

/// Helper: separa el body de una response HTTP
fn extract_body(response: &str) -> &str {
    if let Some(pos) = response.find("\r\n\r\n") {
        &response[pos + 4..]
    } else {
        ""
    }
}

#[test]
fn test_static_file_exact_response() {
    let server = TestServer::start("estatico", 2);

    let response = get(server.addr, "/index.html").expect("Failed to send request");

    assert_eq!(response, INDEX_RESPONSE, "Response completa byte a byte");
}

#[test]
fn test_forms_page_is_served() {
    let server = TestServer::start("forms", 2);

    let response = get(server.addr, "/forms.html").expect("Failed to send request");
    let text = String::from_utf8(response).unwrap();

    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.contains("Content-Type: text/html\r\n"));
    assert_eq!(extract_body(&text), FORMS_HTML);
}

#[test]
fn test_dynamic_page_renders_time() {
    let server = TestServer::start("dinamico", 2);

    let response = get(server.addr, "/classic.html").expect("Failed to send request");
    let text = String::from_utf8(response).unwrap();

    assert!(text.starts_with("HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n"));

    let body = extract_body(&text);
    assert!(!body.contains("{time}"), "El placeholder tiene que estar sustituido");
    assert!(body.starts_with("<html><body><p>Hora del servidor: "));

    // El Content-Length corresponde al contenido ya renderizado, no al template
    let content_length: usize = text
        .lines()
        .find_map(|l| l.strip_prefix("Content-Length: "))
        .expect("header Content-Length")
        .trim()
        .parse()
        .unwrap();
    assert_eq!(content_length, body.len());
}

#[test]
fn test_path_outside_allow_list_exact_response() {
    let server = TestServer::start("not_found", 2);

    let response = get(server.addr, "/secreto.html").expect("Failed to send request");

    assert_eq!(
        response,
        b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    );
}

#[test]
fn test_malformed_request_line_is_bad_request() {
    let server = TestServer::start("bad_request", 2);

    let response = send_request(server.addr, "BADLINE\r\n").expect("Failed to send request");
    let text = String::from_utf8(response).unwrap();

    assert!(
        text.starts_with("HTTP/1.1 400 Bad Request\r\n"),
        "Expected 400 Bad Request, got: {}",
        text
    );
    assert!(text.ends_with("\r\n\r\n"), "Una response de error no lleva body");
}

#[test]
fn test_allowed_path_without_handler_gets_nothing() {
    let server = TestServer::start("sin_handler", 2);

    let response = get(server.addr, "/events.html").expect("Failed to send request");

    // Path permitido pero sin handler: el servidor cierra sin escribir
    assert!(
        response.is_empty(),
        "Expected silent close, got: {:?}",
        String::from_utf8_lossy(&response)
    );
}

#[test]
fn test_status_endpoint_reports_traffic() {
    let server = TestServer::start("status", 2);

    get(server.addr, "/index.html").expect("Failed to send request");

    let response = get(server.addr, "/status").expect("Failed to send request");
    let text = String::from_utf8(response).unwrap();

    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.contains("Content-Type: application/json\r\n"));

    let snapshot: serde_json::Value = serde_json::from_str(extract_body(&text)).unwrap();
    assert_eq!(snapshot["served"], 1);
    assert_eq!(snapshot["requests_per_path"]["/index.html"], 1);
}

#[test]
fn test_more_clients_than_workers_all_complete() {
    let server = TestServer::start("concurrencia", 2);

    // Ocho clientes contra dos workers: los que no entran esperan en la
    // cola del pool y todos terminan con la response completa
    let mut clients = Vec::new();
    for _ in 0..8 {
        let addr = server.addr;
        clients.push(thread::spawn(move || get(addr, "/index.html").unwrap()));
    }

    for client in clients {
        let response = client.join().unwrap();
        assert_eq!(response, INDEX_RESPONSE);
    }

    assert_eq!(server.metrics.snapshot().served, 8);
}

#[test]
fn test_server_refuses_to_start_without_handlers() {
    let metrics = Arc::new(MetricsCollector::new());
    let mut server = Server::new(Config::default(), Router::new(), metrics);

    assert!(server.run().is_err());
    // El guard corta antes del bind
    assert!(server.local_addr().is_none());
}

#[test]
fn test_multiple_requests_sequentially() {
    let server = TestServer::start("secuencial", 2);

    for i in 0..5 {
        let response = get(server.addr, "/index.html").expect("Failed to send request");
        assert_eq!(response, INDEX_RESPONSE, "Request {} falló", i);
    }
}
