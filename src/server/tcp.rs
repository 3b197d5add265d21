//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementacion del servidor TCP que atiende las conexiones con un pool
//! fijo de workers. El hilo principal solo acepta y encola; cada worker
//! procesa una conexión completa: lee la request line, la valida contra el
//! allow-list, resuelve el handler y cierra la conexión.
//!
//! Cada conexión atiende a lo sumo un request. El dispatcher solo escribe
//! bytes en los dos caminos de error con respuesta (Bad Request y Not
//! Found); en el camino exitoso el que escribe es el handler.

use crate::config::Config;
use crate::http::{error_header, Request, RequestLine};
use crate::metrics::MetricsCollector;
use crate::router::Router;
use crate::server::pool::WorkerPool;
use socket2::{Domain, Protocol, Socket, Type};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Instant;

/// Errores fatales de arranque del servidor
#[derive(Debug)]
pub enum ServerError {
    /// No hay ningún handler registrado: el servidor nunca respondería nada
    NoHandlers,

    /// No se pudo crear el socket de escucha
    Bind(io::Error),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::NoHandlers => write!(f, "No handlers registered, refusing to start"),
            ServerError::Bind(e) => write!(f, "Cannot bind listening socket: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<io::Error> for ServerError {
    fn from(e: io::Error) -> Self {
        ServerError::Bind(e)
    }
}

/// Servidor HTTP concurrente con pool de workers y métricas
pub struct Server {
    config: Arc<Config>,
    router: Arc<Router>,
    metrics: Arc<MetricsCollector>,
    listener: Option<TcpListener>,
}

impl Server {
    /// Crea el servidor con su configuración, el router ya poblado y el
    /// collector de métricas compartido con los handlers.
    ///
    /// No hace ningún I/O: el socket se crea recién en `bind`/`run`.
    pub fn new(config: Config, router: Router, metrics: Arc<MetricsCollector>) -> Self {
        Self {
            config: Arc::new(config),
            router: Arc::new(router),
            metrics,
            listener: None,
        }
    }

    /// Crea el socket de escucha y lo deja listo para aceptar.
    ///
    /// Habilita SO_REUSEADDR antes del bind para que un proceso reiniciado
    /// pueda volver a tomar el puerto aunque el socket anterior siga en
    /// TIME_WAIT. Retorna la dirección local real, útil con puerto 0
    /// (efímero) en los tests.
    pub fn bind(&mut self) -> Result<SocketAddr, ServerError> {
        let address = SocketAddr::from(([0, 0, 0, 0], self.config.port));

        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&address.into())?;
        socket.listen(128)?;

        let listener: TcpListener = socket.into();
        let local_addr = listener.local_addr().map_err(ServerError::Bind)?;
        self.listener = Some(listener);

        Ok(local_addr)
    }

    /// Obtiene la dirección local del socket de escucha, si ya existe
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Arranca el servidor: valida el router, crea el socket si hace falta
    /// y entra al loop de accept. No retorna salvo error fatal.
    pub fn run(&mut self) -> Result<(), ServerError> {
        // Un servidor sin handlers nunca va a responder nada: mejor
        // negarse a arrancar antes de tomar el puerto
        if self.router.is_empty() {
            return Err(ServerError::NoHandlers);
        }

        if self.listener.is_none() {
            println!("[*] Iniciando servidor en {}", self.config.address());
            self.bind()?;
        }
        let listener = self.listener.as_ref().unwrap();

        if let Ok(addr) = listener.local_addr() {
            println!("[+] Servidor escuchando en {}", addr);
        }
        println!("[*] Pool de workers: {} threads", self.config.workers);
        println!("[*] Handlers registrados: {}\n", self.router.len());

        let pool = WorkerPool::new(self.config.workers);

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let config = Arc::clone(&self.config);
                    let metrics = Arc::clone(&self.metrics);

                    let peer_addr = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "desconocido".to_string());
                    println!(" ✅ Nueva conexión desde {} (a la cola del pool)", peer_addr);

                    metrics.connection_opened();

                    pool.execute(move || {
                        if let Err(e) =
                            Self::handle_connection(stream, router, config, Arc::clone(&metrics))
                        {
                            metrics.record_io_error();
                            eprintln!("   ❌ Error en la conexión: {}", e);
                        }
                        metrics.connection_closed();
                    });
                }
                Err(e) => {
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Procesa una conexión completa: un request, una respuesta, cerrar.
    ///
    /// Los errores de I/O se propagan al caller (el closure del worker los
    /// reporta); nunca tiran abajo al worker ni al loop de accept.
    fn handle_connection(
        stream: TcpStream,
        router: Arc<Router>,
        config: Arc<Config>,
        metrics: Arc<MetricsCollector>,
    ) -> io::Result<()> {
        let start = Instant::now();
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "desconocido".to_string());

        let mut reader = BufReader::new(&stream);
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line)?;

        // El peer cerró sin mandar nada: no hay request que responder
        if bytes_read == 0 {
            println!("   ⚪ [{}] Conexión cerrada sin datos", peer);
            return Ok(());
        }

        let request_line = match RequestLine::parse(&line) {
            Ok(request_line) => request_line,
            Err(e) => {
                println!("   ❌ [{}] {}", peer, e);
                write_error(&stream, &config.bad_request_status)?;
                metrics.record_bad_request();
                println!(
                    "   📨 [{}] → {} ({:.2}ms)",
                    peer,
                    config.bad_request_status,
                    elapsed_ms(start)
                );
                return Ok(());
            }
        };

        let method = request_line.method();
        let path = request_line.path();

        // Gate del allow-list: un path que no está configurado se rechaza
        // antes de mirar el router, sin importar el método
        if !config.allows(path) {
            write_error(&stream, &config.not_found_status)?;
            metrics.record_not_found(path);
            println!(
                "   📨 [{}] {} {} → {} ({:.2}ms)",
                peer,
                method,
                path,
                config.not_found_status,
                elapsed_ms(start)
            );
            return Ok(());
        }

        let request = Request::new(method, path);

        match router.resolve(request.method(), request.path()) {
            Some(handler) => {
                let mut out = BufWriter::new(&stream);
                handler(&request, &mut out)?;
                metrics.record_served(request.path());
                println!(
                    "   ✅ [{}] {} {} completado ({:.2}ms)",
                    peer,
                    request.method(),
                    request.path(),
                    elapsed_ms(start)
                );
            }
            None => {
                // Path permitido pero sin handler: se cierra sin escribir
                // ni un byte, solo queda el registro en el log
                metrics.record_dropped(request.path());
                eprintln!(
                    "   ⚠️  [{}] {} {} permitido pero sin handler, se cierra sin respuesta",
                    peer,
                    request.method(),
                    request.path()
                );
            }
        }

        Ok(())
    }
}

/// Escribe una respuesta de error con la status line indicada
fn write_error(stream: &TcpStream, status_line: &str) -> io::Result<()> {
    let mut out = BufWriter::new(stream);
    out.write_all(error_header(status_line).as_bytes())?;
    out.flush()
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
