//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta contadores del servidor en tiempo real. Cada conexión termina
//! en exactamente uno de los resultados posibles (servida, bad request,
//! not found, descartada sin respuesta, error de I/O) y el dispatcher
//! registra ese resultado acá.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Collector de métricas thread-safe
///
/// Clonarlo es barato: todos los clones comparten los mismos contadores.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
struct MetricsData {
    /// Conexiones aceptadas en total
    total_connections: u64,

    /// Respuestas completadas por un handler
    served: u64,

    /// Request lines malformadas respondidas con la línea de Bad Request
    bad_requests: u64,

    /// Paths fuera del allow-list respondidos con la línea de Not Found
    not_found: u64,

    /// Conexiones cerradas sin escribir bytes (path permitido sin handler)
    dropped: u64,

    /// Fallas de I/O leyendo o escribiendo una conexión
    io_errors: u64,

    /// Requests por path (solo requests que pasaron el parsing)
    requests_per_path: HashMap<String, u64>,

    /// Conexiones en vuelo (aceptadas y todavía no cerradas)
    active_connections: u64,
}

impl MetricsCollector {
    /// Crea un collector con todos los contadores en cero
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                total_connections: 0,
                served: 0,
                bad_requests: 0,
                not_found: 0,
                dropped: 0,
                io_errors: 0,
                requests_per_path: HashMap::new(),
                active_connections: 0,
            })),
            start_time: Instant::now(),
        }
    }

    /// Registra una conexión aceptada (y en vuelo)
    pub fn connection_opened(&self) {
        let mut data = self.inner.lock().unwrap();
        data.total_connections += 1;
        data.active_connections += 1;
    }

    /// Registra el cierre de una conexión en vuelo
    pub fn connection_closed(&self) {
        let mut data = self.inner.lock().unwrap();
        if data.active_connections > 0 {
            data.active_connections -= 1;
        }
    }

    /// Registra una respuesta completada por un handler
    pub fn record_served(&self, path: &str) {
        let mut data = self.inner.lock().unwrap();
        data.served += 1;
        *data.requests_per_path.entry(path.to_string()).or_insert(0) += 1;
    }

    /// Registra una request line malformada
    pub fn record_bad_request(&self) {
        let mut data = self.inner.lock().unwrap();
        data.bad_requests += 1;
    }

    /// Registra un path rechazado por el allow-list
    pub fn record_not_found(&self, path: &str) {
        let mut data = self.inner.lock().unwrap();
        data.not_found += 1;
        *data.requests_per_path.entry(path.to_string()).or_insert(0) += 1;
    }

    /// Registra una conexión descartada sin respuesta (sin handler)
    pub fn record_dropped(&self, path: &str) {
        let mut data = self.inner.lock().unwrap();
        data.dropped += 1;
        *data.requests_per_path.entry(path.to_string()).or_insert(0) += 1;
    }

    /// Registra una falla de I/O sobre una conexión
    pub fn record_io_error(&self) {
        let mut data = self.inner.lock().unwrap();
        data.io_errors += 1;
    }

    /// Obtiene la cantidad de conexiones en vuelo
    pub fn active_connections(&self) -> u64 {
        let data = self.inner.lock().unwrap();
        data.active_connections
    }

    /// Obtiene un snapshot serializable de las métricas
    pub fn snapshot(&self) -> MetricsSnapshot {
        let data = self.inner.lock().unwrap();

        let requests_per_path: BTreeMap<String, u64> = data
            .requests_per_path
            .iter()
            .map(|(path, count)| (path.clone(), *count))
            .collect();

        MetricsSnapshot {
            uptime_seconds: self.start_time.elapsed().as_secs(),
            total_connections: data.total_connections,
            active_connections: data.active_connections,
            served: data.served,
            bad_requests: data.bad_requests,
            not_found: data.not_found,
            dropped: data.dropped,
            io_errors: data.io_errors,
            requests_per_path,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot de métricas (lo que expone el handler de /status como JSON)
///
/// Usa un `BTreeMap` para los paths para que el JSON salga con las claves
/// siempre en el mismo orden.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_seconds: u64,
    pub total_connections: u64,
    pub active_connections: u64,
    pub served: u64,
    pub bad_requests: u64,
    pub not_found: u64,
    pub dropped: u64,
    pub io_errors: u64,
    pub requests_per_path: BTreeMap<String, u64>,
}
