//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en el puerto configurado (con SO_REUSEADDR)
//! 2. Acepta conexiones y las encola en el pool de workers
//! 3. Procesa cada conexión: request line, allow-list, handler
//! 4. Cierra la conexión después de un solo request

pub mod pool;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use pool::WorkerPool;
pub use tcp::{Server, ServerError};
