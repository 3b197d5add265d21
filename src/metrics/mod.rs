//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Este módulo implementa la recolección de métricas del servidor:
//! - Contadores por resultado (servida, bad request, not found, descartada)
//! - Requests por path
//! - Conexiones en vuelo
//!
//! El handler de `/status` expone el snapshot como JSON.

pub mod collector;

pub use collector::{MetricsCollector, MetricsSnapshot};
