//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo carga la configuración del servidor desde un archivo
//! estilo `.properties` (pares `clave=valor`, comentarios con `#` o `!`).
//! La única superficie CLI es elegir dónde está ese archivo; ningún valor
//! se configura por línea de comandos.
//!
//! ## Claves reconocidas
//!
//! ```text
//! server.port=9999
//! server.threadsValue=4
//! server.response.fileNotFound=404 Not Found
//! server.response.badRequest=400 Bad Request
//! server.paths=/index.html,/classic.html,/forms.html
//! ```
//!
//! Las cinco claves son obligatorias. Si falta alguna o no se puede
//! interpretar, el servidor no arranca.
//!
//! ## Ejemplo de uso
//!
//! ```bash
//! ./file_server --config config.properties
//! CONFIG_FILE=/etc/file_server.properties ./file_server
//! ```

use clap::Parser;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Clave del puerto de escucha
pub const KEY_PORT: &str = "server.port";
/// Clave de la cantidad de workers del pool
pub const KEY_THREADS: &str = "server.threadsValue";
/// Clave de la status line para paths no permitidos
pub const KEY_NOT_FOUND: &str = "server.response.fileNotFound";
/// Clave de la status line para requests malformados
pub const KEY_BAD_REQUEST: &str = "server.response.badRequest";
/// Clave del allow-list de paths (separados por coma)
pub const KEY_PATHS: &str = "server.paths";

/// Argumentos CLI del binario
#[derive(Debug, Parser)]
#[command(name = "file_server")]
#[command(about = "Servidor de archivos estáticos HTTP/1.1 con pool de workers")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Ruta del archivo .properties con la configuración
    #[arg(short, long, default_value = "config.properties", env = "CONFIG_FILE")]
    pub config: String,
}

/// Errores al cargar o validar la configuración
#[derive(Debug)]
pub enum ConfigError {
    /// No se pudo leer el archivo
    Io(std::io::Error),

    /// Una línea no tiene el formato `clave=valor`
    MalformedLine { line_number: usize, content: String },

    /// Falta una clave obligatoria
    MissingKey(&'static str),

    /// El valor de una clave no se pudo interpretar
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Cannot read configuration file: {}", e),
            ConfigError::MalformedLine { line_number, content } => {
                write!(f, "Malformed line {} (expected key=value): {}", line_number, content)
            }
            ConfigError::MissingKey(key) => write!(f, "Missing required key: {}", key),
            ConfigError::InvalidValue { key, value, reason } => {
                write!(f, "Invalid value for {}: '{}' ({})", key, value, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

/// Configuración completa del servidor
///
/// Se construye una vez durante el arranque y después es de solo lectura:
/// ningún componente la modifica mientras el servidor atiende conexiones.
#[derive(Debug, Clone)]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = puerto efímero)
    pub port: u16,

    /// Cantidad de workers del pool
    pub workers: usize,

    /// Status line para paths fuera del allow-list (ej: "404 Not Found")
    pub not_found_status: String,

    /// Status line para requests malformados (ej: "400 Bad Request")
    pub bad_request_status: String,

    /// Allow-list de paths exactos que el servidor considera servir
    pub allowed_paths: HashSet<String>,
}

impl Config {
    /// Carga la configuración desde un archivo `.properties`
    ///
    /// # Errores
    ///
    /// Retorna error si el archivo no se puede leer, si alguna línea no
    /// tiene formato `clave=valor`, si falta una clave obligatoria o si
    /// algún valor no se puede interpretar. Todos son fatales al arranque.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_properties(&text)
    }

    /// Construye la configuración desde el texto de un `.properties`
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use file_server::config::Config;
    ///
    /// let props = "\
    /// ## puerto de escucha
    /// server.port=9999
    /// server.threadsValue=4
    /// server.response.fileNotFound=404 Not Found
    /// server.response.badRequest=400 Bad Request
    /// server.paths=/index.html,/forms.html
    /// ";
    ///
    /// let config = Config::from_properties(props).unwrap();
    /// assert_eq!(config.port, 9999);
    /// assert_eq!(config.workers, 4);
    /// assert!(config.allows("/index.html"));
    /// assert!(!config.allows("/secreto.html"));
    /// ```
    pub fn from_properties(text: &str) -> Result<Self, ConfigError> {
        let props = parse_properties(text)?;

        let port = required(&props, KEY_PORT)?;
        let port: u16 = port.parse().map_err(|_| ConfigError::InvalidValue {
            key: KEY_PORT,
            value: port.to_string(),
            reason: "expected an integer between 0 and 65535".to_string(),
        })?;

        let workers = required(&props, KEY_THREADS)?;
        let workers: usize = workers.parse().map_err(|_| ConfigError::InvalidValue {
            key: KEY_THREADS,
            value: workers.to_string(),
            reason: "expected a positive integer".to_string(),
        })?;

        let not_found_status = required(&props, KEY_NOT_FOUND)?.to_string();
        let bad_request_status = required(&props, KEY_BAD_REQUEST)?.to_string();

        // Los paths vienen separados por coma; se recortan espacios y se
        // descartan entradas vacías
        let allowed_paths: HashSet<String> = required(&props, KEY_PATHS)?
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        let config = Config {
            port,
            workers,
            not_found_status,
            bad_request_status,
            allowed_paths,
        };
        config.validate()?;

        Ok(config)
    }

    /// Valida los valores ya parseados
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidValue {
                key: KEY_THREADS,
                value: "0".to_string(),
                reason: "workers must be >= 1".to_string(),
            });
        }
        if self.not_found_status.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: KEY_NOT_FOUND,
                value: String::new(),
                reason: "status line must not be empty".to_string(),
            });
        }
        if self.bad_request_status.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: KEY_BAD_REQUEST,
                value: String::new(),
                reason: "status line must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// `true` si el path está en el allow-list
    pub fn allows(&self, path: &str) -> bool {
        self.allowed_paths.contains(path)
    }

    /// Obtiene la dirección completa para bind (host:port)
    pub fn address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║                File Server - Configuración                   ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();
        println!("🌐 Red:");
        println!("   Dirección:    {}", self.address());
        println!();
        println!("👷 Workers:");
        println!("   Pool:         {} threads", self.workers);
        println!();
        println!("📨 Respuestas de error:");
        println!("   Not Found:    {}", self.not_found_status);
        println!("   Bad Request:  {}", self.bad_request_status);
        println!();
        println!("📂 Paths permitidos ({}):", self.allowed_paths.len());
        let mut paths: Vec<&String> = self.allowed_paths.iter().collect();
        paths.sort();
        for path in paths {
            println!("   {}", path);
        }
        println!();
        println!("═══════════════════════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto para tests: puerto efímero, pool chico,
    /// status lines estándar, allow-list vacío
    fn default() -> Self {
        Self {
            port: 0,
            workers: 4,
            not_found_status: "404 Not Found".to_string(),
            bad_request_status: "400 Bad Request".to_string(),
            allowed_paths: HashSet::new(),
        }
    }
}

/// Parsea el texto `.properties` en un mapa clave → valor.
///
/// Soporta el subconjunto que este proyecto necesita: `clave=valor` por
/// línea, espacios alrededor del `=` ignorados, comentarios con `#` o `!`,
/// líneas vacías ignoradas. Claves repetidas: gana la última.
fn parse_properties(text: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut props = HashMap::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => {
                props.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => {
                return Err(ConfigError::MalformedLine {
                    line_number: index + 1,
                    content: line.to_string(),
                });
            }
        }
    }

    Ok(props)
}

/// Busca una clave obligatoria en el mapa
fn required<'a>(
    props: &'a HashMap<String, String>,
    key: &'static str,
) -> Result<&'a str, ConfigError> {
    props
        .get(key)
        .map(String::as_str)
        .ok_or(ConfigError::MissingKey(key))
}
