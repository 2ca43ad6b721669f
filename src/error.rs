//! # Errores del Servidor
//! src/error.rs
//!
//! Taxonomía de errores agrupada por alcance:
//!
//! - [`StartupError`]: fallos antes de empezar a servir. Son fatales, el
//!   proceso termina con código 1.
//! - [`ConnectionError`]: fallos locales a una conexión. Se registran en el
//!   log y la conexión se cierra sin más acciones.
//!
//! Los errores de `accept` y de despacho (no poder crear el thread) no tienen
//! tipo propio: el loop de aceptación los registra y continúa.

use crate::http::request::ParseError;
use crate::http::scanner::ScanError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errores fatales durante el arranque
#[derive(Debug, Error)]
pub enum StartupError {
    /// Configuración inválida (ver `Config::validate`)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No se pudo crear el socket de escucha
    #[error("socket: {0}")]
    Socket(#[source] io::Error),

    /// La dirección no es válida
    #[error("invalid listen address '{0}'")]
    Address(String),

    #[error("bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("listen: {0}")]
    Listen(#[source] io::Error),

    /// Falló el cambio de directorio de trabajo
    #[error("chdir {}: {source}", .path.display())]
    ChangeDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errores locales a una conexión
///
/// Ninguno de estos produce bytes de respuesta: la conexión simplemente se
/// cierra.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// El peer cerró antes de completar el bloque de headers
    #[error("peer closed the connection before the end of headers")]
    PeerClosed,

    #[error("read: {0}")]
    Read(#[source] io::Error),

    /// El bloque de headers no cabe en el buffer de lectura
    #[error("request exceeds the {capacity}-byte read buffer")]
    RequestTooLarge { capacity: usize },

    /// Request malformado o no soportado (se descarta en silencio)
    #[error(transparent)]
    Protocol(#[from] ParseError),

    /// El archivo se abrió pero no se pudo obtener su tamaño
    #[error("fstat: {0}")]
    Metadata(#[source] io::Error),

    #[error("write: {0}")]
    Write(#[source] io::Error),

    #[error("sendfile: {0}")]
    Transfer(#[source] io::Error),
}

impl ConnectionError {
    /// Indica si el error es un request rechazado por el protocolo
    pub fn is_protocol(&self) -> bool {
        matches!(self, ConnectionError::Protocol(_))
    }
}

impl From<ScanError> for ConnectionError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Closed => ConnectionError::PeerClosed,
            ScanError::Io(e) => ConnectionError::Read(e),
            ScanError::CapacityExceeded { capacity } => ConnectionError::RequestTooLarge { capacity },
        }
    }
}
