//! # Escritura de Respuestas HTTP
//! src/http/response.rs
//!
//! Cada conexión recibe exactamente una de estas dos respuestas:
//!
//! ```text
//! HTTP/1.<m> 404 Not Found\r\n
//! Connection: Close\r\n
//! \r\n
//! ```
//!
//! ```text
//! HTTP/1.<m> 200 OK\r\n
//! Connection: Close\r\n
//! Content-Length: <N>\r\n
//! \r\n
//! <N bytes del archivo>
//! ```
//!
//! La versión se devuelve tal como vino en el request. Los headers se envían
//! en dos bloques (status + `Connection`, luego `Content-Length`); el body lo
//! envía `files::transfer`.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use file_server::http::{Response, StatusCode};
//! use file_server::http::request::Version;
//!
//! let response = Response::not_found(Version::HTTP_10);
//! assert_eq!(response.status(), StatusCode::NotFound);
//! assert_eq!(
//!     response.status_block(),
//!     b"HTTP/1.0 404 Not Found\r\nConnection: Close\r\n\r\n"
//! );
//! ```

use super::request::Version;
use super::StatusCode;
use std::io::{self, Write};

/// Respuesta a enviar por una conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    version: Version,
    status: StatusCode,

    /// `Some` solo para respuestas con body
    content_length: Option<u64>,
}

impl Response {
    /// 200 OK con un body de `size` bytes
    pub fn ok(version: Version, size: u64) -> Self {
        Self {
            version,
            status: StatusCode::Ok,
            content_length: Some(size),
        }
    }

    /// 404 Not Found, sin body ni `Content-Length`
    pub fn not_found(version: Version) -> Self {
        Self {
            version,
            status: StatusCode::NotFound,
            content_length: None,
        }
    }

    /// Status line + `Connection: Close`
    ///
    /// Si la respuesta no tiene body, incluye también la línea vacía final.
    pub fn status_block(&self) -> Vec<u8> {
        let terminator = if self.has_body() { "" } else { "\r\n" };
        format!(
            "{} {}\r\nConnection: Close\r\n{}",
            self.version, self.status, terminator
        )
        .into_bytes()
    }

    /// `Content-Length` + línea vacía (solo respuestas con body)
    pub fn length_block(&self) -> Option<Vec<u8>> {
        self.content_length
            .map(|len| format!("Content-Length: {}\r\n\r\n", len).into_bytes())
    }

    /// Escribe el bloque de headers completo
    ///
    /// Cada bloque se transmite entero: `write_all` reintenta las escrituras
    /// parciales y aborta ante un error real.
    pub fn write_head<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.status_block())?;
        if let Some(block) = self.length_block() {
            out.write_all(&block)?;
        }
        Ok(())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn has_body(&self) -> bool {
        self.content_length.is_some()
    }
}
