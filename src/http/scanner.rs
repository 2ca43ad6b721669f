//! # Lector de Líneas
//! src/http/scanner.rs
//!
//! Acumula bytes de un stream en un buffer de capacidad fija y entrega las
//! líneas delimitadas por `\n` (quitando un `\r` inmediatamente anterior).
//!
//! ```text
//! buffer: [ consumido | pendiente de escanear | libre ]
//!         0        consumed               filled    capacity
//! ```
//!
//! Solo se hace un `read` bloqueante cuando no queda ninguna línea completa
//! en la zona pendiente. El buffer nunca crece: si se llena antes de
//! encontrar el fin de headers el resultado es [`ScanError::CapacityExceeded`].

use std::io::{self, Read};

/// Capacidad por defecto del buffer de lectura (request line + headers)
pub const DEFAULT_CAPACITY: usize = 1024;

/// Razones por las que no se pudo obtener otra línea
#[derive(Debug)]
pub enum ScanError {
    /// El peer cerró la conexión (read devolvió 0)
    Closed,

    /// Error de lectura del socket (incluye timeouts)
    Io(io::Error),

    /// El buffer se llenó sin encontrar un terminador
    CapacityExceeded { capacity: usize },
}

/// Lector de líneas sobre cualquier stream de bytes
pub struct LineScanner<R> {
    reader: R,
    buffer: Box<[u8]>,
    /// Bytes ya entregados como líneas
    consumed: usize,
    /// Bytes leídos del stream
    filled: usize,
}

impl<R: Read> LineScanner<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buffer: vec![0u8; capacity].into_boxed_slice(),
            consumed: 0,
            filled: 0,
        }
    }

    /// Capacidad fija del buffer
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Retorna la siguiente línea sin su terminador
    ///
    /// La línea se toma prestada del buffer interno y no se transforma
    /// (se preservan mayúsculas y minúsculas).
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::http::scanner::LineScanner;
    ///
    /// let mut scanner = LineScanner::new(&b"GET / HTTP/1.0\r\n\r\n"[..]);
    /// assert_eq!(scanner.next_line().unwrap(), b"GET / HTTP/1.0");
    /// assert_eq!(scanner.next_line().unwrap(), b"");
    /// ```
    pub fn next_line(&mut self) -> Result<&[u8], ScanError> {
        loop {
            let pending = &self.buffer[self.consumed..self.filled];

            if let Some(pos) = pending.iter().position(|&b| b == b'\n') {
                let start = self.consumed;
                let mut end = start + pos;
                self.consumed = end + 1;

                if end > start && self.buffer[end - 1] == b'\r' {
                    end -= 1;
                }
                return Ok(&self.buffer[start..end]);
            }

            if self.filled == self.buffer.len() {
                return Err(ScanError::CapacityExceeded {
                    capacity: self.buffer.len(),
                });
            }

            match self.reader.read(&mut self.buffer[self.filled..]) {
                Ok(0) => return Err(ScanError::Closed),
                Ok(n) => self.filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ScanError::Io(e)),
            }
        }
    }

    /// Devuelve el stream subyacente
    pub fn into_inner(self) -> R {
        self.reader
    }
}
