//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Atiende exactamente un request por conexión:
//!
//! ```text
//! leer líneas → parsear → resolver archivo → headers → body → cerrar
//! ```
//!
//! Si la lectura o el parsing fallan no se envía ningún byte. La respuesta
//! solo se produce cuando método, versión y target ya fueron validados.
//!
//! El `TcpStream` y el archivo son dueños únicos de sus descriptores, así que
//! cada camino de salida (incluidos los `?`) los cierra exactamente una vez:
//! primero el archivo y luego la conexión.

use crate::error::ConnectionError;
use crate::files::{self, Resolver};
use crate::http::scanner::DEFAULT_CAPACITY;
use crate::http::{LineScanner, Request, RequestParser, Response, StatusCode};
use std::io::Read;
use std::net::TcpStream;
use tracing::{debug, info, warn};

/// Resultado de una conexión atendida
#[derive(Debug)]
pub struct Served {
    pub request: Request,
    pub status: StatusCode,
    /// Bytes de body enviados (0 para 404)
    pub body_bytes: u64,
}

/// Configuración inmutable compartida por todos los handlers
#[derive(Debug, Clone)]
pub struct ConnectionHandler {
    resolver: Resolver,
    /// Capacidad del buffer de lectura
    max_request: usize,
}

impl Default for ConnectionHandler {
    fn default() -> Self {
        Self::new(Resolver::default(), DEFAULT_CAPACITY)
    }
}

impl ConnectionHandler {
    pub fn new(resolver: Resolver, max_request: usize) -> Self {
        Self {
            resolver,
            max_request,
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn max_request(&self) -> usize {
        self.max_request
    }

    /// Atiende la conexión y registra el resultado en el log
    pub fn serve(&self, stream: TcpStream) {
        match self.handle(stream) {
            Ok(served) => info!(
                method = served.request.method().as_str(),
                target = %served.request.target_lossy(),
                version = %served.request.version(),
                status = served.status.as_u16(),
                bytes = served.body_bytes,
                "served"
            ),
            Err(ConnectionError::PeerClosed) => debug!("peer closed before end of headers"),
            Err(e) if e.is_protocol() => debug!(error = %e, "request dropped without response"),
            Err(e) => warn!(error = %e, "connection aborted"),
        }
    }

    /// Atiende la conexión; el stream se cierra al retornar
    pub fn handle(&self, mut stream: TcpStream) -> Result<Served, ConnectionError> {
        let request = self.read_request(&mut stream)?;

        let resource = self
            .resolver
            .resolve(request.target())
            .map_err(ConnectionError::Metadata)?;

        let response = match &resource {
            Some(resource) => Response::ok(request.version(), resource.size()),
            None => Response::not_found(request.version()),
        };

        response
            .write_head(&mut stream)
            .map_err(ConnectionError::Write)?;

        let body_bytes = match &resource {
            Some(resource) => files::send_body(&mut stream, resource.file(), resource.size())
                .map_err(ConnectionError::Transfer)?,
            None => 0,
        };

        drop(resource);

        Ok(Served {
            request,
            status: response.status(),
            body_bytes,
        })
    }

    /// Lee líneas hasta completar el bloque de headers y valida el request
    pub fn read_request<R: Read>(&self, reader: R) -> Result<Request, ConnectionError> {
        let mut scanner = LineScanner::with_capacity(reader, self.max_request);
        let mut parser = RequestParser::new();

        loop {
            let line = scanner.next_line()?;
            if let Some(request) = parser.feed(line)? {
                return Ok(request);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::{ParseError, Version};
    use std::fs;
    use std::io::{Cursor, Write};
    use std::net::{Shutdown, TcpListener};
    use std::path::PathBuf;
    use std::thread;

    fn ephemeral_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").expect("bind")
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("file_server_conn_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Lee hasta EOF; un reset del peer cuenta como fin
    fn read_all(client: &mut TcpStream) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            match client.read(&mut chunk) {
                Ok(0) | Err(_) => return buf,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }
    }

    /// Levanta un handler para una conexión y retorna (respuesta, resultado)
    fn exchange(
        handler: ConnectionHandler,
        request: &[u8],
    ) -> (Vec<u8>, Result<Served, ConnectionError>) {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let t = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handler.handle(stream)
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(request).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let response = read_all(&mut client);
        (response, t.join().unwrap())
    }

    #[test]
    fn test_read_request_from_memory() {
        let handler = ConnectionHandler::default();
        let request = handler
            .read_request(Cursor::new(b"GET /a.txt HTTP/1.0\r\nHost: x\r\n\r\n".to_vec()))
            .unwrap();

        assert_eq!(request.target(), b"/a.txt");
        assert_eq!(request.version(), Version::HTTP_10);
    }

    #[test]
    fn test_read_request_too_large() {
        let handler = ConnectionHandler::new(Resolver::default(), 32);
        let mut raw = b"GET / HTTP/1.1\r\n".to_vec();
        raw.extend_from_slice(&[b'h'; 64]);

        let result = handler.read_request(Cursor::new(raw));
        assert!(matches!(result, Err(ConnectionError::RequestTooLarge { capacity: 32 })));
    }

    #[test]
    fn test_read_request_unsupported_method() {
        let handler = ConnectionHandler::default();
        let result = handler.read_request(Cursor::new(b"POST /a HTTP/1.1\r\n\r\n".to_vec()));

        assert!(matches!(
            result,
            Err(ConnectionError::Protocol(ParseError::UnsupportedMethod(_)))
        ));
    }

    #[test]
    fn test_handle_ok() {
        let dir = scratch_dir("ok");
        fs::write(dir.join("index.html"), b"<h1>hola</h1>").unwrap();

        let handler = ConnectionHandler::new(Resolver::new(&dir), DEFAULT_CAPACITY);
        let (response, result) = exchange(handler, b"GET /index.html HTTP/1.1\r\n\r\n");

        assert_eq!(
            response,
            b"HTTP/1.1 200 OK\r\nConnection: Close\r\nContent-Length: 13\r\n\r\n<h1>hola</h1>"
        );
        let served = result.unwrap();
        assert_eq!(served.status, StatusCode::Ok);
        assert_eq!(served.body_bytes, 13);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_handle_not_found() {
        let dir = scratch_dir("not_found");

        let handler = ConnectionHandler::new(Resolver::new(&dir), DEFAULT_CAPACITY);
        let (response, result) = exchange(handler, b"GET /missing.txt HTTP/1.0\r\n\r\n");

        assert_eq!(response, b"HTTP/1.0 404 Not Found\r\nConnection: Close\r\n\r\n");
        assert_eq!(result.unwrap().status, StatusCode::NotFound);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_handle_parse_error_sends_nothing() {
        let (response, result) = exchange(ConnectionHandler::default(), b"GET /a HTTP/2.0\r\n\r\n");

        assert!(response.is_empty());
        assert!(result.unwrap_err().is_protocol());
    }

    #[test]
    fn test_handle_peer_closed_immediately() {
        // No se envía nada: read retorna 0
        let (response, result) = exchange(ConnectionHandler::default(), b"");

        assert!(response.is_empty());
        assert!(matches!(result, Err(ConnectionError::PeerClosed)));
    }

    #[test]
    fn test_handle_incomplete_headers() {
        let (response, result) = exchange(ConnectionHandler::default(), b"GET /a HTTP/1.1\r\nHost: x\r\n");

        assert!(response.is_empty());
        assert!(matches!(result, Err(ConnectionError::PeerClosed)));
    }
}
