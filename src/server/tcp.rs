//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Loop de aceptación: cada conexión se procesa en su propio thread, sin
//! pool ni límite de threads. No hay estado mutable compartido; los
//! handlers solo comparten la configuración inmutable detrás de un `Arc`.
//!
//! Los errores de `accept`, de configuración del timeout y de creación del
//! thread se registran y el loop continúa. En los dos últimos casos la
//! conexión ya aceptada se cierra.

use crate::config::Config;
use crate::error::StartupError;
use crate::files::Resolver;
use crate::server::connection::ConnectionHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, info_span, warn};

/// Servidor de archivos estáticos, un thread por conexión
pub struct Server {
    listener: TcpListener,
    handler: Arc<ConnectionHandler>,
    io_timeout: Option<Duration>,
}

impl Server {
    /// Crea el socket de escucha según la configuración
    ///
    /// Activa `SO_REUSEADDR` y escucha con el backlog configurado. Los
    /// archivos se resuelven relativos al directorio de trabajo actual.
    pub fn bind(config: &Config) -> Result<Self, StartupError> {
        let address = config.address();
        let addr = resolve_address(&address)?;

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
            .map_err(StartupError::Socket)?;

        if let Err(e) = socket.set_reuse_address(true) {
            warn!(error = %e, "could not set SO_REUSEADDR");
        }

        socket.bind(&addr.into()).map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

        let backlog = i32::try_from(config.backlog).unwrap_or(i32::MAX);
        socket.listen(backlog).map_err(StartupError::Listen)?;

        Ok(Self {
            listener: socket.into(),
            handler: Arc::new(ConnectionHandler::new(Resolver::default(), config.max_request)),
            io_timeout: config.io_timeout(),
        })
    }

    /// Resuelve los archivos relativos a `root` en vez del directorio actual
    pub fn with_document_root(mut self, root: impl Into<PathBuf>) -> Self {
        let max_request = self.handler.max_request();
        self.handler = Arc::new(ConnectionHandler::new(Resolver::new(root), max_request));
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Acepta conexiones indefinidamente
    ///
    /// Solo termina con el proceso; no hay drenado de conexiones.
    pub fn run(&self) {
        match self.local_addr() {
            Ok(addr) => info!(%addr, "listening (one thread per connection)"),
            Err(e) => warn!(error = %e, "listening on unknown address"),
        }

        loop {
            let (stream, peer) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            };
            debug!(%peer, "accepted connection");

            if let Err(e) = self.apply_timeout(&stream) {
                warn!(%peer, error = %e, "could not set I/O timeout, closing connection");
                continue;
            }

            self.dispatch(stream, peer);
        }
    }

    fn apply_timeout(&self, stream: &TcpStream) -> io::Result<()> {
        if let Some(timeout) = self.io_timeout {
            stream.set_read_timeout(Some(timeout))?;
            stream.set_write_timeout(Some(timeout))?;
        }
        Ok(())
    }

    /// Lanza un thread para la conexión
    fn dispatch(&self, stream: TcpStream, peer: SocketAddr) {
        let handler = Arc::clone(&self.handler);
        let span = info_span!("conn", %peer);

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", peer))
            .spawn(move || {
                let _entered = span.enter();
                handler.serve(stream);
            });

        // Si spawn falla el closure se libera junto con el stream, y la
        // conexión queda cerrada
        if let Err(e) = spawned {
            warn!(%peer, error = %e, "could not spawn handler thread, connection closed");
        }
    }
}

fn resolve_address(address: &str) -> Result<SocketAddr, StartupError> {
    address
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| StartupError::Address(address.to_string()))
}
