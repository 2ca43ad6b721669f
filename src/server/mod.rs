//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! - `tcp`: socket de escucha y loop de aceptación (un thread por conexión)
//! - `connection`: atención de una conexión, de la lectura al cierre

pub mod connection;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::ConnectionHandler;
pub use tcp::Server;
