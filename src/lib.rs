//! # File Server
//! src/lib.rs
//!
//! Servidor HTTP mínimo de archivos estáticos. Cada conexión aceptada se
//! atiende en su propio thread: se lee un único request `GET`, se abre el
//! archivo pedido y se responde `200` con su contenido o `404`, siempre con
//! `Connection: Close`.
//!
//! ## Arquitectura
//!
//! ```text
//! server::tcp ──▶ server::connection ──▶ http::{scanner, request}
//!                                    └─▶ files::resolver ──▶ http::response
//!                                                        └─▶ files::transfer
//! ```
//!
//! - `http`: lectura de líneas, parsing del request y headers de respuesta
//! - `files`: resolución del target y envío del archivo (sendfile)
//! - `server`: socket de escucha, loop de aceptación y handler por conexión
//! - `config`, `error`, `logging`: configuración, errores y logs
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use file_server::config::Config;
//! use file_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(&config).expect("Error al iniciar servidor");
//! server.run();
//! ```

pub mod config;
pub mod error;
pub mod files;
pub mod http;
pub mod logging;
pub mod server;
