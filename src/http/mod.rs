//! # Módulo HTTP
//!
//! Implementación mínima del protocolo, sin librerías de alto nivel:
//!
//! - Lectura de líneas sobre un buffer de capacidad fija
//! - Parsing y validación de la request line
//! - Construcción y escritura del bloque de headers de la respuesta
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n   (ignorado)
//! \r\n
//! ```
//!
//! Solo se acepta `GET`, con versión `HTTP/1.0` o `HTTP/1.1`. No se lee body.
//! Cada conexión atiende un único request y luego se cierra.

pub mod request;   // Request line y máquina de estados del parser
pub mod response;  // Bloque de headers de la respuesta
pub mod scanner;   // Lectura de líneas con buffer fijo
pub mod status;    // Códigos de estado HTTP

pub use request::{Request, RequestParser};
pub use response::Response;
pub use scanner::LineScanner;
pub use status::StatusCode;
