//! # Archivos Servidos
//!
//! - `resolver`: target del request → archivo abierto (o 404)
//! - `transfer`: envío del contenido del archivo a la conexión

pub mod resolver;
pub mod transfer;

pub use resolver::{Resolver, Resource};
pub use transfer::send_body;
