//! # Resolución de Recursos
//! src/files/resolver.rs
//!
//! Convierte el target de un request en un archivo abierto para lectura.
//!
//! Se quita exactamente un `/` inicial y el resto se usa tal cual, relativo al
//! directorio raíz (el directorio de trabajo del proceso en producción). No
//! hay normalización: `GET //etc/passwd` abre `/etc/passwd` y los segmentos
//! `..` se respetan. Ver DESIGN.md.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Archivo abierto junto con su tamaño al momento de abrirlo
#[derive(Debug)]
pub struct Resource {
    file: File,
    size: u64,
}

impl Resource {
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn file(&self) -> &File {
        &self.file
    }
}

/// Resolver de targets a archivos locales
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
}

impl Default for Resolver {
    /// Resuelve relativo al directorio de trabajo actual
    fn default() -> Self {
        Self::new(".")
    }
}

impl Resolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Quita un único separador inicial del target
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::files::Resolver;
    /// use std::path::Path;
    ///
    /// assert_eq!(Resolver::relative_path(b"/index.html"), Path::new("index.html"));
    /// assert_eq!(Resolver::relative_path(b"//etc/passwd"), Path::new("/etc/passwd"));
    /// ```
    pub fn relative_path(target: &[u8]) -> &Path {
        let stripped = target.strip_prefix(b"/").unwrap_or(target);
        bytes_to_path(stripped)
    }

    /// Abre el recurso apuntado por `target`
    ///
    /// * `Ok(Some(resource))` - archivo regular abierto
    /// * `Ok(None)` - no se pudo abrir o no es un archivo regular (404)
    /// * `Err(e)` - se abrió pero falló `fstat`; la conexión se aborta
    pub fn resolve(&self, target: &[u8]) -> io::Result<Option<Resource>> {
        let path = self.root.join(Self::relative_path(target));

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "open failed");
                return Ok(None);
            }
        };

        let metadata = file.metadata()?;
        if !metadata.is_file() {
            debug!(path = %path.display(), "not a regular file");
            return Ok(None);
        }

        Ok(Some(Resource {
            file,
            size: metadata.len(),
        }))
    }
}

#[cfg(unix)]
fn bytes_to_path(bytes: &[u8]) -> &Path {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    Path::new(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn bytes_to_path(bytes: &[u8]) -> &Path {
    // Fuera de unix solo se aceptan targets UTF-8; el resto no existe
    Path::new(std::str::from_utf8(bytes).unwrap_or("\0"))
}
