//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración inmutable construida una sola vez al arrancar, a partir de
//! los argumentos de línea de comandos.
//!
//! ## Ejemplo de uso
//!
//! ```bash
//! ./file_server --port 8080 --timeout 30 --directory ./public
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Puerto por defecto
pub const DEFAULT_PORT: u16 = 8888;

/// Backlog por defecto de conexiones pendientes
pub const DEFAULT_BACKLOG: u32 = 100;

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "file_server")]
#[command(about = "file_server - servidor HTTP multithread simple para contenido estático")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Timeout de I/O por conexión en segundos (0 = sin timeout)
    #[arg(short, long, default_value_t = 0)]
    pub timeout: u64,

    /// Directorio al que cambiar antes de empezar a servir
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Máximo de conexiones pendientes de aceptar
    #[arg(long, default_value_t = DEFAULT_BACKLOG)]
    pub backlog: u32,

    /// Capacidad en bytes del buffer de request line + headers
    #[arg(long = "max-request", default_value_t = crate::http::scanner::DEFAULT_CAPACITY)]
    pub max_request: usize,
}

impl Config {
    /// Parsea los argumentos del proceso
    ///
    /// Retorna el error de clap sin terminar el proceso; `main` decide el
    /// código de salida (0 para `--help`/`--version`, 1 para el resto).
    pub fn from_args() -> Result<Self, clap::Error> {
        Config::try_parse()
    }

    /// Igual que [`Config::from_args`] pero con argumentos explícitos
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::config::Config;
    ///
    /// let config = Config::from_args_iter(["file_server", "-p", "9000", "-t", "5"]).unwrap();
    /// assert_eq!(config.port, 9000);
    /// assert_eq!(config.io_timeout(), Some(std::time::Duration::from_secs(5)));
    /// ```
    pub fn from_args_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Config::try_parse_from(args)
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8888");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout a aplicar a cada conexión aceptada
    pub fn io_timeout(&self) -> Option<Duration> {
        match self.timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.backlog == 0 {
            return Err("Backlog must be >= 1".to_string());
        }
        if self.max_request == 0 {
            return Err("Max request size must be >= 1".to_string());
        }
        Ok(())
    }

    /// Registra un resumen de la configuración efectiva
    pub fn print_summary(&self) {
        info!(
            address = %self.address(),
            backlog = self.backlog,
            max_request = self.max_request,
            "network"
        );
        match self.io_timeout() {
            Some(timeout) => info!(?timeout, "per-connection I/O timeout"),
            None => info!("per-connection I/O timeout disabled"),
        }
        if let Some(dir) = &self.directory {
            info!(directory = %dir.display(), "document root");
        }
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
            timeout: 0,
            directory: None,
            backlog: DEFAULT_BACKLOG,
            max_request: crate::http::scanner::DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8888);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.backlog, 100);
        assert_eq!(config.max_request, 1024);
        assert!(config.directory.is_none());
        assert!(config.io_timeout().is_none());
    }

    #[test]
    fn test_parse_no_args_matches_default() {
        let config = Config::from_args_iter(["file_server"]).unwrap();
        let default = Config::default();

        assert_eq!(config.port, default.port);
        assert_eq!(config.host, default.host);
        assert_eq!(config.timeout, default.timeout);
        assert_eq!(config.backlog, default.backlog);
        assert_eq!(config.max_request, default.max_request);
    }

    #[test]
    fn test_parse_long_flags() {
        let config = Config::from_args_iter([
            "file_server",
            "--port",
            "3000",
            "--timeout",
            "10",
            "--directory",
            "/srv/www",
        ])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.io_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.directory, Some(PathBuf::from("/srv/www")));
    }

    #[test]
    fn test_parse_short_flags() {
        let config = Config::from_args_iter(["file_server", "-p", "81", "-t", "2", "-d", "www"]).unwrap();

        assert_eq!(config.port, 81);
        assert_eq!(config.timeout, 2);
        assert_eq!(config.directory, Some(PathBuf::from("www")));
    }

    #[test]
    fn test_help_is_not_an_error() {
        let err = Config::from_args_iter(["file_server", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = Config::from_args_iter(["file_server", "-p", "http"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_unknown_flag_is_an_error() {
        let err = Config::from_args_iter(["file_server", "--workers", "4"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let mut config = Config::default();
        config.timeout = 0;
        assert!(config.io_timeout().is_none());
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_backlog() {
        let mut config = Config::default();
        config.backlog = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Backlog"));
    }

    #[test]
    fn test_validate_invalid_max_request() {
        let mut config = Config::default();
        config.max_request = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Max request"));
    }

    #[test]
    fn test_config_print_summary() {
        let mut config = Config::default();
        config.timeout = 5;
        config.directory = Some(PathBuf::from("/tmp"));
        // No debe hacer panic
        config.print_summary();
    }
}
