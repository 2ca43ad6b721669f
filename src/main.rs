//! # File Server - Entry Point
//! src/main.rs
//!
//! Parsea la línea de comandos, cambia de directorio si se pidió y sirve
//! hasta que el proceso termine. Cualquier error de arranque sale con
//! código 1.

use file_server::config::Config;
use file_server::error::StartupError;
use file_server::logging;
use file_server::server::Server;
use std::process;
use tracing::error;

fn main() {
    let config = match Config::from_args() {
        Ok(config) => config,
        Err(e) => {
            // --help y --version no son errores
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    logging::init();

    if let Err(e) = run(config) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(config: Config) -> Result<(), StartupError> {
    config.validate().map_err(StartupError::InvalidConfig)?;

    if let Some(dir) = &config.directory {
        std::env::set_current_dir(dir).map_err(|source| StartupError::ChangeDirectory {
            path: dir.clone(),
            source,
        })?;
    }

    config.print_summary();

    let server = Server::bind(&config)?;
    server.run();
    Ok(())
}
