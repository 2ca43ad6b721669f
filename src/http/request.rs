//! # Parsing de Requests HTTP/1.x
//! src/http/request.rs
//!
//! Este módulo valida la request line y consume (descartando) los headers.
//!
//! ## Formato aceptado
//!
//! ```text
//! GET /path HTTP/1.1\r\n     <- request line
//! Host: localhost:8888\r\n   <- headers (se ignoran)
//! \r\n                       <- fin de headers
//! ```
//!
//! ## Máquina de estados
//!
//! ```text
//! AwaitingRequestLine ──línea──▶ AwaitingHeaderOrBlank ──línea vacía──▶ Done
//!         │                               │  ▲
//!    línea vacía                    header │  │ (se descarta)
//!         │                               └──┘
//!         ▼                               │ request line inválida
//!     Rejected ◀──────────────────────────┘
//! ```
//!
//! La request line se valida recién al llegar la línea vacía, de modo que un
//! request rechazado también consume todo su bloque de headers.

use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Métodos HTTP soportados
///
/// Solo `GET`; cualquier otro token es [`ParseError::UnsupportedMethod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,
}

impl Method {
    /// Parsea el token de método (sensible a mayúsculas)
    fn from_bytes(token: &[u8]) -> Result<Self, ParseError> {
        match token {
            b"GET" => Ok(Method::GET),
            _ => Err(ParseError::UnsupportedMethod(
                String::from_utf8_lossy(token).into_owned(),
            )),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
        }
    }
}

/// Versión del protocolo: `HTTP/<major>.<minor>`
///
/// Solo se aceptan `HTTP/1.0` y `HTTP/1.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub const HTTP_10: Version = Version { major: 1, minor: 0 };
    pub const HTTP_11: Version = Version { major: 1, minor: 1 };

    /// Valida la firma de versión exacta
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::http::request::Version;
    ///
    /// assert_eq!(Version::from_signature(b"HTTP/1.0"), Ok(Version::HTTP_10));
    /// assert!(Version::from_signature(b"HTTP/2.0").is_err());
    /// ```
    pub fn from_signature(signature: &[u8]) -> Result<Self, ParseError> {
        match signature {
            b"HTTP/1.0" => Ok(Version::HTTP_10),
            b"HTTP/1.1" => Ok(Version::HTTP_11),
            _ => Err(ParseError::InvalidVersion(
                String::from_utf8_lossy(signature).into_owned(),
            )),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

/// Request validado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,

    /// Target tal como llegó (bytes, sin decodificar ni normalizar)
    target: Vec<u8>,

    version: Version,
}

/// Errores de protocolo
///
/// Todos provocan el cierre de la conexión sin enviar ningún byte.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// La primera línea ya es la línea vacía
    #[error("empty HTTP request")]
    EmptyRequest,

    /// La request line no tiene dos espacios separadores
    #[error("malformed HTTP request line")]
    MalformedRequestLine,

    #[error("unsupported method '{0}'")]
    UnsupportedMethod(String),

    /// La firma no es exactamente `HTTP/1.0` ni `HTTP/1.1`
    #[error("unrecognized HTTP version '{0}'")]
    InvalidVersion(String),

    #[error("empty request target")]
    EmptyTarget,
}

impl Request {
    /// Parsea y valida una request line (sin terminador)
    ///
    /// El método va hasta el primer espacio y la firma de versión desde el
    /// último; lo que queda en medio es el target, que puede contener
    /// espacios.
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::http::request::{Method, Request, Version};
    ///
    /// let request = Request::parse_line(b"GET /index.html HTTP/1.1").unwrap();
    /// assert_eq!(request.method(), Method::GET);
    /// assert_eq!(request.target(), b"/index.html");
    /// assert_eq!(request.version(), Version::HTTP_11);
    /// ```
    pub fn parse_line(line: &[u8]) -> Result<Self, ParseError> {
        let first_space = line
            .iter()
            .position(|&b| b == b' ')
            .ok_or(ParseError::MalformedRequestLine)?;

        let method = Method::from_bytes(&line[..first_space])?;
        let rest = &line[first_space + 1..];

        let last_space = rest
            .iter()
            .rposition(|&b| b == b' ')
            .ok_or(ParseError::MalformedRequestLine)?;

        let version = Version::from_signature(&rest[last_space + 1..])?;
        let target = &rest[..last_space];

        if target.is_empty() {
            return Err(ParseError::EmptyTarget);
        }

        Ok(Request {
            method,
            target: target.to_vec(),
            version,
        })
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn target(&self) -> &[u8] {
        &self.target
    }

    /// Target como texto, para logs
    pub fn target_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.target)
    }

    pub fn version(&self) -> Version {
        self.version
    }
}

/// Estados del parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    AwaitingRequestLine,
    AwaitingHeaderOrBlank,
    Done,
    Rejected,
}

/// Parser incremental alimentado línea por línea
#[derive(Debug)]
pub struct RequestParser {
    state: ParserState,
    request_line: Vec<u8>,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::AwaitingRequestLine,
            request_line: Vec::new(),
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Procesa una línea ya sin terminador
    ///
    /// Retorna `Ok(Some(request))` al llegar la línea vacía con una request
    /// line válida, `Ok(None)` mientras falten líneas y `Err` cuando el
    /// request se rechaza. Una vez en `Done` o `Rejected` las líneas
    /// adicionales se ignoran.
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::http::request::{ParserState, RequestParser};
    ///
    /// let mut parser = RequestParser::new();
    /// assert_eq!(parser.feed(b"GET /a HTTP/1.0").unwrap(), None);
    /// assert_eq!(parser.feed(b"Host: localhost").unwrap(), None);
    /// let request = parser.feed(b"").unwrap().unwrap();
    ///
    /// assert_eq!(request.target(), b"/a");
    /// assert_eq!(parser.state(), ParserState::Done);
    /// ```
    pub fn feed(&mut self, line: &[u8]) -> Result<Option<Request>, ParseError> {
        match self.state {
            ParserState::AwaitingRequestLine => {
                if line.is_empty() {
                    self.state = ParserState::Rejected;
                    return Err(ParseError::EmptyRequest);
                }
                self.request_line = line.to_vec();
                self.state = ParserState::AwaitingHeaderOrBlank;
                Ok(None)
            }
            ParserState::AwaitingHeaderOrBlank => {
                if !line.is_empty() {
                    // Los headers no tienen semántica en este servidor
                    return Ok(None);
                }
                match Request::parse_line(&self.request_line) {
                    Ok(request) => {
                        self.state = ParserState::Done;
                        Ok(Some(request))
                    }
                    Err(e) => {
                        self.state = ParserState::Rejected;
                        Err(e)
                    }
                }
            }
            ParserState::Done | ParserState::Rejected => Ok(None),
        }
    }
}
