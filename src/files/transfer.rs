//! # Transferencia del Body
//! src/files/transfer.rs
//!
//! Envía exactamente `size` bytes de un archivo a la conexión.
//!
//! En Linux se usa `sendfile(2)`: los bytes van del page cache al socket sin
//! pasar por un buffer de usuario. En otras plataformas, o si el kernel
//! rechaza el par de descriptores antes de enviar nada (`EINVAL`, `ENOSYS`),
//! se copia con `io::copy`.

use std::fs::File;
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use tracing::trace;

/// Máximo que Linux transfiere en una sola llamada a sendfile
#[cfg(target_os = "linux")]
const SENDFILE_MAX_CHUNK: u64 = 0x7fff_f000;

/// Envía `size` bytes de `file` (desde el inicio) a `out`
///
/// Retorna los bytes enviados, que siempre son `size` en caso de éxito. Si el
/// archivo se acorta durante el envío el resultado es `UnexpectedEof`.
pub fn send_body<W>(out: &mut W, file: &File, size: u64) -> io::Result<u64>
where
    W: Write + AsRawFd,
{
    #[cfg(target_os = "linux")]
    {
        match sendfile_all(out.as_raw_fd(), file.as_raw_fd(), size)? {
            ZeroCopy::Sent(sent) => return Ok(sent),
            ZeroCopy::Unsupported => {
                trace!("sendfile unsupported for this descriptor pair, copying");
            }
        }
    }

    copy_body(out, file, size)
}

/// Copia con buffer de usuario
///
/// Asume que la posición del archivo está al inicio.
pub fn copy_body<W: Write>(out: &mut W, file: &File, size: u64) -> io::Result<u64> {
    let mut reader = file.take(size);
    let copied = io::copy(&mut reader, out)?;

    if copied != size {
        return Err(short_file(copied, size));
    }
    Ok(copied)
}

#[cfg(target_os = "linux")]
enum ZeroCopy {
    Sent(u64),
    Unsupported,
}

#[cfg(target_os = "linux")]
fn sendfile_all(out_fd: libc::c_int, in_fd: libc::c_int, size: u64) -> io::Result<ZeroCopy> {
    let mut offset: libc::off_t = 0;

    loop {
        let sent = offset as u64;
        if sent == size {
            return Ok(ZeroCopy::Sent(sent));
        }

        let count = (size - sent).min(SENDFILE_MAX_CHUNK) as usize;
        // SAFETY: ambos descriptores están abiertos mientras dure la llamada
        // y `offset` es una variable local válida.
        let ret = unsafe { libc::sendfile(out_fd, in_fd, &mut offset, count) };

        if ret < 0 {
            let err = io::Error::last_os_error();
            match err.raw_os_error() {
                Some(libc::EINTR) => continue,
                Some(libc::EINVAL) | Some(libc::ENOSYS) if sent == 0 => {
                    return Ok(ZeroCopy::Unsupported)
                }
                _ => return Err(err),
            }
        }

        if ret == 0 {
            return Err(short_file(sent, size));
        }
    }
}

fn short_file(sent: u64, size: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("file ended after {} of {} bytes", sent, size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::net::{TcpListener, TcpStream};
    use std::path::PathBuf;
    use std::thread;

    fn scratch_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("file_server_transfer_{}_{}", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    /// Envía el archivo por un socket real y retorna lo recibido
    fn send_over_tcp(path: PathBuf, size: u64) -> (io::Result<u64>, Vec<u8>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();

        let reader = thread::spawn(move || {
            let mut client = TcpStream::connect(addr).unwrap();
            let mut buf = Vec::new();
            client.read_to_end(&mut buf).unwrap();
            buf
        });

        let (mut stream, _) = listener.accept().unwrap();
        let file = File::open(&path).unwrap();
        let result = send_body(&mut stream, &file, size);
        drop(stream);

        let received = reader.join().unwrap();
        fs::remove_file(&path).unwrap();
        (result, received)
    }

    #[test]
    fn test_send_body_exact_bytes() {
        let contents: Vec<u8> = (0..=255u8).cycle().take(300_000).collect();
        let path = scratch_file("exact", &contents);

        let (result, received) = send_over_tcp(path, contents.len() as u64);

        assert_eq!(result.unwrap(), contents.len() as u64);
        assert_eq!(received, contents);
    }

    #[test]
    fn test_send_empty_body() {
        let path = scratch_file("empty", b"");

        let (result, received) = send_over_tcp(path, 0);

        assert_eq!(result.unwrap(), 0);
        assert!(received.is_empty());
    }

    #[test]
    fn test_file_shorter_than_size() {
        let path = scratch_file("short", b"12345");

        let (result, received) = send_over_tcp(path, 10);

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(received, b"12345");
    }

    #[test]
    fn test_copy_body_fallback() {
        let path = scratch_file("copy", b"hello world");
        let file = File::open(&path).unwrap();

        let mut out = Vec::new();
        assert_eq!(copy_body(&mut out, &file, 11).unwrap(), 11);
        assert_eq!(out, b"hello world");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_copy_body_stops_at_size() {
        let path = scratch_file("copy_prefix", b"hello world");
        let file = File::open(&path).unwrap();

        let mut out = Vec::new();
        copy_body(&mut out, &file, 5).unwrap();
        assert_eq!(out, b"hello");

        fs::remove_file(&path).unwrap();
    }
}
