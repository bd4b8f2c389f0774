//! Minimal blocking IMAP client over rustls, enough to search a folder and
//! fetch whole messages. Run it on `spawn_blocking`.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use mw_core::{Error, Result};
use rustls::pki_types::ServerName;
use rustls::{ClientConnection, StreamOwned};

const READ_TIMEOUT: Duration = Duration::from_secs(30);
/// Largest literal the client will buffer.
pub const MAX_LITERAL_BYTES: usize = 25 * 1024 * 1024;

type TlsStream = StreamOwned<ClientConnection, TcpStream>;

pub struct ImapSession {
    stream: TlsStream,
    next_tag: u32,
}

impl ImapSession {
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let tcp = TcpStream::connect((host, port))?;
        tcp.set_read_timeout(Some(READ_TIMEOUT))?;

        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let tls_config = rustls::ClientConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .map_err(|e| Error::Email(format!("TLS setup failed: {}", e)))?
        .with_root_certificates(roots)
        .with_no_client_auth();

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| Error::Email(format!("invalid IMAP host '{}': {}", host, e)))?;
        let conn = ClientConnection::new(Arc::new(tls_config), server_name)
            .map_err(|e| Error::Email(format!("TLS handshake failed: {}", e)))?;

        let mut session = Self {
            stream: StreamOwned::new(conn, tcp),
            next_tag: 1,
        };
        let greeting = session.read_line()?;
        if !greeting.starts_with("* OK") {
            return Err(Error::Email(format!("unexpected IMAP greeting: {}", greeting.trim())));
        }
        Ok(session)
    }

    fn read_line(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            if self.stream.read(&mut byte)? == 0 {
                return Err(Error::Email("IMAP connection closed".to_string()));
            }
            buf.push(byte[0]);
            if buf.ends_with(b"\r\n") {
                return Ok(String::from_utf8_lossy(&buf).into_owned());
            }
        }
    }

    /// Sends one tagged command and collects the untagged response. String
    /// literals (`{n}`) are read verbatim and returned in `literals`.
    fn command(&mut self, command: &str) -> Result<Response> {
        let tag = format!("A{}", self.next_tag);
        self.next_tag += 1;
        self.stream.write_all(format!("{} {}\r\n", tag, command).as_bytes())?;
        self.stream.flush()?;

        let mut response = Response::default();
        loop {
            let line = self.read_line()?;
            if let Some(status) = line.strip_prefix(&tag) {
                let status = status.trim();
                if status.starts_with("OK") {
                    return Ok(response);
                }
                let verb = command.split_whitespace().next().unwrap_or(command);
                return Err(Error::Email(format!("IMAP {} failed: {}", verb, status)));
            }
            if let Some(size) = literal_size(&line) {
                check_literal_size(size)?;
                let mut literal = vec![0u8; size];
                self.stream.read_exact(&mut literal)?;
                response.literals.push(literal);
            }
            response.lines.push(line);
        }
    }

    pub fn login(&mut self, user: &str, password: &str) -> Result<()> {
        self.command(&format!("LOGIN {} {}", quote(user), quote(password)))
            .map(|_| ())
    }

    pub fn select(&mut self, folder: &str) -> Result<()> {
        self.command(&format!("SELECT {}", quote(folder))).map(|_| ())
    }

    pub fn search(&mut self, criteria: &str) -> Result<Vec<String>> {
        let response = self.command(&format!("SEARCH {}", criteria))?;
        Ok(parse_search(&response.lines))
    }

    /// Fetches the full message. Fetching RFC822 also sets `\Seen`.
    pub fn fetch_message(&mut self, id: &str) -> Result<Vec<u8>> {
        let mut response = self.command(&format!("FETCH {} RFC822", id))?;
        if response.literals.is_empty() {
            return Err(Error::Email(format!("message {} has no body", id)));
        }
        Ok(response.literals.swap_remove(0))
    }

    pub fn logout(mut self) -> Result<()> {
        self.command("LOGOUT").map(|_| ())
    }
}

#[derive(Debug, Default)]
struct Response {
    lines: Vec<String>,
    literals: Vec<Vec<u8>>,
}

/// Size of the literal announced at the end of `line`, e.g. `{1234}`.
fn literal_size(line: &str) -> Option<usize> {
    let line = line.trim_end();
    let open = line.strip_suffix('}')?.rfind('{')?;
    line[open + 1..line.len() - 1].parse().ok()
}

fn check_literal_size(size: usize) -> Result<()> {
    if size > MAX_LITERAL_BYTES {
        return Err(Error::Email(format!(
            "IMAP literal of {} bytes exceeds the {} byte limit",
            size, MAX_LITERAL_BYTES
        )));
    }
    Ok(())
}

fn parse_search(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|l| l.strip_prefix("* SEARCH"))
        .flat_map(|ids| ids.split_whitespace().map(str::to_string))
        .collect()
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
