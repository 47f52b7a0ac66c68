//! The request-log boundary: parses the fixed-format command lines,
//! drives the filesystem, and emits the final hex dump of the block
//! image.

use std::io::{self, BufRead, Write};

use log::info;
use thiserror::Error;

use crate::fs::FlatFs;

/// One decoded request line.
#[derive(Debug, PartialEq)]
pub enum Command {
    /// Create the named file and fill `size` bytes.
    Write { name: [u8; 2], size: u32 },
    /// Emit up to `limit` bytes of the named file.
    Read { name: [u8; 2], limit: u32 },
    Delete { name: [u8; 2] },
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("invalid command '{0}'")]
    InvalidCommand(char),
    #[error("malformed request line {0:?}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Decodes one request line. The format is positional: two name
/// characters, a blank, a one-character command code, and for `w`/`r` a
/// blank and a decimal byte count.
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let bytes = line.as_bytes();
    if bytes.len() < 4 {
        return Err(ParseError::Malformed(line.to_string()));
    }
    let name = [bytes[0], bytes[1]];

    match bytes[3] as char {
        'w' => Ok(Command::Write {
            name,
            size: parse_count(line)?,
        }),
        'r' => Ok(Command::Read {
            name,
            limit: parse_count(line)?,
        }),
        'd' => Ok(Command::Delete { name }),
        other => Err(ParseError::InvalidCommand(other)),
    }
}

fn parse_count(line: &str) -> Result<u32, ParseError> {
    line.get(5..)
        .and_then(|field| field.trim().parse().ok())
        .ok_or_else(|| ParseError::Malformed(line.to_string()))
}

/// Runs a whole request log against a freshly formatted disk.
///
/// Read payloads and the recoverable diagnostics ("Already exists",
/// "No such file", "No space") go to `out` as the log is replayed; at
/// end of input the full block image follows as a hex dump. A bad
/// command line is fatal and aborts the run before the dump.
pub fn run<R: BufRead, W: Write>(input: R, out: &mut W) -> Result<(), RunError> {
    let mut fs = FlatFs::new();
    let mut requests = 0u32;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        requests += 1;

        match parse_line(&line)? {
            Command::Write { name, size } => {
                // The fill byte is the first character of the name.
                if let Err(e) = fs.create(name, size, name[0]) {
                    writeln!(out, "{}", e)?;
                }
            }
            Command::Read { name, limit } => match fs.read(name, limit) {
                Ok(data) => {
                    out.write_all(&data)?;
                    out.write_all(b"\n")?;
                }
                Err(e) => writeln!(out, "{}", e)?,
            },
            Command::Delete { name } => {
                if let Err(e) = fs.delete(name) {
                    writeln!(out, "{}", e)?;
                }
            }
        }
    }

    info!("replayed {} requests, dumping image", requests);
    dump_image(fs.image(), out)?;
    Ok(())
}

/// Writes every image byte as two hex digits followed by a space.
pub fn dump_image<W: Write>(image: &[u8], out: &mut W) -> io::Result<()> {
    for byte in image {
        write!(out, "{:02x} ", byte)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_write_requests() {
        assert_eq!(
            parse_line("ab w 4096"),
            Ok(Command::Write {
                name: *b"ab",
                size: 4096
            })
        );
    }

    #[test]
    fn parses_read_requests() {
        assert_eq!(
            parse_line("cd r 123"),
            Ok(Command::Read {
                name: *b"cd",
                limit: 123
            })
        );
    }

    #[test]
    fn parses_delete_requests_without_a_count() {
        assert_eq!(parse_line("ab d"), Ok(Command::Delete { name: *b"ab" }));
    }

    #[test]
    fn unknown_command_codes_are_invalid() {
        assert_eq!(
            parse_line("ab x 5"),
            Err(ParseError::InvalidCommand('x'))
        );
    }

    #[test]
    fn short_or_countless_lines_are_malformed() {
        assert_eq!(parse_line("ab"), Err(ParseError::Malformed("ab".into())));
        assert_eq!(
            parse_line("ab w"),
            Err(ParseError::Malformed("ab w".into()))
        );
        assert_eq!(
            parse_line("ab w five"),
            Err(ParseError::Malformed("ab w five".into()))
        );
    }

    #[test]
    fn dump_writes_three_characters_per_byte() {
        let mut out = Vec::new();
        dump_image(&[0x00, 0xab, 0x07], &mut out).unwrap();
        assert_eq!(out, b"00 ab 07 ");
    }
}
