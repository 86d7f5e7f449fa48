//! Protocol codec
//!
//! Frame encoding and fixed-position reply parsing.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! Name(arg1,arg2,...)\0
//! ```
//!
//! ### Reply
//! ```text
//! ┌───┬────────┬───┬───┬──────────────┬───┬────┐
//! │ [ │ CCCC   │ ] │ [ │    BODY      │ ] │ \0 │
//! └───┴────────┴───┴───┴──────────────┴───┴────┘
//!   0   1..=4    5   6   7..len-1      len-1
//! ```
//!
//! Parsing slices at fixed offsets and therefore assumes four-digit codes.
//! A five-digit code would need bracket scanning instead.

use std::io::{BufRead, ErrorKind, Write};

use super::{Command, Response};
use crate::error::{MecaError, Result};

/// Frame terminator
pub const TERMINATOR: u8 = b'\0';

/// Width of the response code
pub const CODE_WIDTH: usize = 4;

/// Offset of the first body character
const BODY_OFFSET: usize = CODE_WIDTH + 3;

/// Smallest valid reply: `[dddd][]`
const MIN_FRAME_LEN: usize = BODY_OFFSET + 1;

// =============================================================================
// Encoding
// =============================================================================

/// Append the terminator to command text
pub fn encode(text: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(text.len() + 1);
    frame.extend_from_slice(text.as_bytes());
    frame.push(TERMINATOR);
    frame
}

/// Encode a command frame
pub fn encode_command(command: &Command) -> Vec<u8> {
    encode(&command.to_wire())
}

/// Encode a reply frame as the controller would send it
pub fn encode_reply(code: u16, body: &str) -> Vec<u8> {
    encode(&format!("[{:04}][{}]", code, body))
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse a reply frame into code and body
///
/// One trailing terminator is tolerated. Anything not shaped like
/// `[dddd][...]` is rejected.
pub fn parse_response(raw: &str) -> Result<Response> {
    let frame = raw.strip_suffix('\0').unwrap_or(raw);
    let bytes = frame.as_bytes();

    if bytes.len() < MIN_FRAME_LEN {
        return Err(MecaError::MalformedFrame(format!(
            "{:?}: expected at least {} bytes, got {}",
            frame,
            MIN_FRAME_LEN,
            bytes.len()
        )));
    }

    let code_digits = &bytes[1..=CODE_WIDTH];
    let shaped = bytes[0] == b'['
        && code_digits.iter().all(u8::is_ascii_digit)
        && bytes[CODE_WIDTH + 1] == b']'
        && bytes[CODE_WIDTH + 2] == b'['
        && bytes[bytes.len() - 1] == b']';

    if !shaped {
        return Err(MecaError::MalformedFrame(format!(
            "{:?}: not of the form [dddd][...]",
            frame
        )));
    }

    let code = frame[1..=CODE_WIDTH]
        .parse::<u16>()
        .map_err(|e| MecaError::MalformedFrame(format!("{:?}: {}", frame, e)))?;
    let body = &frame[BODY_OFFSET..frame.len() - 1];

    Ok(Response::new(code, body))
}

/// Parse a reply frame received as raw bytes
pub fn parse_response_bytes(raw: &[u8]) -> Result<Response> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| MecaError::MalformedFrame(format!("invalid UTF-8: {}", e)))?;
    parse_response(text)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one terminated frame from a stream, without its terminator
///
/// Blocks until a terminator arrives. A stream that closes mid-frame or
/// before any byte is reported as `UnexpectedEof`.
pub fn read_frame<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut frame = Vec::new();
    let n = reader.read_until(TERMINATOR, &mut frame)?;

    if n == 0 || frame.last() != Some(&TERMINATOR) {
        return Err(MecaError::Io(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            "stream closed before frame terminator",
        )));
    }

    frame.pop();
    Ok(frame)
}

/// Write one frame (terminator included) and flush
pub fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> Result<()> {
    writer.write_all(frame)?;
    writer.flush()?;
    Ok(())
}
