//! Protocol Module
//!
//! The null-terminated ASCII protocol spoken by the controller.
//!
//! ## Request Format
//! ```text
//! Name\0
//! Name(arg1,arg2,...)\0
//! ```
//!
//! ## Reply Format
//! ```text
//! [CCCC][BODY]\0
//! ```
//! `CCCC` is exactly four decimal digits. `BODY` is free text; for a few
//! query codes it is a comma-separated numeric list.
//!
//! ## Code Ranges
//! - 1000-1999: command errors
//! - 2000-2999: command replies
//! - 3000-3999: status and general messages (3004 EOM, 3012 EOB)

mod answer;
mod codec;
mod command;
mod decode;
mod response;

pub use answer::{acknowledges_eom, answer_codes, static_answers, static_commands, AckFlags};
pub use codec::{
    encode, encode_command, encode_reply, parse_response, parse_response_bytes, read_frame,
    write_frame, CODE_WIDTH, TERMINATOR,
};
pub use command::{build, Arg, Command};
pub use decode::{decode_body, BodyShape, DecodedBody};
pub use response::{codes, Response};
