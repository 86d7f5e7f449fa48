//! Body decoding
//!
//! The shape of a reply body is determined by its code alone. Codes not in
//! the tables below are text.

use std::str::FromStr;

use super::codes;
use crate::error::{MecaError, Result};

/// Codes whose body is a comma-separated list of floats
const FLOAT_CODES: &[u16] = &[codes::JOINTS, codes::POSE];

/// Codes whose body is a comma-separated list of integers
const INT_CODES: &[u16] = &[codes::STATUS_ROBOT, codes::CONF, codes::STATUS_GRIPPER];

/// Value shape of a reply body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    Floats,
    Ints,
    Text,
}

impl BodyShape {
    pub fn of(code: u16) -> Self {
        if FLOAT_CODES.contains(&code) {
            BodyShape::Floats
        } else if INT_CODES.contains(&code) {
            BodyShape::Ints
        } else {
            BodyShape::Text
        }
    }
}

/// A decoded reply body
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    Floats(Vec<f64>),
    Ints(Vec<i64>),
    Text(String),
}

impl DecodedBody {
    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            DecodedBody::Floats(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            DecodedBody::Ints(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedBody::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Decode `body` according to the shape registered for `code`
pub fn decode_body(code: u16, body: &str) -> Result<DecodedBody> {
    match BodyShape::of(code) {
        BodyShape::Floats => parse_list(code, body).map(DecodedBody::Floats),
        BodyShape::Ints => parse_list(code, body).map(DecodedBody::Ints),
        BodyShape::Text => Ok(DecodedBody::Text(body.to_string())),
    }
}

fn parse_list<T: FromStr>(code: u16, body: &str) -> Result<Vec<T>> {
    body.split(',')
        .map(|segment| {
            segment.trim().parse::<T>().map_err(|_| MecaError::Decode {
                code,
                segment: segment.to_string(),
            })
        })
        .collect()
}
