// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Axis layout itself is infallible. Errors only arise at the edges: decoding a
//! declarative encoding, binding a channel definition, and parsing a number
//! format specifier.

extern crate alloc;

use alloc::string::String;

use crate::channel::Channel;

/// Errors raised while binding channel definitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// The definition has neither a `field` nor a constant `value`.
    #[error("channel `{channel}` needs either a `field` or a constant `value`")]
    MissingFieldOrValue {
        /// The offending channel.
        channel: Channel,
    },
    /// The definition has both a `field` and a constant `value`.
    #[error("channel `{channel}` sets both `field` and `value`")]
    ConflictingFieldAndValue {
        /// The offending channel.
        channel: Channel,
    },
    /// The encoding JSON could not be decoded.
    #[error("invalid encoding: {message}")]
    Json {
        /// Decoder message.
        message: String,
    },
}

impl EncodingError {
    pub(crate) fn json(err: &serde_json::Error) -> Self {
        Self::Json {
            message: alloc::format!("{err}"),
        }
    }
}

/// Errors raised while parsing a d3-style number format specifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The specifier does not follow
    /// `[[fill]align][sign][symbol][0][width][,][.precision][~][type]`.
    #[error("invalid number format specifier `{specifier}`")]
    InvalidSpecifier {
        /// The rejected specifier.
        specifier: String,
    },
}
