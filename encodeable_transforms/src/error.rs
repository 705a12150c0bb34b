// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate alloc;

use alloc::string::String;

use encodeable::Channel;

/// Errors returned by a [`PropsTransformer`](crate::PropsTransformer).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// A payload row does not have the shape the chart type expects.
    #[error("payload row {index} is malformed: {message}")]
    MalformedRow {
        /// Row index in `payload.data`.
        index: usize,
        /// Decoder message.
        message: String,
    },
    /// The encoding lacks a channel the chart type writes to.
    #[error("encoding has no `{channel}` channel")]
    MissingChannel {
        /// The missing channel.
        channel: Channel,
    },
    /// The chart props could not be decoded.
    #[error("invalid chart props: {message}")]
    Json {
        /// Decoder message.
        message: String,
    },
}

impl TransformError {
    pub(crate) fn json(err: &serde_json::Error) -> Self {
        Self::Json {
            message: alloc::format!("{err}"),
        }
    }
}
