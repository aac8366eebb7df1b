//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

/// Result Type for Negotiation Operations
pub type NegotiationResult<T> = Result<T, NegotiationError>;

/// Errors raised while negotiating telnet options with a client.
#[derive(Debug, thiserror::Error)]
pub enum NegotiationError {
    /// An I/O error occurred while exchanging negotiation bytes.
    #[error("I/O error during negotiation: {0}")]
    Io(#[from] std::io::Error),

    /// The client closed the stream before answering a command.
    #[error("client closed the connection during negotiation")]
    Closed,

    /// The client answered a command with something other than the expected reply.
    #[error("expected {expected:?} but was {actual:?}")]
    UnexpectedResponse {
        /// The exact bytes that were expected
        expected: Vec<u8>,
        /// The bytes that were actually received
        actual: Vec<u8>,
    },

    /// The window size reply did not have the fixed NAWS shape.
    #[error("malformed window size response: {0:?}")]
    MalformedWindowSize(Vec<u8>),

    /// The client reported a zero-sized terminal.
    #[error("client reported an empty window size ({cols}x{rows})")]
    EmptyWindowSize {
        /// Reported columns
        cols: u16,
        /// Reported rows
        rows: u16,
    },
}

impl NegotiationError {
    /// Check whether the failure came from the transport rather than the peer's reply.
    pub fn is_io(&self) -> bool {
        matches!(self, NegotiationError::Io(_) | NegotiationError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NegotiationError::UnexpectedResponse {
            expected: vec![255, 253, 3],
            actual: vec![255, 254, 3],
        };
        assert_eq!(err.to_string(), "expected [255, 253, 3] but was [255, 254, 3]");

        let err = NegotiationError::EmptyWindowSize { cols: 0, rows: 24 };
        assert_eq!(err.to_string(), "client reported an empty window size (0x24)");
    }

    #[test]
    fn test_error_is_io() {
        assert!(NegotiationError::Closed.is_io());
        assert!(NegotiationError::Io(std::io::ErrorKind::BrokenPipe.into()).is_io());
        assert!(!NegotiationError::MalformedWindowSize(vec![]).is_io());
    }
}
