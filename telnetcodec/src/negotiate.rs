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

//! Telnet option handshake
//!
//! The server drives three fixed command/response exchanges with a freshly
//! accepted client:
//!
//! ```text
//! server: IAC WILL SUPPRESS-GO-AHEAD    client: IAC DO SUPPRESS-GO-AHEAD
//! server: IAC WILL ECHO                 client: IAC DO ECHO
//! server: IAC DO NAWS                   client: IAC WILL NAWS IAC SB NAWS <w> <h> IAC SE
//! ```
//!
//! The first two put the client into unbuffered, server-echo character mode and
//! must succeed exactly. The window size exchange is best effort and degrades to
//! [`WindowSize::default`].

use crate::consts::{self, option};
use crate::{NegotiationError, NegotiationResult, WindowSize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Size of the buffer a single response is read into.
const RESPONSE_BUFFER_SIZE: usize = 256;

/// Performs the full handshake and returns the negotiated terminal size.
///
/// # Errors
/// Fails if either character mode exchange is answered with anything other
/// than the exact reciprocal `DO`, or if the stream errors or closes during
/// those exchanges. Window size failures never surface here.
pub async fn negotiate<S>(stream: &mut S) -> NegotiationResult<WindowSize>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    negotiate_unbuffered_keystrokes(stream).await?;
    Ok(negotiate_window_size(stream).await)
}

/// Asks the client to suppress go-ahead and to let the server echo.
pub async fn negotiate_unbuffered_keystrokes<S>(stream: &mut S) -> NegotiationResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    expect(
        stream,
        &[consts::IAC, consts::WILL, option::SUPPRESS_GO_AHEAD],
        &[consts::IAC, consts::DO, option::SUPPRESS_GO_AHEAD],
    )
    .await?;
    expect(
        stream,
        &[consts::IAC, consts::WILL, option::ECHO],
        &[consts::IAC, consts::DO, option::ECHO],
    )
    .await?;
    debug!("Client accepted character mode");
    Ok(())
}

/// Requests the client's window size, falling back to 80x24 on any failure.
pub async fn negotiate_window_size<S>(stream: &mut S) -> WindowSize
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let size = match command(stream, &[consts::IAC, consts::DO, option::NAWS]).await {
        Ok(reply) => WindowSize::parse_reply(&reply),
        Err(e) => Err(e),
    };

    match size {
        Ok(size) => {
            info!(cols = size.cols, rows = size.rows, "Negotiated window size");
            size
        }
        Err(e) => {
            let size = WindowSize::default();
            warn!(
                error = %e,
                cols = size.cols,
                rows = size.rows,
                "Window size negotiation failed, using default"
            );
            size
        }
    }
}

/// Sends `send` and requires the very next read to equal `expected`.
async fn expect<S>(stream: &mut S, send: &[u8], expected: &[u8]) -> NegotiationResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let actual = command(stream, send).await?;
    if actual != expected {
        return Err(NegotiationError::UnexpectedResponse {
            expected: expected.to_vec(),
            actual,
        });
    }
    Ok(())
}

/// Writes one command and returns the bytes of the single read that follows.
async fn command<S>(stream: &mut S, send: &[u8]) -> NegotiationResult<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(send).await?;
    stream.flush().await?;

    let mut response = vec![0u8; RESPONSE_BUFFER_SIZE];
    let n = stream.read(&mut response).await?;
    if n == 0 {
        return Err(NegotiationError::Closed);
    }
    response.truncate(n);
    Ok(response)
}
