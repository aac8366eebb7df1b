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


//! Ctrl-C watcher

use blinken_telnetcodec::consts::keystroke::CTRL_C;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// How a watcher finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The client pressed Ctrl-C
    Interrupted,
    /// The client's input closed or failed
    Disconnected,
    /// The token fired for some other reason
    Cancelled,
}

/// Reads client input one byte at a time until Ctrl-C, end of input or
/// cancellation. Ctrl-C and read failures cancel `token`.
pub async fn watch<R>(mut reader: R, token: CancellationToken) -> WatchOutcome
where
    R: AsyncRead + Unpin,
{
    loop {
        let byte = select! {
            biased;
            () = token.cancelled() => return WatchOutcome::Cancelled,
            byte = reader.read_u8() => byte,
        };
        match byte {
            Ok(CTRL_C) => {
                debug!("Client sent Ctrl-C");
                token.cancel();
                return WatchOutcome::Interrupted;
            }
            Ok(other) => trace!(byte = other, "Ignoring client input"),
            Err(err) => {
                debug!(error = %err, "Client input closed");
                token.cancel();
                return WatchOutcome::Disconnected;
            }
        }
    }
}
