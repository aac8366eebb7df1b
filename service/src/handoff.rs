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


//! Single-slot synchronous hand-off
//!
//! A send only completes once the receiving side is waiting for a value, so
//! a slow consumer throttles the producer and at most one value is ever in
//! flight. Tokio has no zero-capacity channel; instead the receiver posts a
//! one-shot "ticket" each time it is ready and the sender fulfils it.

use tokio::sync::{mpsc, oneshot};

/// Creates a connected sender and receiver.
pub fn handoff<T>() -> (HandoffSender<T>, HandoffReceiver<T>) {
    let (ready_tx, ready_rx) = mpsc::channel(1);
    (
        HandoffSender { ready: ready_rx },
        HandoffReceiver { ready: ready_tx },
    )
}

/// Returned by [`HandoffSender::send`] when the receiver is gone. Carries
/// the value that could not be delivered.
#[derive(Debug, PartialEq, Eq)]
pub struct HandoffClosed<T>(pub T);

/// Producer half of a hand-off.
#[derive(Debug)]
pub struct HandoffSender<T> {
    ready: mpsc::Receiver<oneshot::Sender<T>>,
}

impl<T> HandoffSender<T> {
    /// Waits until the receiver asks for a value, then delivers `value`.
    ///
    /// Cancel safe in the sense that dropping the future never duplicates a
    /// value; it is simply not delivered.
    pub async fn send(&mut self, mut value: T) -> Result<(), HandoffClosed<T>> {
        loop {
            let Some(ticket) = self.ready.recv().await else {
                return Err(HandoffClosed(value));
            };
            // A receiver that gave up after posting its ticket hands the
            // value straight back; wait for the next ticket.
            match ticket.send(value) {
                Ok(()) => return Ok(()),
                Err(returned) => value = returned,
            }
        }
    }
}

/// Consumer half of a hand-off.
#[derive(Debug)]
pub struct HandoffReceiver<T> {
    ready: mpsc::Sender<oneshot::Sender<T>>,
}

impl<T> HandoffReceiver<T> {
    /// Signals readiness and waits for the next value. Returns `None` once
    /// the sender is dropped.
    pub async fn recv(&mut self) -> Option<T> {
        let (ticket, value) = oneshot::channel();
        self.ready.send(ticket).await.ok()?;
        value.await.ok()
    }
}
