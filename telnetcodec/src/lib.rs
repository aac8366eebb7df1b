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

//! # Blinken Telnet Codec
//!
//! The small slice of the Telnet protocol (RFC 854) a video streaming server
//! needs in order to drive a stock `telnet` client:
//!
//! - **Option negotiation**: [`negotiate`] puts the client into character mode
//!   (`SUPPRESS-GO-AHEAD` and `ECHO`) and asks for its window size (`NAWS`,
//!   RFC 1073), returning a [`WindowSize`].
//! - **IAC escaping**: [`IacWriter`] wraps the client-bound half of a
//!   connection and doubles every `0xFF` byte so rendered output can never be
//!   mistaken for a telnet command.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use blinken_telnetcodec::{IacWriter, negotiate};
//! use tokio::io::AsyncWriteExt;
//! use tokio::net::TcpStream;
//!
//! # async fn example(mut socket: TcpStream) -> Result<(), Box<dyn std::error::Error>> {
//! let size = negotiate(&mut socket).await?;
//! let (_reader, writer) = tokio::io::split(socket);
//! let mut writer = IacWriter::new(writer);
//! writer.write_all(format!("{}x{}\r\n", size.cols, size.rows).as_bytes()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Related RFCs
//!
//! - RFC 854: Telnet Protocol Specification
//! - RFC 857: Telnet Echo Option
//! - RFC 858: Telnet Suppress Go Ahead Option
//! - RFC 1073: Telnet Window Size Option

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

pub mod consts;
mod naws;
mod negotiate;
mod result;
mod writer;

pub use self::naws::{NAWS_REPLY_LEN, WindowSize};
pub use self::negotiate::{negotiate, negotiate_unbuffered_keystrokes, negotiate_window_size};
pub use self::result::{NegotiationError, NegotiationResult};
pub use self::writer::{IacWriter, escape_iac};
