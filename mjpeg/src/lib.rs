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

//! # Blinken MJPEG Source
//!
//! Frame extraction for "MJPEG" files that are a bare concatenation of JPEG
//! images, built so that any number of connections can play the same file at
//! independent positions:
//!
//! - [`SharedSource`] holds the single read-only file handle.
//! - [`PositionedReader`] is one connection's private cursor, reading by
//!   explicit offset.
//! - [`FrameSplitter`] cuts the byte stream at each `FF D9` end-of-image marker.
//! - [`FrameStream`] drives a splitter from async code.
//!
//! ```rust,no_run
//! use blinken_mjpeg::{FrameStream, SharedSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SharedSource::open("video.mjpeg")?;
//! let mut frames = FrameStream::from_reader(source.reader());
//! let first = frames.next_frame().await?;
//! println!("first frame is {} bytes", first.len());
//! # Ok(())
//! # }
//! ```

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod result;
mod source;
mod splitter;
mod stream;

pub use self::result::{FrameError, FrameResult};
pub use self::source::{PositionedReader, ReadAt, SharedSource};
pub use self::splitter::{END_OF_IMAGE, FrameSplitter};
pub use self::stream::FrameStream;
