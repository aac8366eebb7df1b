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

//! Telnet command, option and keystroke byte values

/// Interpret As Command
pub const IAC: u8 = 255;
/// Request the peer stop performing an option
pub const DONT: u8 = 254;
/// Request the peer perform an option
pub const DO: u8 = 253;
/// Refuse to perform an option
pub const WONT: u8 = 252;
/// Offer to perform an option
pub const WILL: u8 = 251;
/// Subnegotiation Begin
pub const SB: u8 = 250;
/// Go Ahead
pub const GA: u8 = 249;
/// Subnegotiation End
pub const SE: u8 = 240;

/// Telnet option codes
pub mod option {
    /// Echo (RFC 857)
    pub const ECHO: u8 = 1;
    /// Suppress Go Ahead (RFC 858)
    pub const SUPPRESS_GO_AHEAD: u8 = 3;
    /// Negotiate About Window Size (RFC 1073)
    pub const NAWS: u8 = 31;
}

/// Raw keystrokes sent by clients in character mode
pub mod keystroke {
    /// Ctrl-C (ETX)
    pub const CTRL_C: u8 = 3;
}
