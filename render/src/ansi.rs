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

//! Terminal control sequences written around the rendered frames

/// Hides the cursor and selects white on black.
pub const SETUP_TERMINAL: &[u8] = b"\x1b[?25l\x1b[40m\x1b[37m";

/// Stops cursor blinking, shows the cursor and resets all attributes.
pub const RESTORE_TERMINAL: &[u8] = b"\x1b[?12l\x1b[?25h\x1b[0m";

/// Moves the cursor to column 0 and up `rows` lines.
pub fn cursor_reposition(rows: u32) -> String {
    format!("\x1b[999D\x1b[{rows}A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_reposition() {
        assert_eq!(cursor_reposition(24), "\x1b[999D\x1b[24A");
    }
}
