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


//! Command line arguments

use blinken_render::FilterConfig;
use blinken_service::{DEFAULT_PORT, ServerConfig};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(
        short = 'p',
        long = "port",
        env = "BLINKEN_PORT",
        help = "Port to serve",
        default_value_t = DEFAULT_PORT
    )]
    pub port: u16,

    #[arg(
        short = 'b',
        long = "bind",
        env = "BLINKEN_BIND",
        help = "Address to listen on",
        default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    )]
    pub bind: IpAddr,

    #[arg(
        short = 'i',
        long = "input",
        env = "BLINKEN_INPUT",
        help = "MJPEG source file"
    )]
    pub input: PathBuf,

    #[arg(
        long = "ss",
        help = "Start seconds",
        default_value_t = 120
    )]
    pub start_seconds: u32,

    #[arg(
        long = "fps",
        help = "Frames per second",
        default_value_t = 12,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub fps: u32,

    #[arg(
        long = "negotiation-timeout",
        help = "Seconds a client may take to finish the telnet handshake"
    )]
    pub negotiation_timeout: Option<u64>,

    #[arg(
        long = "gamma",
        help = "Gamma adjustment, below 0 darkens and above 0 lightens",
        default_value_t = 0.0,
        allow_negative_numbers = true
    )]
    pub gamma: f64,

    #[arg(
        long = "brightness",
        help = "Brightness percentage between -100 and 100",
        default_value_t = 0.0,
        allow_negative_numbers = true
    )]
    pub brightness: f64,

    #[arg(
        long = "sharpen",
        help = "Unsharp mask sigma, 0 disables",
        default_value_t = 0.0
    )]
    pub sharpen: f32,

    #[arg(long = "mirror", help = "Flip frames horizontally")]
    pub mirror: bool,

    #[arg(long = "no-invert", help = "Do not invert frame colors")]
    pub no_invert: bool,
}

impl Arguments {
    /// The server configuration these arguments describe
    pub fn server_config(&self) -> ServerConfig {
        let filter = FilterConfig::default()
            .with_gamma(self.gamma)
            .with_brightness(self.brightness)
            .with_sharpen(self.sharpen)
            .with_mirror(self.mirror)
            .with_invert(!self.no_invert);

        ServerConfig::new(SocketAddr::new(self.bind, self.port), &self.input)
            .with_start_seconds(self.start_seconds)
            .with_frames_per_second(self.fps)
            .with_negotiation_timeout(self.negotiation_timeout.map(Duration::from_secs))
            .with_filter(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let arguments = Arguments::try_parse_from(["blinken", "--input", "video.mjpeg"]).unwrap();
        let config = arguments.server_config();

        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.input_path, PathBuf::from("video.mjpeg"));
        assert_eq!(config.start_seconds, 120);
        assert_eq!(config.frames_per_second, 12);
        assert_eq!(config.negotiation_timeout, None);
        assert_eq!(config.filter, FilterConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_all_options() {
        let arguments = Arguments::try_parse_from([
            "blinken",
            "-i",
            "clip.mjpeg",
            "--port",
            "2323",
            "--bind",
            "127.0.0.1",
            "--ss",
            "0",
            "--fps",
            "25",
            "--negotiation-timeout",
            "10",
            "--gamma",
            "-0.5",
            "--brightness",
            "15",
            "--sharpen",
            "1.5",
            "--mirror",
            "--no-invert",
        ])
        .unwrap();
        let config = arguments.server_config();

        assert_eq!(config.bind_address, "127.0.0.1:2323".parse().unwrap());
        assert_eq!(config.start_seconds, 0);
        assert_eq!(config.frames_per_second, 25);
        assert_eq!(config.negotiation_timeout, Some(Duration::from_secs(10)));
        assert!((config.filter.gamma - -0.5).abs() < f64::EPSILON);
        assert!((config.filter.brightness - 15.0).abs() < f64::EPSILON);
        assert!(config.filter.mirror);
        assert!(!config.filter.invert);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Arguments::try_parse_from(["blinken"]).is_err());
    }

    #[test]
    fn test_zero_fps_is_rejected() {
        assert!(Arguments::try_parse_from(["blinken", "-i", "x", "--fps", "0"]).is_err());
    }
}
