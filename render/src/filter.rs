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

//! Per-connection image filter chain
//!
//! Every frame passes through the same fixed sequence: gamma, brightness,
//! sharpen, mirror, invert, a fixed contrast boost, then a nearest-neighbour
//! resize to fit the client's terminal. The resize factor is worked out from
//! the first frame and reused for the rest of the connection, since every
//! frame of a source shares one size.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::{debug, trace};

/// Contrast applied to every frame after the luminance heuristic runs.
pub const AUTO_CONTRAST: f64 = 25.0;

/// Image pixels covered by one braille cell, horizontally.
pub const DOTS_PER_COLUMN: u32 = 2;

/// Image pixels covered by one braille cell, vertically.
pub const DOTS_PER_ROW: u32 = 4;

/// User adjustable filter parameters. Zero or `false` disables a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Below 0 darkens the image, above 0 lightens it.
    pub gamma: f64,
    /// Percentage in `-100..=100`; -100 is solid black and 100 solid white.
    pub brightness: f64,
    /// Unsharp mask sigma; values above 0 sharpen.
    pub sharpen: f32,
    /// Flip the image on its vertical axis.
    pub mirror: bool,
    /// Invert pixel colors.
    pub invert: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            gamma: 0.0,
            brightness: 0.0,
            sharpen: 0.0,
            mirror: false,
            invert: true,
        }
    }
}

impl FilterConfig {
    /// Set the gamma adjustment
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the brightness percentage
    pub fn with_brightness(mut self, brightness: f64) -> Self {
        self.brightness = brightness;
        self
    }

    /// Set the sharpen sigma
    pub fn with_sharpen(mut self, sharpen: f32) -> Self {
        self.sharpen = sharpen;
        self
    }

    /// Enable or disable mirroring
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Enable or disable inversion
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }
}

/// The filter chain for one connection.
#[derive(Debug, Clone)]
pub struct Filter {
    config: FilterConfig,
    cols: u16,
    rows: u16,
    scale: Option<f64>,
}

impl Filter {
    /// Creates a filter targeting a `cols` x `rows` terminal.
    pub fn new(config: FilterConfig, cols: u16, rows: u16) -> Self {
        Self {
            config,
            cols,
            rows,
            scale: None,
        }
    }

    /// The cached scale factor, once the first frame has been filtered.
    pub fn scale(&self) -> Option<f64> {
        self.scale
    }

    /// Runs the full chain over one decoded frame.
    pub fn apply(&mut self, mut img: DynamicImage) -> DynamicImage {
        let config = self.config;
        if config.gamma != 0.0 {
            img = adjust_gamma(&img, config.gamma + 1.0);
        }
        if config.brightness != 0.0 {
            img = img.brighten(brightness_shift(config.brightness));
        }
        if config.sharpen > 0.0 {
            img = img.unsharpen(config.sharpen, 0);
        }
        if config.mirror {
            img = img.fliph();
        }
        if config.invert {
            img.invert();
        }

        let luminance = luminance(&img);
        match luminance {
            Some(l) => trace!(
                luminance = l,
                contrast = l * 50.0 + 10.0,
                brightness = (1.0 - l) + 1.0,
                "Frame luminance"
            ),
            None => trace!("Frame luminance unavailable"),
        }
        img = adjust_contrast(&img, AUTO_CONTRAST);

        let (width, height) = img.dimensions();
        let scale = match self.scale {
            Some(scale) => scale,
            None => {
                let scale = scalar(width, height, self.cols, self.rows);
                debug!(
                    width,
                    height,
                    cols = self.cols,
                    rows = self.rows,
                    scale,
                    "Computed frame scale"
                );
                self.scale = Some(scale);
                scale
            }
        };

        let target_width = scaled(width, scale);
        let target_height = scaled(height, scale);
        if (target_width, target_height) == (width, height) {
            return img;
        }
        img.resize_exact(target_width, target_height, FilterType::Nearest)
    }
}

/// The largest factor `<= 1.0` that fits a `dx` x `dy` image into a terminal
/// of `cols` x `rows` braille cells.
pub fn scalar(dx: u32, dy: u32, cols: u16, rows: u16) -> f64 {
    let scale_x = f64::from(u32::from(cols) * DOTS_PER_COLUMN) / f64::from(dx);
    let scale_y = f64::from(u32::from(rows) * DOTS_PER_ROW) / f64::from(dy);
    1.0_f64.min(scale_x).min(scale_y)
}

/// Brightness heuristic derived from the luminance histogram peak.
///
/// Returns `None` for an empty image or when the peak is the darkest bucket,
/// where the heuristic divides by zero.
pub fn luminance(img: &DynamicImage) -> Option<f64> {
    let gray = img.to_luma8();
    let total = u64::from(gray.width()) * u64::from(gray.height());
    if total == 0 {
        return None;
    }

    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[usize::from(pixel.0[0])] += 1;
    }

    let mut peak_index = 0usize;
    let mut peak_count = 0u64;
    for (index, &count) in histogram.iter().enumerate() {
        if peak_count < count {
            peak_count = count;
            peak_index = index;
        }
    }
    if peak_index == 0 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let peak = peak_count as f64 / total as f64;
    #[allow(clippy::cast_precision_loss)]
    let index = peak_index as f64;
    Some(1.0 - (256.0 / index * peak))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled(length: u32, scale: f64) -> u32 {
    ((f64::from(length) * scale) as u32).max(1)
}

#[allow(clippy::cast_possible_truncation)]
fn brightness_shift(percentage: f64) -> i32 {
    (255.0 * percentage.clamp(-100.0, 100.0) / 100.0).round() as i32
}

#[allow(clippy::cast_precision_loss)]
fn adjust_gamma(img: &DynamicImage, gamma: f64) -> DynamicImage {
    let exponent = 1.0 / gamma.max(0.0001);
    map_levels(img, |i| (i as f64 / 255.0).powf(exponent) * 255.0)
}

/// Linear contrast stretch around mid-grey: +25 scales each level's
/// distance from the midpoint by 1.25.
#[allow(clippy::cast_precision_loss)]
fn adjust_contrast(img: &DynamicImage, percentage: f64) -> DynamicImage {
    let factor = 1.0 + percentage.clamp(-100.0, 100.0) / 100.0;
    map_levels(img, |i| ((i as f64 / 255.0 - 0.5) * factor + 0.5) * 255.0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn map_levels(img: &DynamicImage, level: impl Fn(usize) -> f64) -> DynamicImage {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = level(i).round().clamp(0.0, 255.0) as u8;
    }

    let mut rgba = img.to_rgba8();
    for pixel in rgba.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = lut[usize::from(*channel)];
        }
    }
    DynamicImage::ImageRgba8(rgba)
}
