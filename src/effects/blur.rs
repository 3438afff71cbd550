//! Stack blur: an O(width x height) approximation of a Gaussian blur.
//!
//! Every output pixel is the triangular-weighted mean of the `2r+1` pixels around it
//! (weight `r+1-|d|` at distance `d`), kept up to date with three running sums as the
//! window slides one pixel at a time. Reads past either end of a line replicate the edge
//! pixel. Rows are blurred and written back before columns are read.

use crate::raster::{types::CHANNELS, RasterImage};

/// One slot of the ring buffer holding the pixels currently inside the window
#[derive(Debug, Clone, Copy, Default)]
struct StackEntry {
    channels: [u64; CHANNELS],
}

/// Largest radius the blur honors; larger values are clamped
pub const MAX_BLUR_RADIUS: u32 = 254;

/// Blur all four channels of `image` in place with the given radius
///
/// A radius of zero leaves the image untouched. Radii above [`MAX_BLUR_RADIUS`] are
/// clamped to it.
pub fn stack_blur(image: &mut RasterImage, radius: u32) {
    if radius < 1 || image.is_empty() {
        return;
    }

    let (width, height) = image.dimensions();
    let (width, height) = (width as usize, height as usize);
    let radius = radius.min(MAX_BLUR_RADIUS) as usize;

    let mut stack = vec![StackEntry::default(); 2 * radius + 1];
    let mut line = Vec::with_capacity(width.max(height));
    let data = image.as_raw_mut();

    for y in 0..height {
        blur_line(data, y * width, 1, width, radius, &mut stack, &mut line);
    }

    for x in 0..width {
        blur_line(data, x, width, height, radius, &mut stack, &mut line);
    }
}

/// Blur one row or column of `len` pixels starting at pixel `start`, `stride` pixels apart
fn blur_line(
    data: &mut [u8],
    start: usize,
    stride: usize,
    len: usize,
    radius: usize,
    stack: &mut [StackEntry],
    line: &mut Vec<[u64; CHANNELS]>,
) {
    line.clear();
    line.extend((0..len).map(|i| {
        let offset = (start + i * stride) * CHANNELS;
        [
            data[offset] as u64,
            data[offset + 1] as u64,
            data[offset + 2] as u64,
            data[offset + 3] as u64,
        ]
    }));

    let last = len - 1;
    let at = |i: usize| line[i.min(last)];

    let div = stack.len();
    let radius_plus_1 = radius + 1;
    let total_weight = (radius_plus_1 * radius_plus_1) as u64;
    let sum_factor = (radius_plus_1 * (radius_plus_1 + 1) / 2) as u64;

    // sum: weighted window total; sum_out: left half plus centre; sum_in: right half
    let mut sum = [0u64; CHANNELS];
    let mut sum_in = [0u64; CHANNELS];
    let mut sum_out = [0u64; CHANNELS];

    let first = line[0];
    for c in 0..CHANNELS {
        sum_out[c] = radius_plus_1 as u64 * first[c];
        sum[c] = sum_factor * first[c];
    }
    for entry in stack.iter_mut().take(radius_plus_1) {
        entry.channels = first;
    }

    for i in 1..=radius {
        let pixel = at(i);
        stack[radius + i].channels = pixel;
        let weight = (radius_plus_1 - i) as u64;
        for c in 0..CHANNELS {
            sum[c] += pixel[c] * weight;
            sum_in[c] += pixel[c];
        }
    }

    // stack_in holds the pixel about to leave, stack_out the one about to become centre
    let mut stack_in = 0;
    let mut stack_out = radius_plus_1;

    for x in 0..len {
        let offset = (start + x * stride) * CHANNELS;
        for c in 0..CHANNELS {
            data[offset + c] = (sum[c] / total_weight) as u8;
            sum[c] -= sum_out[c];
        }

        let leaving = stack[stack_in].channels;
        let incoming = at(x + radius_plus_1);
        stack[stack_in].channels = incoming;
        for c in 0..CHANNELS {
            sum_out[c] -= leaving[c];
            sum_in[c] += incoming[c];
            sum[c] += sum_in[c];
        }
        stack_in = (stack_in + 1) % div;

        let centre = stack[stack_out].channels;
        for c in 0..CHANNELS {
            sum_out[c] += centre[c];
            sum_in[c] -= centre[c];
        }
        stack_out = (stack_out + 1) % div;
    }
}
