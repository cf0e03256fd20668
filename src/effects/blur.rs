//! Separable Gaussian blur used by the background distortion effect.
//!
//! The kernel is large (99 taps at sigma 30), so the row and column passes
//! are parallelized with rayon.

use rayon::prelude::*;

use crate::video::Frame;

/// Blur a frame with a normalized Gaussian kernel of the given odd size.
pub fn gaussian_blur(frame: &Frame, kernel_size: usize, sigma: f32) -> Frame {
    let (width, height) = (frame.width() as usize, frame.height() as usize);
    if width == 0 || height == 0 {
        return frame.clone();
    }
    let kernel = gaussian_kernel(kernel_size, sigma);
    let half = kernel.len() / 2;
    let src = frame.as_image().as_raw();

    // Horizontal pass into an intermediate f32 buffer
    let mut horizontal = vec![0f32; width * height * 3];
    horizontal
        .par_chunks_mut(width * 3)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let mut acc = [0f32; 3];
                for (k, &weight) in kernel.iter().enumerate() {
                    let sx = (x as isize + k as isize - half as isize)
                        .clamp(0, width as isize - 1) as usize;
                    let base = (y * width + sx) * 3;
                    acc[0] += src[base] as f32 * weight;
                    acc[1] += src[base + 1] as f32 * weight;
                    acc[2] += src[base + 2] as f32 * weight;
                }
                let base = x * 3;
                row[base] = acc[0];
                row[base + 1] = acc[1];
                row[base + 2] = acc[2];
            }
        });

    // Vertical pass into the output bytes
    let mut out = vec![0u8; width * height * 3];
    out.par_chunks_mut(width * 3)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let mut acc = [0f32; 3];
                for (k, &weight) in kernel.iter().enumerate() {
                    let sy = (y as isize + k as isize - half as isize)
                        .clamp(0, height as isize - 1) as usize;
                    let base = (sy * width + x) * 3;
                    acc[0] += horizontal[base] * weight;
                    acc[1] += horizontal[base + 1] * weight;
                    acc[2] += horizontal[base + 2] * weight;
                }
                let base = x * 3;
                row[base] = acc[0].round().clamp(0.0, 255.0) as u8;
                row[base + 1] = acc[1].round().clamp(0.0, 255.0) as u8;
                row[base + 2] = acc[2].round().clamp(0.0, 255.0) as u8;
            }
        });

    Frame::from_rgb_bytes(width as u32, height as u32, out)
        .expect("output buffer sized to frame dimensions")
}

fn gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let size = size.max(1) | 1; // force odd
    let half = (size / 2) as isize;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / two_sigma_sq).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}
