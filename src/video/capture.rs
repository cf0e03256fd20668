use std::time::Duration;

use image::{ImageBuffer, Rgb};

use crate::{error::Result, video::Frame};

/// Source of frames for the loop driver
///
/// `read` returning `Ok(None)` or an error is a transient failure: the
/// loop skips the iteration and tries again. Failures that should stop
/// startup (no such device) surface from the constructor instead.
pub trait CaptureSource: Send {
    /// Block until the next frame is available.
    fn read(&mut self) -> Result<Option<Frame>>;

    /// The resolution frames are delivered at.
    fn resolution(&self) -> (u32, u32);
}

/// Deterministic moving test pattern
///
/// A diagonal gradient that slides one pixel per frame, paced to the
/// requested rate so the loop's only suspension point stays at capture.
/// The frame counter is readable from pixel (0, 0), which the loop tests
/// use to check publish ordering.
pub struct SyntheticCapture {
    width: u32,
    height: u32,
    frame_interval: Duration,
    frame_count: u32,
}

impl SyntheticCapture {
    /// Pattern source paced at 30 fps.
    pub fn new(width: u32, height: u32) -> Self {
        Self::paced(width, height, 30)
    }

    /// Pattern source paced at an arbitrary rate (0 = unpaced, as fast as
    /// the loop can go).
    pub fn paced(width: u32, height: u32, fps: u32) -> Self {
        let frame_interval = if fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / fps as f64)
        };
        Self {
            width,
            height,
            frame_interval,
            frame_count: 0,
        }
    }
}

impl CaptureSource for SyntheticCapture {
    fn read(&mut self) -> Result<Option<Frame>> {
        if !self.frame_interval.is_zero() {
            std::thread::sleep(self.frame_interval);
        }
        let t = self.frame_count;
        self.frame_count = self.frame_count.wrapping_add(1);
        let buffer = ImageBuffer::from_fn(self.width, self.height, |x, y| {
            if x == 0 && y == 0 {
                Rgb([(t % 256) as u8, ((t >> 8) % 256) as u8, 0])
            } else {
                Rgb([
                    ((x + t) % 256) as u8,
                    ((y + t) % 256) as u8,
                    ((x + y) % 256) as u8,
                ])
            }
        });
        Ok(Some(Frame::new(buffer)))
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(feature = "camera")]
mod webcam {
    use nokhwa::{
        pixel_format::RgbFormat,
        utils::{
            CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
            Resolution,
        },
        Camera,
    };
    use tracing::{debug, info};

    use super::CaptureSource;
    use crate::{
        error::{CaptureError, Result},
        video::Frame,
    };

    /// Live webcam capture
    ///
    /// Asks for the closest match to the requested format and reports the
    /// resolution the stream actually delivers.
    pub struct CameraCapture {
        camera: Camera,
        width: u32,
        height: u32,
    }

    impl CameraCapture {
        pub fn open(index: u32, width: u32, height: u32, fps: u32) -> Result<Self> {
            let format = CameraFormat::new(
                Resolution::new(width, height),
                FrameFormat::YUYV,
                fps,
            );
            let requested =
                RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));
            let mut camera = Camera::new(CameraIndex::Index(index), requested).map_err(|e| {
                CaptureError::OpenFailed {
                    index,
                    reason: e.to_string(),
                }
            })?;
            camera.open_stream().map_err(|e| CaptureError::OpenFailed {
                index,
                reason: e.to_string(),
            })?;

            let actual = camera.resolution();
            info!(
                "Opened camera {} ({}) at {}x{}",
                index,
                camera.info().human_name(),
                actual.width(),
                actual.height()
            );
            Ok(Self {
                camera,
                width: actual.width(),
                height: actual.height(),
            })
        }
    }

    impl CaptureSource for CameraCapture {
        fn read(&mut self) -> Result<Option<Frame>> {
            // A dropped frame is transient: skip the iteration
            let raw = match self.camera.frame() {
                Ok(raw) => raw,
                Err(e) => {
                    debug!("Camera frame unavailable: {}", e);
                    return Ok(None);
                }
            };
            let rgb = raw
                .decode_image::<RgbFormat>()
                .map_err(|e| CaptureError::FrameFailed {
                    reason: e.to_string(),
                })?;
            Ok(Some(Frame::new(rgb)))
        }

        fn resolution(&self) -> (u32, u32) {
            (self.width, self.height)
        }
    }
}

#[cfg(feature = "camera")]
pub use webcam::CameraCapture;
