use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

use crate::{
    config::OverlayConfig,
    detect::{hand, Detection, LandmarkSource},
    effects::{draw, EffectId},
    error::Result,
    pipeline::{EffectPipeline, SharedSettings},
    video::{CaptureSource, Frame, FrameSequenceSink, RecordingParams, RecordingSink},
};

/// Control commands consumed inside the loop iteration.
enum LoopCommand {
    StartRecording(PathBuf),
    StartRecordingWith(Box<dyn RecordingSink>),
    StopRecording,
}

/// Events published to the presentation layer.
///
/// Delivery is fire-and-forget over an unbounded channel: a slow consumer
/// never blocks the next capture.
#[derive(Debug)]
pub enum FrameEvent {
    /// A fully processed frame, in capture order.
    Frame(Frame),
    /// Recording started (true) or stopped/failed to start (false).
    RecordingState(bool),
}

/// Cloneable handle the control surface uses to drive the running loop
///
/// Parameter changes and effect toggles are writes to shared settings;
/// recording transitions are commands drained by the worker. Neither path
/// blocks on frame processing.
#[derive(Clone)]
pub struct LoopHandle {
    settings: SharedSettings,
    commands: Sender<LoopCommand>,
}

impl LoopHandle {
    pub fn set_effect_enabled(&self, id: EffectId, on: bool) {
        self.settings.set_effect_enabled(id, on);
    }

    pub fn set_parameter(&self, id: EffectId, name: &str, value: f64) -> Result<()> {
        self.settings.set_parameter(id, name, value)
    }

    pub fn set_brightness(&self, brightness: i32) {
        self.settings.set_brightness(brightness);
    }

    pub fn set_contrast(&self, contrast: i32) {
        self.settings.set_contrast(contrast);
    }

    pub fn set_drawing(&self, on: bool) {
        self.settings.set_drawing(on);
    }

    /// Start recording into a frame-sequence sink rooted at `path`.
    ///
    /// Opening happens on the worker; failure is reported back as a
    /// `RecordingState(false)` event, and the loop continues unrecorded.
    pub fn start_recording(&self, path: impl Into<PathBuf>) {
        let _ = self.commands.send(LoopCommand::StartRecording(path.into()));
    }

    /// Start recording into a caller-supplied sink.
    pub fn start_recording_with(&self, sink: Box<dyn RecordingSink>) {
        let _ = self.commands.send(LoopCommand::StartRecordingWith(sink));
    }

    /// Stop recording; a no-op when not recording.
    pub fn stop_recording(&self) {
        let _ = self.commands.send(LoopCommand::StopRecording);
    }
}

/// The frame loop driver
///
/// Owns the worker thread running the capture → detect → apply → publish
/// cycle. `Idle → Running` happens in [`FrameLoop::spawn`]; `stop` moves
/// to the terminal `Stopped` state, joining the worker and releasing the
/// capture source and any open recording sink exactly once.
pub struct FrameLoop {
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    handle: LoopHandle,
    events: Receiver<FrameEvent>,
}

impl FrameLoop {
    /// Spawn the worker and start processing immediately.
    pub fn spawn(
        capture: Box<dyn CaptureSource>,
        detector: Box<dyn LandmarkSource>,
        recording: RecordingParams,
        overlay: OverlayConfig,
    ) -> Result<Self> {
        let settings = SharedSettings::new();
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        let running = Arc::new(AtomicBool::new(true));

        let worker = {
            let running = Arc::clone(&running);
            let settings = settings.clone();
            std::thread::Builder::new()
                .name("frame-loop".to_string())
                .spawn(move || {
                    Worker {
                        capture,
                        detector,
                        pipeline: EffectPipeline::new(),
                        settings,
                        recording,
                        overlay,
                        commands: command_rx,
                        events: event_tx,
                        sink: None,
                        previous_cursor: None,
                        running,
                    }
                    .run();
                })?
        };

        Ok(Self {
            running,
            worker: Some(worker),
            handle: LoopHandle {
                settings,
                commands: command_tx,
            },
            events: event_rx,
        })
    }

    /// Get a control handle; cheap to clone and hand to the UI.
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Receiver for processed frames and state changes.
    pub fn events(&self) -> &Receiver<FrameEvent> {
        &self.events
    }

    /// Stop the loop and release its resources.
    ///
    /// Observed by the worker within one frame iteration. Idempotent; also
    /// runs on drop.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Frame loop worker panicked during shutdown");
            }
        }
    }

    /// Whether the worker is still running.
    pub fn is_running(&self) -> bool {
        self.worker.is_some() && self.running.load(Ordering::SeqCst)
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Worker-side state; lives entirely on the loop thread.
struct Worker {
    capture: Box<dyn CaptureSource>,
    detector: Box<dyn LandmarkSource>,
    pipeline: EffectPipeline,
    settings: SharedSettings,
    recording: RecordingParams,
    overlay: OverlayConfig,
    commands: Receiver<LoopCommand>,
    events: Sender<FrameEvent>,
    sink: Option<Box<dyn RecordingSink>>,
    previous_cursor: Option<(i32, i32)>,
    running: Arc<AtomicBool>,
}

impl Worker {
    fn run(mut self) {
        let (width, height) = self.capture.resolution();
        info!("Frame loop running at {}x{}", width, height);

        while self.running.load(Ordering::SeqCst) {
            self.drain_commands();

            // Capture is the only suspension point in the iteration
            let mut frame = match self.capture.read() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    debug!("No frame from capture, retrying");
                    continue;
                }
                Err(e) => {
                    warn!("Capture failed ({}), skipping iteration", e);
                    continue;
                }
            };

            let detection = self.detector.detect(&frame);
            let settings = self.settings.snapshot();
            self.pipeline.process(&mut frame, &detection, &settings);

            if settings.drawing {
                self.draw_overlay(&mut frame, &detection);
            } else {
                self.previous_cursor = None;
            }

            self.write_recording(&frame);

            let _ = self.events.send(FrameEvent::Frame(frame));
        }

        self.shutdown();
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                LoopCommand::StartRecording(path) => {
                    if self.sink.is_some() {
                        debug!("Already recording, ignoring start request");
                        continue;
                    }
                    match FrameSequenceSink::open(path, self.recording.clone()) {
                        Ok(sink) => self.install_sink(Box::new(sink)),
                        Err(e) => {
                            warn!("Could not open recording sink: {}", e);
                            let _ = self.events.send(FrameEvent::RecordingState(false));
                        }
                    }
                }
                LoopCommand::StartRecordingWith(sink) => {
                    if self.sink.is_some() {
                        debug!("Already recording, ignoring start request");
                        continue;
                    }
                    self.install_sink(sink);
                }
                LoopCommand::StopRecording => self.stop_recording(),
            }
        }
    }

    fn install_sink(&mut self, sink: Box<dyn RecordingSink>) {
        self.sink = Some(sink);
        let _ = self.events.send(FrameEvent::RecordingState(true));
    }

    /// Close the sink if one is open; stopping while idle is a no-op.
    fn stop_recording(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.close() {
                warn!("Closing recording sink failed: {}", e);
            }
            let _ = self.events.send(FrameEvent::RecordingState(false));
        }
    }

    fn write_recording(&mut self, frame: &Frame) {
        let write_failed = match self.sink.as_mut() {
            Some(sink) => match sink.write(frame) {
                Ok(()) => false,
                Err(e) => {
                    warn!("Recording write failed ({}), stopping recording", e);
                    true
                }
            },
            None => false,
        };
        if write_failed {
            // Surfaced once; the loop continues unrecorded
            self.stop_recording();
        }
    }

    /// Freehand drawing: a segment from the previous cursor position to
    /// the current one, steered by the index fingertip.
    fn draw_overlay(&mut self, frame: &mut Frame, detection: &Detection) {
        let cursor = detection
            .right_hand
            .as_ref()
            .and_then(|set| set.get(hand::INDEX_TIP))
            .or_else(|| {
                detection
                    .left_hand
                    .as_ref()
                    .and_then(|set| set.get(hand::INDEX_TIP))
            })
            .map(|landmark| landmark.to_pixel(frame.width(), frame.height()));

        match cursor {
            Some((x, y)) => {
                match self.previous_cursor {
                    Some((px, py)) => draw::thick_line(
                        frame,
                        px,
                        py,
                        x,
                        y,
                        self.overlay.thickness,
                        self.overlay.color,
                    ),
                    None => draw::filled_circle(
                        frame,
                        x,
                        y,
                        (self.overlay.thickness / 2) as i32,
                        self.overlay.color,
                    ),
                }
                self.previous_cursor = Some((x, y));
            }
            // No hand in view: the trail restarts when one returns
            None => self.previous_cursor = None,
        }
    }

    fn shutdown(&mut self) {
        // Sink closed exactly once on every exit path; the capture source
        // is released when the worker drops
        self.stop_recording();
        info!("Frame loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::detect::{Landmark, LandmarkSet, NoopDetector, SimulatedDetector};
    use crate::video::SyntheticCapture;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn spawn_loop(detector: Box<dyn LandmarkSource>) -> FrameLoop {
        FrameLoop::spawn(
            Box::new(SyntheticCapture::paced(32, 24, 500)),
            detector,
            RecordingParams::default(),
            OverlayConfig::default(),
        )
        .unwrap()
    }

    fn next_frame(frame_loop: &FrameLoop) -> Frame {
        loop {
            match frame_loop
                .events()
                .recv_timeout(Duration::from_secs(5))
                .expect("loop produced no event")
            {
                FrameEvent::Frame(frame) => return frame,
                FrameEvent::RecordingState(_) => continue,
            }
        }
    }

    /// Sink that counts close calls; the loop must close it exactly once.
    struct CountingSink {
        closes: Arc<AtomicUsize>,
        writes: Arc<AtomicUsize>,
        closed: bool,
    }

    impl RecordingSink for CountingSink {
        fn write(&mut self, _frame: &Frame) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            self.closed = true;
            Ok(())
        }

        fn is_closed(&self) -> bool {
            self.closed
        }
    }

    impl Drop for CountingSink {
        fn drop(&mut self) {
            if !self.closed {
                let _ = self.close();
            }
        }
    }

    #[test]
    fn test_frames_publish_in_capture_order() {
        let mut frame_loop = spawn_loop(Box::new(NoopDetector));
        let mut counters = Vec::new();
        for _ in 0..4 {
            let frame = next_frame(&frame_loop);
            let pixel = frame.get_pixel(0, 0);
            counters.push(pixel[0] as u32 | ((pixel[1] as u32) << 8));
        }
        frame_loop.stop();

        for pair in counters.windows(2) {
            assert_eq!(pair[1], pair[0] + 1, "frames out of order: {:?}", counters);
        }
    }

    #[test]
    fn test_stop_is_idempotent_and_observable() {
        let mut frame_loop = spawn_loop(Box::new(SimulatedDetector::new()));
        let _ = next_frame(&frame_loop);
        frame_loop.stop();
        assert!(!frame_loop.is_running());
        frame_loop.stop();
    }

    #[test]
    fn test_stop_while_recording_closes_sink_exactly_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        let writes = Arc::new(AtomicUsize::new(0));

        let mut frame_loop = spawn_loop(Box::new(NoopDetector));
        let handle = frame_loop.handle();
        handle.start_recording_with(Box::new(CountingSink {
            closes: Arc::clone(&closes),
            writes: Arc::clone(&writes),
            closed: false,
        }));

        // Let a few frames flow through the sink
        for _ in 0..3 {
            let _ = next_frame(&frame_loop);
        }
        frame_loop.stop();

        assert_eq!(closes.load(Ordering::SeqCst), 1, "sink closed more than once");
        assert!(writes.load(Ordering::SeqCst) > 0, "sink never written");
    }

    #[test]
    fn test_stop_recording_while_idle_is_noop() {
        let mut frame_loop = spawn_loop(Box::new(NoopDetector));
        let handle = frame_loop.handle();
        handle.stop_recording();
        // The loop keeps producing frames afterwards
        let _ = next_frame(&frame_loop);
        frame_loop.stop();
    }

    #[test]
    fn test_recording_open_failure_reports_state_and_loop_survives() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a directory").unwrap();

        let mut frame_loop = spawn_loop(Box::new(NoopDetector));
        frame_loop.handle().start_recording(&blocker);

        let mut saw_failure = false;
        for _ in 0..10 {
            match frame_loop.events().recv_timeout(Duration::from_secs(5)).unwrap() {
                FrameEvent::RecordingState(false) => {
                    saw_failure = true;
                    break;
                }
                _ => continue,
            }
        }
        assert!(saw_failure, "open failure never reported");
        // Loop still alive
        let _ = next_frame(&frame_loop);
        frame_loop.stop();
    }

    #[test]
    fn test_effect_toggle_applies_mid_stream() {
        let mut frame_loop = spawn_loop(Box::new(NoopDetector));
        let handle = frame_loop.handle();

        handle.set_brightness(127);
        // With max brightness the remap floor is 127, and the synthetic
        // pattern keeps the blue channel at (x + y) = 10 here, so any value
        // >= 127 proves the new settings reached the worker
        let mut brightened = false;
        for _ in 0..20 {
            let frame = next_frame(&frame_loop);
            if frame.get_pixel(5, 5)[2] >= 127 {
                brightened = true;
                break;
            }
        }
        assert!(brightened, "brightness change never took effect");
        frame_loop.stop();
    }

    /// Detector placing the index fingertip at a fixed spot.
    struct FingerAt(f32, f32);

    impl LandmarkSource for FingerAt {
        fn detect(&mut self, _frame: &Frame) -> Detection {
            let mut points = vec![Landmark::new(-1.0, -1.0); hand::COUNT];
            points[hand::INDEX_TIP] = Landmark::new(self.0, self.1);
            Detection {
                right_hand: Some(LandmarkSet::new(points)),
                ..Detection::default()
            }
        }
    }

    #[test]
    fn test_drawing_overlay_marks_cursor() {
        let mut frame_loop = spawn_loop(Box::new(FingerAt(0.5, 0.5)));
        let handle = frame_loop.handle();
        handle.set_drawing(true);

        let mut drawn = false;
        for _ in 0..20 {
            let frame = next_frame(&frame_loop);
            // Overlay color is green by default; cursor sits at (16, 12)
            if frame.get_pixel(16, 12) == [0, 255, 0] {
                drawn = true;
                break;
            }
        }
        assert!(drawn, "overlay never appeared at the cursor");
        frame_loop.stop();
    }
}
