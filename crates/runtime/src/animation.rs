use tracing::debug;

use crate::frame::{Frame, FrameClock};

/// Receives the frames produced by an [`AnimationLoop`].
pub trait FrameHandler {
    fn on_frame(&mut self, frame: Frame);

    /// Called exactly once when the loop is stopped for good.
    fn on_teardown(&mut self) {}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopState {
    /// Built but not started; ticks are ignored.
    Idle,
    Running,
    /// Torn down. Terminal.
    Stopped,
}

/// Explicit owner of the per-frame callback lifecycle.
///
/// The host (a `requestAnimationFrame` closure, a test, a native event loop)
/// calls [`AnimationLoop::tick`] with its display timestamp and schedules the
/// next callback only while `tick` returns `true`.
pub struct AnimationLoop<H: FrameHandler> {
    handler: H,
    clock: FrameClock,
    state: LoopState,
}

impl<H: FrameHandler> AnimationLoop<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            clock: FrameClock::new(),
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Starts (or resumes) the loop. Has no effect once stopped.
    pub fn start(&mut self) {
        match self.state {
            LoopState::Idle => {
                debug!("animation loop started");
                self.clock.resync();
                self.state = LoopState::Running;
            }
            LoopState::Running => {}
            LoopState::Stopped => debug!("ignoring start on a stopped animation loop"),
        }
    }

    /// Stops the loop and tears the handler down. Idempotent.
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        self.handler.on_teardown();
        debug!("animation loop stopped");
    }

    /// Runs one frame. Returns whether the host should schedule another.
    pub fn tick(&mut self, timestamp_s: f64) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        let frame = self.clock.tick(timestamp_s);
        self.handler.on_frame(frame);
        true
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access for input routing between frames.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimationLoop, FrameHandler, LoopState};
    use crate::frame::Frame;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
        teardowns: u32,
    }

    impl FrameHandler for Recorder {
        fn on_frame(&mut self, frame: Frame) {
            self.frames.push(frame);
        }

        fn on_teardown(&mut self) {
            self.teardowns += 1;
        }
    }

    #[test]
    fn idle_loop_ignores_ticks() {
        let mut lp = AnimationLoop::new(Recorder::default());
        assert!(!lp.tick(0.0));
        assert!(lp.handler().frames.is_empty());
        assert_eq!(lp.state(), LoopState::Idle);
    }

    #[test]
    fn running_loop_forwards_frames() {
        let mut lp = AnimationLoop::new(Recorder::default());
        lp.start();
        assert!(lp.tick(1.0));
        assert!(lp.tick(1.1));
        let frames = &lp.handler().frames;
        assert_eq!(frames.len(), 2);
        assert!((frames[1].dt_s - 0.1).abs() < 1e-12);
    }

    #[test]
    fn stop_is_terminal_and_tears_down_once() {
        let mut lp = AnimationLoop::new(Recorder::default());
        lp.start();
        lp.tick(0.0);
        lp.stop();
        lp.stop();
        assert!(!lp.tick(1.0));
        lp.start();
        assert!(!lp.is_running());
        assert_eq!(lp.handler().teardowns, 1);
        assert_eq!(lp.handler().frames.len(), 1);
    }
}
