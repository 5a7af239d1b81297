//! Live exercise session: a tokio task ticking the exercise engine
//!
//! The task ticks once per `EXERCISE_TICK_MS`, feeds the measured elapsed
//! time to the engine, and publishes the resulting frame. Frames are sent
//! while the engine lock is held, so once `stop()` has taken the lock and
//! moved the engine to IDLE no further frame can be published.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::core::exercise::ExerciseEngine;
use crate::core::timer::TimerGuard;
use crate::types::{ExerciseEvent, ExerciseFrame, ExerciseStatus, Technique};
use crate::EXERCISE_TICK_MS;

/// Receiving side of a session's frame stream
pub type FrameReceiver = mpsc::UnboundedReceiver<ExerciseFrame>;

/// A running breathing exercise
#[derive(Debug)]
pub struct ExerciseSession {
    engine: Arc<Mutex<ExerciseEngine>>,
    frames: mpsc::UnboundedSender<ExerciseFrame>,
    timer: TimerGuard,
}

impl ExerciseSession {
    /// Start `technique` and spawn its ticker. The first frame (stage 0)
    /// is published immediately.
    pub fn start(technique: Technique) -> (Self, FrameReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Arc::new(Mutex::new(ExerciseEngine::new()));

        if let Ok(mut engine) = engine.lock() {
            if let Some(frame) = engine.handle(ExerciseEvent::Start(technique)) {
                let _ = tx.send(frame);
            }
        }
        tracing::debug!(technique = technique.id(), "exercise started");

        let handle = tokio::spawn(run_ticker(engine.clone(), tx.clone()));
        let session = Self {
            engine,
            frames: tx,
            timer: TimerGuard::new("exercise", handle),
        };
        (session, rx)
    }

    pub fn pause(&self) {
        self.send_event(ExerciseEvent::Pause);
    }

    pub fn resume(&self) {
        self.send_event(ExerciseEvent::Resume);
    }

    /// Cancel the ticker and drop the run state
    pub fn stop(&mut self) {
        self.timer.cancel();
        if let Ok(mut engine) = self.engine.lock() {
            if engine.status() != ExerciseStatus::Idle {
                engine.handle(ExerciseEvent::Stop);
                tracing::debug!("exercise stopped");
            }
        }
    }

    pub fn status(&self) -> ExerciseStatus {
        self.engine
            .lock()
            .map(|e| e.status())
            .unwrap_or(ExerciseStatus::Idle)
    }

    /// Current frame, `None` once stopped
    pub fn frame(&self) -> Option<ExerciseFrame> {
        self.engine.lock().ok().and_then(|e| e.frame())
    }

    fn send_event(&self, event: ExerciseEvent) {
        if let Ok(mut engine) = self.engine.lock() {
            if let Some(frame) = engine.handle(event) {
                let _ = self.frames.send(frame);
            }
        }
    }
}

impl Drop for ExerciseSession {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_ticker(engine: Arc<Mutex<ExerciseEngine>>, tx: mpsc::UnboundedSender<ExerciseFrame>) {
    let period = Duration::from_millis(EXERCISE_TICK_MS);
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();

    loop {
        interval.tick().await;
        let now = Instant::now();
        let dt = now - last;
        last = now;

        if !tick_once(&engine, &tx, dt) {
            break;
        }
    }
}

/// Apply one tick and publish its frame. Returns false when the ticker
/// should exit.
fn tick_once(
    engine: &Mutex<ExerciseEngine>,
    tx: &mpsc::UnboundedSender<ExerciseFrame>,
    dt: Duration,
) -> bool {
    let Ok(mut state) = engine.lock() else {
        return false;
    };
    let paused = state.status() == ExerciseStatus::Paused;
    match state.handle(ExerciseEvent::Tick(dt)) {
        Some(frame) if !paused => {
            if tx.send(frame).is_err() {
                tracing::debug!("frame receiver dropped, ticker exiting");
                return false;
            }
            true
        }
        Some(_) => true,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut FrameReceiver) -> Vec<ExerciseFrame> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(frame);
        }
        frames
    }

    #[tokio::test(start_paused = true)]
    async fn test_frames_published_each_second() {
        let (mut session, mut rx) = ExerciseSession::start(Technique::Box);
        tokio::time::sleep(Duration::from_millis(3500)).await;

        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].countdown, 4);
        let last = frames.last().unwrap();
        assert_eq!(last.elapsed_secs, 3);
        assert_eq!(last.countdown, 1);
        session.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_frames_after_stop() {
        let (mut session, mut rx) = ExerciseSession::start(Technique::FourSevenEight);
        tokio::time::sleep(Duration::from_millis(2500)).await;
        session.stop();
        drain(&mut rx);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(drain(&mut rx).is_empty());
        assert_eq!(session.status(), ExerciseStatus::Idle);
        assert!(session.frame().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_progress() {
        let (session, mut rx) = ExerciseSession::start(Technique::Coherent);
        tokio::time::sleep(Duration::from_millis(2500)).await;
        session.pause();
        drain(&mut rx);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(drain(&mut rx).is_empty());
        assert_eq!(session.status(), ExerciseStatus::Paused);
        assert_eq!(session.frame().unwrap().elapsed_secs, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticker() {
        let (session, mut rx) = ExerciseSession::start(Technique::Box);
        drop(session);
        drain(&mut rx);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
