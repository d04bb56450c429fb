//! Rate-limited detection loop
//!
//! The capture side ticks at display rate; only one tick per interval is
//! analysed. Stopping is a flag checked on every tick.

use crate::config::LoopConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Loop stopped; schedule nothing further
    Stopped,
    /// Draw the frame, skip analysis
    Skip,
    Analyze,
}

pub struct DetectionLoop {
    interval_ms: f64,
    last_analysis_ms: Option<f64>,
    running: bool,
}

impl DetectionLoop {
    pub fn new(config: &LoopConfig) -> Self {
        Self {
            interval_ms: config.detect_interval_ms,
            last_analysis_ms: None,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        self.last_analysis_ms = None;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&mut self, now_ms: f64) -> Tick {
        if !self.running {
            return Tick::Stopped;
        }
        match self.last_analysis_ms {
            Some(last) if now_ms - last < self.interval_ms => Tick::Skip,
            _ => {
                self.last_analysis_ms = Some(now_ms);
                Tick::Analyze
            }
        }
    }
}

impl Default for DetectionLoop {
    fn default() -> Self {
        Self::new(&LoopConfig::default())
    }
}
