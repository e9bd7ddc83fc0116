use serde::Serialize;

/// One progress report, delivered after each sequence frame is written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Frames written so far (1-based).
    pub current_frame: u64,
    /// Frames in the sequence.
    pub total_frames: u64,
    /// `100 * current_frame / total_frames`, rounded down.
    pub percent: u32,
    /// File name of the frame just written.
    pub filename: String,
}

impl Progress {
    pub(crate) fn new(current_frame: u64, total_frames: u64, filename: String) -> Self {
        let percent = if total_frames == 0 {
            100
        } else {
            ((current_frame.min(total_frames) * 100) / total_frames) as u32
        };
        Self {
            current_frame,
            total_frames,
            percent,
            filename,
        }
    }
}

/// Receives sequence progress in frame order.
pub trait ProgressObserver {
    /// Called once per written frame.
    fn on_progress(&mut self, progress: &Progress);
}

impl<F: FnMut(&Progress)> ProgressObserver for F {
    fn on_progress(&mut self, progress: &Progress) {
        self(progress)
    }
}
