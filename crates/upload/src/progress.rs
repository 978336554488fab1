use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Callback invoked with the upload progress percent (0–100).
pub type ProgressFn = Box<dyn Fn(u8) + Send + Sync>;

/// Concurrency-safe monotonic progress reporter.
///
/// One increment per successfully uploaded part. Reported values are capped
/// at 99 until [`finish`](Self::finish), which reports 100 exactly once.
/// The counter lock is held across the callback invocation (never across an
/// await point) so the reported sequence is non-decreasing even when parts
/// complete concurrently.
pub struct ProgressReporter {
    done: Mutex<u64>,
    total: u64,
    finished: AtomicBool,
    callback: Option<ProgressFn>,
}

impl ProgressReporter {
    pub fn new(total: u64, callback: Option<ProgressFn>) -> Self {
        Self {
            done: Mutex::new(0),
            total,
            finished: AtomicBool::new(false),
            callback,
        }
    }

    /// Records one completed part and reports the capped percent.
    ///
    /// Must not be called for a session with zero parts; an empty session
    /// has no part jobs and goes straight to [`finish`](Self::finish).
    pub fn part_done(&self) {
        debug_assert!(self.total > 0, "part_done on an empty session");
        let mut done = self.done.lock().unwrap();
        *done += 1;
        let percent = ((*done * 100) / self.total).min(99) as u8;
        if let Some(cb) = &self.callback {
            cb(percent);
        }
    }

    /// Reports 100. Effective exactly once per session, after finalization.
    pub fn finish(&self) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(cb) = &self.callback {
            cb(100);
        }
    }

    /// Number of parts recorded as completed.
    pub fn completed(&self) -> u64 {
        *self.done.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recording_reporter(total: u64) -> (Arc<ProgressReporter>, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reporter = ProgressReporter::new(
            total,
            Some(Box::new(move |p| sink.lock().unwrap().push(p))),
        );
        (Arc::new(reporter), seen)
    }

    #[test]
    fn reports_floor_percent_capped_at_99() {
        let (reporter, seen) = recording_reporter(3);
        reporter.part_done();
        reporter.part_done();
        reporter.part_done();
        assert_eq!(*seen.lock().unwrap(), vec![33, 66, 99]);
    }

    #[test]
    fn finish_reports_100_exactly_once() {
        let (reporter, seen) = recording_reporter(1);
        reporter.part_done();
        reporter.finish();
        reporter.finish();
        assert_eq!(*seen.lock().unwrap(), vec![99, 100]);
    }

    #[test]
    fn empty_session_reports_only_100() {
        let (reporter, seen) = recording_reporter(0);
        reporter.finish();
        assert_eq!(*seen.lock().unwrap(), vec![100]);
    }

    #[test]
    fn concurrent_increments_stay_monotonic() {
        let (reporter, seen) = recording_reporter(100);

        let mut handles = Vec::new();
        for _ in 0..10 {
            let r = Arc::clone(&reporter);
            handles.push(std::thread::spawn(move || {
                for _ in 0..10 {
                    r.part_done();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(reporter.completed(), 100);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 100);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "sequence decreased");
        assert_eq!(*seen.last().unwrap(), 99);
    }

    #[test]
    #[should_panic]
    fn part_done_on_empty_session_is_a_bug() {
        let reporter = ProgressReporter::new(0, None);
        reporter.part_done();
    }

    #[test]
    fn no_callback_is_fine() {
        let reporter = ProgressReporter::new(2, None);
        reporter.part_done();
        reporter.finish();
        assert_eq!(reporter.completed(), 1);
    }
}
