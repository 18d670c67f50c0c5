use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};

const PROGRESS_COLUMNS: u32 = 80;

/// Point-in-time view of a counter register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub succeeded: u32,
    pub failed: u32,
    pub total: u32,
}

/// Per-batch counters. One instance per dispatched directory or archive,
/// shared by every worker in the pool; field-level atomics so concurrent
/// increments never tear.
#[derive(Debug, Default)]
pub struct BatchStats {
    succeeded: AtomicU32,
    failed: AtomicU32,
    total: AtomicU32,
    col: AtomicU32,
}

/// Process-wide counters, accumulated across every batch of a run and never
/// reset. Constructed once by the caller and handed to each dispatch.
#[derive(Debug, Default)]
pub struct TotalStats {
    succeeded: AtomicU32,
    failed: AtomicU32,
    total: AtomicU32,
    minutes: AtomicU32,
}

impl BatchStats {
    /// Tallies one finished task on both registers and prints the progress
    /// glyph, wrapping the line every 80 tasks.
    pub fn record(&self, totals: &TotalStats, success: bool) {
        if success {
            print!(".");
            self.succeeded.fetch_add(1, Ordering::Relaxed);
            totals.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            print!("x");
            self.failed.fetch_add(1, Ordering::Relaxed);
            totals.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.total.fetch_add(1, Ordering::Relaxed);
        totals.total.fetch_add(1, Ordering::Relaxed);

        if self.col.fetch_add(1, Ordering::Relaxed) + 1 >= PROGRESS_COLUMNS {
            self.col.store(0, Ordering::Relaxed);
            println!();
        }
        let _ = std::io::stdout().flush();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            total: self.total.load(Ordering::Relaxed),
        }
    }
}

impl TotalStats {
    pub fn add_minutes(&self, minutes: u32) {
        self.minutes.fetch_add(minutes, Ordering::Relaxed);
    }

    pub fn minutes(&self) -> u32 {
        self.minutes.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            total: self.total.load(Ordering::Relaxed),
        }
    }
}

/// Renders "S: n [p%], F: n [p%], T: n", or an explanation when nothing ran
/// at all so percentages would divide by zero.
pub fn print_summary(snap: &Snapshot) {
    if snap.total == 0 {
        println!("No files were processed. Is the path to the game folder correct?");
        return;
    }
    let pct = |n: u32| (f64::from(n) / f64::from(snap.total)) * 100.0;
    println!(
        "S: {} [{:.2}%], F: {} [{:.2}%], T: {}",
        snap.succeeded,
        pct(snap.succeeded),
        snap.failed,
        pct(snap.failed),
        snap.total
    );
}
