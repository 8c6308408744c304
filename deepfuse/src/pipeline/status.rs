use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Per-scanline progress through the pipeline.
///
/// Transitions are monotone: `Empty → Loaded → Merged → Flattened`. Once a
/// scanline is `Flattened` its ring slot may be reclaimed by the loader for
/// scanline `y + W`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RowStatus {
    /// Slot not yet populated for this scanline.
    Empty,
    /// Every layer's row has been read.
    Loaded,
    /// The merged row is complete.
    Merged,
    /// The row has been flattened and its slot cleared.
    Flattened,
}

struct State {
    rows: Vec<RowStatus>,
    failed: bool,
}

/// Shared scanline-status vector plus the process-wide failure flag.
///
/// This is the sole coordination signal between the three workers: each
/// status is advanced by exactly one stage and awaited by its consumer.
/// Publishing under the mutex and waking the condvar provides the
/// happens-before edge between a stage's writes to a slot and its consumer's
/// reads.
pub struct StatusBoard {
    state: Mutex<State>,
    cond: Condvar,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StatusBoard {
    /// Board for `height` scanlines, all `Empty`.
    pub fn new(height: usize) -> Self {
        Self {
            state: Mutex::new(State {
                rows: vec![RowStatus::Empty; height],
                failed: false,
            }),
            cond: Condvar::new(),
        }
    }

    /// Advance scanline `y` to `status` and wake every waiter.
    ///
    /// Statuses never regress; publishing an earlier status is a stage
    /// protocol bug.
    pub fn publish(&self, y: usize, status: RowStatus) {
        let mut st = lock(&self.state);
        debug_assert!(st.rows[y] < status, "status regression on scanline {y}");
        st.rows[y] = st.rows[y].max(status);
        drop(st);
        self.cond.notify_all();
    }

    /// Block until scanline `y` reaches `status` or the pipeline fails.
    ///
    /// Returns `false` when the failure flag was observed; the caller should
    /// exit at this safe boundary without publishing further statuses.
    pub fn wait_at_least(&self, y: usize, status: RowStatus) -> bool {
        let mut st = lock(&self.state);
        loop {
            if st.failed {
                return false;
            }
            if st.rows[y] >= status {
                return true;
            }
            st = self
                .cond
                .wait(st)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Record a fatal failure and wake every waiter.
    pub fn fail(&self) {
        let mut st = lock(&self.state);
        st.failed = true;
        drop(st);
        self.cond.notify_all();
    }

    /// Return `true` once any worker has recorded a failure.
    pub fn failed(&self) -> bool {
        lock(&self.state).failed
    }

    /// Current status of scanline `y`.
    pub fn status(&self, y: usize) -> RowStatus {
        lock(&self.state).rows[y]
    }
}
