//! Single-shot timers on a virtual clock
//!
//! Everything runs on one logical thread: the owner advances the clock and
//! drains due continuations in deadline order. Tokens carry the generation
//! they were issued in; [`Scheduler::cancel_all`] bumps the generation so no
//! earlier token can fire or be confused with a later one.

/// Deadlines this close to the target still fire (float drift between
/// `now + a + b` and `now + (a + b)`)
const DUE_EPSILON: f64 = 1e-9;

/// Handle to a scheduled continuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    id: u64,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    token: TimerToken,
    due: f64,
    task: T,
}

/// Timer queue over task values of type `T`
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: f64,
    next_id: u64,
    generation: u32,
    queue: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            generation: 0,
            queue: Vec::new(),
        }
    }

    /// Current virtual time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of continuations still waiting
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Schedule `task` to fire `delay` seconds from now
    pub fn schedule(&mut self, delay: f64, task: T) -> TimerToken {
        let token = TimerToken {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id += 1;
        self.queue.push(Scheduled {
            token,
            due: self.now + delay.max(0.0),
            task,
        });
        token
    }

    /// Cancel one continuation. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.queue.len();
        self.queue.retain(|s| s.token != token);
        self.queue.len() != before
    }

    /// Drop every outstanding continuation and invalidate all issued tokens
    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Pop the earliest continuation due at or before `until`, moving the clock
    /// to its deadline. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: f64) -> Option<T> {
        let (idx, _) = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= until + DUE_EPSILON)
            .min_by(|(_, a), (_, b)| {
                a.due
                    .partial_cmp(&b.due)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.token.id.cmp(&b.token.id))
            })?;
        let scheduled = self.queue.remove(idx);
        self.now = self.now.max(scheduled.due);
        Some(scheduled.task)
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now: f64) {
        self.now = self.now.max(now);
    }
}
