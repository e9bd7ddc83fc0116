use crate::guard::violation::{Rule, Severity, Verdict, Violation};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, mpsc};

/// Number of violations retained by the guard; the oldest is evicted first.
pub const VIOLATION_LOG_CAPACITY: usize = 50;

type Subscriber = Arc<dyn Fn(&Violation) + Send + Sync>;

/// Handle returned by [`InvariantGuard::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct GuardState {
    log: VecDeque<Violation>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

/// Session-owned invariant checker with a bounded violation log.
///
/// The guard is the only shared mutable state in the core. Its log and subscriber list sit
/// behind one mutex, so checks may run on a render worker while a UI thread reads
/// [`InvariantGuard::recent`]. Subscribers are invoked synchronously on the checking thread,
/// after the lock is released.
pub struct InvariantGuard {
    state: Mutex<GuardState>,
}

impl Default for InvariantGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InvariantGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.lock();
        f.debug_struct("InvariantGuard")
            .field("logged", &st.log.len())
            .field("subscribers", &st.subscribers.len())
            .finish()
    }
}

impl InvariantGuard {
    /// Create a guard with an empty log and no subscribers.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GuardState {
                log: VecDeque::with_capacity(VIOLATION_LOG_CAPACITY),
                ..GuardState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GuardState> {
        // A panicking subscriber never runs under this lock, so the state is always consistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a callback invoked for every future violation.
    pub fn subscribe(&self, f: impl Fn(&Violation) + Send + Sync + 'static) -> SubscriptionId {
        let mut st = self.lock();
        let id = SubscriptionId(st.next_id);
        st.next_id += 1;
        st.subscribers.push((id, Arc::new(f)));
        id
    }

    /// Receive future violations over a channel instead of a callback.
    ///
    /// The subscription stays registered until [`InvariantGuard::unsubscribe`]; sends to a
    /// dropped receiver are ignored.
    pub fn subscribe_channel(&self) -> (SubscriptionId, mpsc::Receiver<Violation>) {
        let (tx, rx) = mpsc::channel();
        let id = self.subscribe(move |v| {
            let _ = tx.send(v.clone());
        });
        (id, rx)
    }

    /// Remove a subscription. Returns `false` when the id was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut st = self.lock();
        let before = st.subscribers.len();
        st.subscribers.retain(|(sid, _)| *sid != id);
        st.subscribers.len() != before
    }

    /// Snapshot of the retained violations, oldest first.
    pub fn recent(&self) -> Vec<Violation> {
        self.lock().log.iter().cloned().collect()
    }

    /// Number of retained violations.
    pub fn len(&self) -> usize {
        self.lock().log.len()
    }

    /// `true` when no violation is retained.
    pub fn is_empty(&self) -> bool {
        self.lock().log.is_empty()
    }

    /// Drop every retained violation.
    pub fn clear(&self) {
        self.lock().log.clear();
    }

    pub(crate) fn report(
        &self,
        rule: Rule,
        severity: Severity,
        context: &str,
        message: String,
        corrected_value: Option<f64>,
    ) -> Violation {
        let v = Violation {
            rule,
            message,
            context: context.to_owned(),
            severity,
            timestamp: chrono::Utc::now(),
            auto_corrected: corrected_value.is_some(),
            corrected_value,
        };

        match severity {
            Severity::Warning => tracing::warn!(rule = %rule, context, "{}", v.message),
            Severity::Error => tracing::error!(rule = %rule, context, "{}", v.message),
        }

        let subscribers: Vec<Subscriber> = {
            let mut st = self.lock();
            if st.log.len() == VIOLATION_LOG_CAPACITY {
                st.log.pop_front();
            }
            st.log.push_back(v.clone());
            st.subscribers.iter().map(|(_, s)| Arc::clone(s)).collect()
        };
        for s in subscribers {
            s(&v);
        }
        v
    }

    pub(crate) fn verdict(
        &self,
        rule: Rule,
        severity: Severity,
        context: &str,
        message: String,
    ) -> Verdict {
        let v = self.report(rule, severity, context, message, None);
        match severity {
            Severity::Warning => Verdict::Degraded(v),
            Severity::Error => Verdict::Abort(v),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/guard/log.rs"]
mod tests;
