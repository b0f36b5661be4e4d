// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic one-shot timers on a millisecond clock.
//!
//! Delays and transition completions are the only asynchronous boundaries in
//! the tooltip lifecycle. They are modelled as tasks in a queue ordered by due
//! time, then by scheduling order, and are run by
//! [`TooltipHost::advance`](crate::TooltipHost::advance).

use alloc::collections::BTreeMap;
use hashbrown::HashMap;
use kurbo::Point;

use crate::events::Event;
use crate::instance::InstanceId;

/// Handle to a scheduled task, used for cancellation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub(crate) struct TimerId(u64);

/// Work deferred to a later tick.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Task {
    /// A debounced `show` whose delay elapsed.
    Show(InstanceId),
    /// A debounced `hide` whose delay elapsed.
    Hide(InstanceId),
    /// The show transition of `generation` has run its duration.
    ShowComplete(InstanceId, u64),
    /// The hide transition of `generation` has run its duration.
    HideComplete(InstanceId, u64),
    /// Debounced follow-cursor move; only the latest position survives.
    FollowCursor(InstanceId, Point),
    /// Debounced interactive-border check for the latest pointer move.
    InteractiveMove(InstanceId, Event),
    /// Scan the document for declarative tooltips.
    AutoInit,
}

/// Pending tasks ordered by due time.
#[derive(Clone, Debug, Default)]
pub(crate) struct TimerQueue {
    now: u64,
    next_id: u64,
    queue: BTreeMap<(u64, TimerId), Task>,
    due: HashMap<TimerId, u64>,
}

impl TimerQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current clock value in milliseconds.
    pub(crate) fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `task` to run `delay` milliseconds from now.
    pub(crate) fn schedule(&mut self, delay: u64, task: Task) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now.saturating_add(delay);
        self.queue.insert((due, id), task);
        self.due.insert(id, due);
        id
    }

    /// Cancel a task. Returns `false` if it already ran or was cancelled.
    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        match self.due.remove(&id) {
            Some(due) => self.queue.remove(&(due, id)).is_some(),
            None => false,
        }
    }

    /// Returns true if `id` is still waiting to run.
    pub(crate) fn is_pending(&self, id: TimerId) -> bool {
        self.due.contains_key(&id)
    }

    /// Pop the earliest task due at or before `until`, moving the clock to its due time.
    pub(crate) fn pop_due(&mut self, until: u64) -> Option<Task> {
        let (&(due, id), _) = self.queue.first_key_value()?;
        if due > until {
            return None;
        }
        let task = self.queue.remove(&(due, id))?;
        self.due.remove(&id);
        self.now = self.now.max(due);
        Some(task)
    }

    /// Move the clock forward without running anything.
    pub(crate) fn set_now(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}
