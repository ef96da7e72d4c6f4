//! Cooperative task queue on a virtual millisecond clock.
//!
//! Tasks are plain values.  The owner pops whatever is due and runs it;
//! repeating work reschedules itself.  Cancelled tasks are dropped from the
//! payload table and their heap entries skipped lazily.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug)]
pub struct TaskQueue<T> {
    now_ms: u64,
    next_seq: u64,
    /// `(due_ms, seq)`; `seq` keeps same-instant tasks in scheduling order.
    heap: BinaryHeap<Reverse<(u64, u64)>>,
    tasks: HashMap<u64, T>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            heap: BinaryHeap::new(),
            tasks: HashMap::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse((self.now_ms + delay_ms, seq)));
        self.tasks.insert(seq, task);
        TaskHandle(seq)
    }

    /// Cancel one task.  Returns it if it was still pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        self.tasks.remove(&handle.0)
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
        self.heap.clear();
    }

    /// Keep only the pending tasks for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.tasks.retain(|_, task| keep(task));
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.contains_key(&handle.0)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.tasks.values()
    }

    /// Earliest due time among live tasks.
    pub fn next_due(&mut self) -> Option<u64> {
        self.skip_cancelled();
        self.heap.peek().map(|Reverse((due, _))| *due)
    }

    /// Pop the next task due at or before `until_ms`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TaskHandle, T)> {
        self.skip_cancelled();
        let Reverse((due, seq)) = *self.heap.peek()?;
        if due > until_ms {
            return None;
        }
        self.heap.pop();
        self.now_ms = self.now_ms.max(due);
        self.tasks.remove(&seq).map(|task| (TaskHandle(seq), task))
    }

    /// Move the clock forward without running anything.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    fn skip_cancelled(&mut self) {
        while let Some(Reverse((_, seq))) = self.heap.peek() {
            if self.tasks.contains_key(seq) {
                break;
            }
            self.heap.pop();
        }
    }
}
