use std::collections::VecDeque;

/// FIFO event queue.
///
/// Ordering contract: events are popped in exactly the order they were
/// posted. Each event carries a sequence number for traceability.
#[derive(Debug)]
pub struct EventQueue<E> {
    next_seq: u64,
    events: VecDeque<(u64, E)>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            events: VecDeque::new(),
        }
    }

    /// Appends `event` and returns its sequence number.
    pub fn post(&mut self, event: E) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.events.push_back((seq, event));
        seq
    }

    pub fn pop(&mut self) -> Option<(u64, E)> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
