use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::domain::{EmailRecord, QueueSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Normal,
}

impl Priority {
    pub fn for_email(email: &EmailRecord) -> Self {
        if email.needs_attention() {
            Priority::High
        } else {
            Priority::Normal
        }
    }
}

/// Two-lane FIFO; the high lane always drains first.
#[derive(Debug)]
pub struct InboxQueue<T> {
    high: Mutex<VecDeque<T>>,
    normal: Mutex<VecDeque<T>>,
}

impl<T> Default for InboxQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InboxQueue<T> {
    pub fn new() -> Self {
        Self {
            high: Mutex::new(VecDeque::new()),
            normal: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, priority: Priority, value: T) {
        match priority {
            Priority::High => self.high.lock().push_back(value),
            Priority::Normal => self.normal.lock().push_back(value),
        }
    }

    pub fn drain_ordered(&self) -> Vec<T> {
        let mut high = self.high.lock();
        let mut normal = self.normal.lock();
        let mut drained = Vec::with_capacity(high.len() + normal.len());
        drained.extend(high.drain(..));
        drained.extend(normal.drain(..));
        drained
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            high_priority: self.high.lock().len(),
            normal_priority: self.normal.lock().len(),
        }
    }
}

impl InboxQueue<EmailRecord> {
    pub fn enqueue(&self, email: EmailRecord) {
        self.push(Priority::for_email(&email), email);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_lane_drains_first_in_fifo_order() {
        let queue = InboxQueue::new();
        queue.push(Priority::Normal, 1);
        queue.push(Priority::High, 2);
        queue.push(Priority::Normal, 3);
        queue.push(Priority::High, 4);

        let snapshot = queue.snapshot();
        assert_eq!(snapshot.high_priority, 2);
        assert_eq!(snapshot.normal_priority, 2);

        assert_eq!(queue.drain_ordered(), vec![2, 4, 1, 3]);
        assert!(queue.drain_ordered().is_empty());
    }

    #[test]
    fn unread_and_starred_mail_is_high_priority() {
        let mut email = EmailRecord::new("1", "a@b.c", "s", "c");
        assert_eq!(Priority::for_email(&email), Priority::High);

        email.read = true;
        assert_eq!(Priority::for_email(&email), Priority::Normal);

        email.starred = true;
        assert_eq!(Priority::for_email(&email), Priority::High);
    }
}
