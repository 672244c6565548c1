//! One-shot notifications passed between flows.
//!
//! Success and failure signals travel through an explicit queue instead of
//! ambient navigation flags: the producing flow pushes, the rendering view
//! pops, and each notification is consumed exactly once.

use std::collections::VecDeque;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A single one-shot message for the next view render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    /// Create a success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    /// Create an error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// FIFO queue of one-shot notifications.
///
/// `pop` removes the notification, so a message shown once is gone.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    queue: VecDeque<Notification>,
}

impl NotificationQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a notification for the next render.
    pub fn push(&mut self, notification: Notification) {
        self.queue.push_back(notification);
    }

    /// Take the oldest pending notification, consuming it.
    pub fn pop(&mut self) -> Option<Notification> {
        self.queue.pop_front()
    }

    /// Whether anything is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_consumed_exactly_once() {
        let mut queue = NotificationQueue::new();
        queue.push(Notification::success("Order placed successfully!"));

        let first = queue.pop();
        assert_eq!(
            first,
            Some(Notification::success("Order placed successfully!"))
        );
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = NotificationQueue::new();
        queue.push(Notification::success("a"));
        queue.push(Notification::error("b"));

        assert_eq!(queue.pop().map(|n| n.message), Some("a".to_string()));
        assert_eq!(queue.pop().map(|n| n.severity), Some(Severity::Error));
        assert!(queue.is_empty());
    }
}
