//! FIFO of user-facing error dialogs

use std::collections::VecDeque;

/// Contents of one dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogInfo {
    pub title: String,
    pub description: String,
}

/// Dialogs waiting to be shown; only the head is visible at a time
#[derive(Debug, Clone, Default)]
pub struct DialogQueue {
    queue: VecDeque<DialogInfo>,
}

impl DialogQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an error dialog behind any already waiting
    pub fn append_error_message(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.queue.push_back(DialogInfo {
            title: title.into(),
            description: description.into(),
        });
    }

    /// The dialog currently shown, if any
    pub fn head(&self) -> Option<&DialogInfo> {
        self.queue.front()
    }

    /// Dismisses the oldest dialog
    pub fn remove_head_message(&mut self) {
        self.queue.pop_front();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialogs_are_shown_oldest_first() {
        let mut queue = DialogQueue::new();
        queue.append_error_message("Error", "first");
        queue.append_error_message("Error", "second");

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.head().unwrap().description, "first");

        queue.remove_head_message();
        assert_eq!(queue.head().unwrap().description, "second");
    }

    #[test]
    fn test_remove_head_on_empty_queue_is_noop() {
        let mut queue = DialogQueue::new();

        queue.remove_head_message();

        assert!(queue.is_empty());
        assert!(queue.head().is_none());
    }
}
