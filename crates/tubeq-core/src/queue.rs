//! FIFO of ingested records awaiting dispatch.

use std::collections::VecDeque;

use crate::url_model::UrlRecord;

/// Filled once from ingestion, then drained from the head by the scheduler.
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: VecDeque<UrlRecord>,
}

impl WorkQueue {
    pub fn new(records: impl IntoIterator<Item = UrlRecord>) -> Self {
        Self {
            items: records.into_iter().collect(),
        }
    }

    pub fn pop_front(&mut self) -> Option<UrlRecord> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_insertion_order() {
        let mut q = WorkQueue::new(vec![
            UrlRecord::new("https://example.com/1"),
            UrlRecord::new("https://example.com/2"),
        ]);
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop_front().unwrap().url(), "https://example.com/1");
        assert_eq!(q.pop_front().unwrap().url(), "https://example.com/2");
        assert!(q.pop_front().is_none());
        assert!(q.is_empty());
    }
}
