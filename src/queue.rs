use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// A mutex-guarded FIFO queue shared between the pool manager and its
/// workers. Insertion order is service order. Closing the queue is a one-way
/// signal that wakes every blocked consumer; it does not discard anything.
pub struct Queue<T> {
    inner: Mutex<State<T>>,
    available: Condvar,
}

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> Queue<T> {
    pub fn new() -> Queue<T> {
        Queue {
            inner: Mutex::new(State {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Append an item at the tail. Never fails, even after `close`: the
    /// closed flag only stops consumers from taking new work.
    pub fn insert(&self, item: T) {
        let mut state = self.lock();
        state.items.push_back(item);
        self.available.notify_one();
    }

    /// Pop the earliest-inserted item without blocking.
    pub fn try_remove_front(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Block until an item is available or the queue is closed. The closed
    /// flag is checked first, so once the queue is closed no further items
    /// are handed out; they stay resident for the teardown path.
    pub fn remove_front_blocking(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if state.closed {
                return None;
            }
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            state = self
                .available
                .wait(state)
                .expect("queue mutex poisoned");
        }
    }

    /// Close the queue and wake all blocked consumers.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        self.available.notify_all();
    }

    /// Discard everything currently in the queue, returning how many items
    /// were dropped. Used only at teardown, in a quiescent state.
    pub fn flush(&self) -> usize {
        let mut state = self.lock();
        let discarded = state.items.len();
        state.items.clear();
        discarded
    }

    /// Advisory snapshot, racy unless externally synchronized.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State<T>> {
        self.inner.lock().expect("queue mutex poisoned")
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Queue::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Queue;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fifo_order() {
        let queue = Queue::new();
        queue.insert("a");
        queue.insert("b");
        queue.insert("c");

        assert_eq!(queue.try_remove_front(), Some("a"));
        assert_eq!(queue.try_remove_front(), Some("b"));
        assert_eq!(queue.try_remove_front(), Some("c"));
        assert_eq!(queue.try_remove_front(), None);
    }

    #[test]
    fn empty_poll_is_not_an_error() {
        let queue: Queue<u32> = Queue::new();
        assert_eq!(queue.try_remove_front(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn flush_reports_discarded_count() {
        let queue = Queue::new();
        for i in 0..5 {
            queue.insert(i);
        }
        assert_eq!(queue.flush(), 5);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn insert_succeeds_after_close() {
        let queue = Queue::new();
        queue.close();
        queue.insert(1);
        assert_eq!(queue.len(), 1);
        // a blocking consumer sees the closed flag, not the item
        assert_eq!(queue.remove_front_blocking(), None);
        assert_eq!(queue.try_remove_front(), Some(1));
    }

    #[test]
    fn close_wakes_blocked_consumer() {
        let queue: Arc<Queue<u32>> = Arc::new(Queue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.remove_front_blocking())
        };

        thread::sleep(Duration::from_millis(50));
        queue.close();
        assert_eq!(consumer.join().unwrap(), None);
    }

    #[test]
    fn blocked_consumer_receives_item() {
        let queue: Arc<Queue<u32>> = Arc::new(Queue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.remove_front_blocking())
        };

        thread::sleep(Duration::from_millis(50));
        queue.insert(7);
        assert_eq!(consumer.join().unwrap(), Some(7));
    }
}
