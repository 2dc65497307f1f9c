//! Bounded, blocking symbol buffer shared by one producer and one consumer
//!
//! A `ringbuf::HeapRb` behind a mutex, with a condvar for both directions:
//! - `push` blocks until at least `min(notify_size, pending)` slots are free
//! - `pop` blocks until at least one symbol is queued
//! - `close` wakes everyone; afterwards `push` refuses and `pop` drains
//!   what is left, then returns 0

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use num_complex::Complex32;
use ringbuf::traits::{Consumer, Observer, Producer};
use ringbuf::HeapRb;

struct Inner {
    ring: HeapRb<Complex32>,
    open: bool,
}

pub struct SymbolBuffer {
    inner: Mutex<Inner>,
    changed: Condvar,
    notify_size: usize,
}

impl SymbolBuffer {
    /// `notify_size` is clamped to `1..=capacity`
    pub fn new(capacity: usize, notify_size: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Inner {
                ring: HeapRb::new(capacity),
                open: true,
            }),
            changed: Condvar::new(),
            notify_size: notify_size.clamp(1, capacity),
        }
    }

    // A panic while holding the lock cannot leave the ring half-written
    // (push_slice/pop_slice are the only mutations), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, Inner>) -> MutexGuard<'a, Inner> {
        self.changed
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue as many of `symbols` as fit, blocking while the buffer is too
    /// full. Returns the number queued; 0 once the buffer is closed.
    pub fn push(&self, symbols: &[Complex32]) -> usize {
        if symbols.is_empty() {
            return 0;
        }
        let threshold = self.notify_size.min(symbols.len());

        let mut inner = self.lock();
        loop {
            if !inner.open {
                return 0;
            }
            if inner.ring.vacant_len() >= threshold {
                let queued = inner.ring.push_slice(symbols);
                drop(inner);
                self.changed.notify_all();
                return queued;
            }
            inner = self.wait(inner);
        }
    }

    /// Take up to `out.len()` symbols, blocking while the buffer is empty.
    /// Returns the number taken; 0 once the buffer is closed and drained.
    pub fn pop(&self, out: &mut [Complex32]) -> usize {
        if out.is_empty() {
            return 0;
        }

        let mut inner = self.lock();
        loop {
            if inner.ring.occupied_len() > 0 {
                let taken = inner.ring.pop_slice(out);
                drop(inner);
                self.changed.notify_all();
                return taken;
            }
            if !inner.open {
                return 0;
            }
            inner = self.wait(inner);
        }
    }

    /// Stop accepting symbols and release every blocked caller
    pub fn close(&self) {
        self.lock().open = false;
        self.changed.notify_all();
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Symbols currently queued
    pub fn len(&self) -> usize {
        self.lock().ring.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().ring.capacity().get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn symbols(n: usize) -> Vec<Complex32> {
        (0..n).map(|i| Complex32::new(i as f32, 0.0)).collect()
    }

    #[test]
    fn fifo_order_is_preserved() {
        let buffer = SymbolBuffer::new(16, 4);
        assert_eq!(buffer.push(&symbols(10)), 10);
        let mut out = vec![Complex32::new(0.0, 0.0); 4];
        assert_eq!(buffer.pop(&mut out), 4);
        assert_eq!(out, symbols(4));
        let mut rest = vec![Complex32::new(0.0, 0.0); 16];
        assert_eq!(buffer.pop(&mut rest), 6);
        assert_eq!(rest[0], Complex32::new(4.0, 0.0));
    }

    #[test]
    fn push_never_exceeds_capacity() {
        let buffer = SymbolBuffer::new(8, 8);
        assert_eq!(buffer.push(&symbols(20)), 8);
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn blocked_push_resumes_after_pop() {
        let buffer = Arc::new(SymbolBuffer::new(4, 2));
        assert_eq!(buffer.push(&symbols(4)), 4);

        let producer = {
            let buffer = buffer.clone();
            thread::spawn(move || buffer.push(&symbols(2)))
        };

        thread::sleep(Duration::from_millis(20));
        let mut out = vec![Complex32::new(0.0, 0.0); 2];
        assert_eq!(buffer.pop(&mut out), 2);

        assert_eq!(producer.join().unwrap(), 2);
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn close_releases_blocked_producer_and_consumer() {
        let full = Arc::new(SymbolBuffer::new(4, 4));
        full.push(&symbols(4));
        let empty = Arc::new(SymbolBuffer::new(4, 4));

        let (done_tx, done_rx) = crossbeam_channel::bounded::<&'static str>(2);

        let producer = {
            let full = full.clone();
            let done_tx = done_tx.clone();
            thread::spawn(move || {
                let queued = full.push(&symbols(4));
                done_tx.send("producer").unwrap();
                queued
            })
        };
        let consumer = {
            let empty = empty.clone();
            thread::spawn(move || {
                let mut out = vec![Complex32::new(0.0, 0.0); 4];
                let taken = empty.pop(&mut out);
                done_tx.send("consumer").unwrap();
                taken
            })
        };

        // Both sides are parked
        thread::sleep(Duration::from_millis(20));
        assert!(done_rx.try_recv().is_err());

        full.close();
        empty.close();

        for _ in 0..2 {
            done_rx
                .recv_timeout(Duration::from_secs(2))
                .expect("blocked side did not wake up after close");
        }
        assert_eq!(producer.join().unwrap(), 0);
        assert_eq!(consumer.join().unwrap(), 0);
    }

    #[test]
    fn pop_drains_remaining_symbols_after_close() {
        let buffer = SymbolBuffer::new(8, 1);
        buffer.push(&symbols(3));
        buffer.close();
        assert!(!buffer.is_open());
        assert_eq!(buffer.push(&symbols(1)), 0);

        let mut out = vec![Complex32::new(0.0, 0.0); 8];
        assert_eq!(buffer.pop(&mut out), 3);
        assert_eq!(buffer.pop(&mut out), 0);
        assert!(buffer.is_empty());
    }
}
