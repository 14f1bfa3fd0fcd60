//! Type aliases for commonly used complex types.
//!
//! Complex types like `Arc<RwLock<T>>` and boxed callback signatures read
//! better behind a named alias, and keep the same pattern used the same way
//! across crates.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Uses `parking_lot::Mutex` for better performance than `std::sync::Mutex`.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A thread-safe reader-writer lock wrapper for read-heavy workloads.
///
/// Use when reads greatly outnumber writes. Multiple readers can access
/// concurrently, but writes require exclusive access.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// A simple callback with no parameters or return value.
///
/// Thread-safe, suitable for cross-thread event notification.
pub type Callback = Box<dyn Fn() + Send + Sync>;

/// A callback that receives a single parameter.
pub type DataCallback<T> = Box<dyn Fn(T) + Send + Sync>;

/// A callback that receives two parameters.
pub type DataCallback2<T, U> = Box<dyn Fn(T, U) + Send + Sync>;

/// Create a new `ThreadSafe<T>` from a value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}

/// Create a new `ThreadSafeRw<T>` from a value.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_safe_creation() {
        let value: ThreadSafe<i32> = thread_safe(42);
        assert_eq!(*value.lock(), 42);

        *value.lock() = 100;
        assert_eq!(*value.lock(), 100);
    }

    #[test]
    fn test_thread_safe_rw() {
        let value: ThreadSafeRw<i32> = thread_safe_rw(42);

        assert_eq!(*value.read(), 42);
        *value.write() = 100;
        assert_eq!(*value.read(), 100);
    }

    #[test]
    fn test_callbacks() {
        let counter = thread_safe(0usize);

        let counter_clone = counter.clone();
        let bump: Callback = Box::new(move || {
            *counter_clone.lock() += 1;
        });
        bump();

        let counter_clone = counter.clone();
        let add: DataCallback<usize> = Box::new(move |n| {
            *counter_clone.lock() += n;
        });
        add(2);

        let counter_clone = counter.clone();
        let add2: DataCallback2<usize, usize> = Box::new(move |a, b| {
            *counter_clone.lock() += a + b;
        });
        add2(3, 4);

        assert_eq!(*counter.lock(), 10);
    }
}
