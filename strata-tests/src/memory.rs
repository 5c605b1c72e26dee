use std::{
    alloc::{GlobalAlloc, Layout, System},
    sync::atomic::{AtomicUsize, Ordering::Relaxed},
};

/// System allocator keeping count of the live heap bytes and of their highest value.
///
/// Installed as the global allocator of every binary linking this crate, so backend tests can
/// measure how much memory a query holds at once.
pub struct CountingAllocator;

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator;

static CURRENT: AtomicUsize = AtomicUsize::new(0);
static PEAK: AtomicUsize = AtomicUsize::new(0);

fn grow(size: usize) {
    let current = CURRENT.fetch_add(size, Relaxed) + size;
    PEAK.fetch_max(current, Relaxed);
}

fn shrink(size: usize) {
    CURRENT.fetch_sub(size, Relaxed);
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            grow(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            grow(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        shrink(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new = unsafe { System.realloc(ptr, layout, new_size) };
        if !new.is_null() {
            if new_size > layout.size() {
                grow(new_size - layout.size());
            } else {
                shrink(layout.size() - new_size);
            }
        }
        new
    }
}

/// Start a measurement: lower the peak to the bytes allocated right now, and return them.
pub fn reset_peak() -> usize {
    let current = CURRENT.load(Relaxed);
    PEAK.store(current, Relaxed);
    current
}

/// Highest number of bytes allocated at once since the last [`reset_peak`].
pub fn peak() -> usize {
    PEAK.load(Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hint::black_box;

    #[test]
    fn tracks_the_peak() {
        let baseline = reset_peak();
        let buffer = black_box(vec![0u8; 1 << 20]);
        drop(buffer);
        let small = vec![0u8; 16];
        assert!(peak() - baseline >= 1 << 20);
        drop(small);
    }
}
