// In-place binary heap over a caller owned range `[first, last)` of a buffer.
//
// The comparator follows the "less" convention: `cmp(a, b) == Ordering::Less`
// means `a` ranks below `b`, so the element nothing ranks above sits at `first`.
// Passing a reversed comparator turns the max-heap into a min-heap.
//
// Nothing here owns data, the functions only reorder slots. Ties are left in
// whatever order the sifts produce.

use std::cmp::Ordering;

fn check_range<T>(buffer: &[T], first: usize, last: usize) {
    assert!(
        first <= last && last <= buffer.len(),
        "heap range [{}, {}) out of bounds for buffer of length {}",
        first,
        last,
        buffer.len()
    );
}

/// Establishes the heap property over `[first, last)` in O(n).
///
/// An empty or inverted range (`last <= first`) is a no-op.
pub fn make_heap<T, F>(buffer: &mut [T], first: usize, last: usize, mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if last <= first {
        return;
    }
    check_range(buffer, first, last);

    let heap = &mut buffer[first..last];
    let len = heap.len();
    for parent in (0..len / 2).rev() {
        sift_down(heap, parent, len, &mut cmp);
    }
}

/// Restores the heap property after one element was appended at `last - 1`.
///
/// `[first, last - 1)` must already be a heap.
pub fn push_heap<T, F>(buffer: &mut [T], first: usize, last: usize, mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    check_range(buffer, first, last);

    let heap = &mut buffer[first..last];
    if heap.len() < 2 {
        return;
    }
    let new_index = heap.len() - 1;
    sift_up(heap, new_index, &mut cmp);
}

/// Moves the top of the heap to `last - 1` and re-heaps `[first, last - 1)`.
///
/// Callers read the popped element from `last - 1`.
pub fn pop_heap<T, F>(buffer: &mut [T], first: usize, last: usize, mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    check_range(buffer, first, last);

    let heap = &mut buffer[first..last];
    let len = heap.len();
    if len < 2 {
        return;
    }
    heap.swap(0, len - 1);
    sift_down(heap, 0, len - 1, &mut cmp);
}

/// Returns true if every parent in `[first, last)` ranks at least as high as
/// its children.
pub fn is_heap<T, F>(buffer: &[T], first: usize, last: usize, mut cmp: F) -> bool
where
    F: FnMut(&T, &T) -> Ordering,
{
    if last <= first {
        return true;
    }
    check_range(buffer, first, last);

    let heap = &buffer[first..last];
    (1..heap.len()).all(|child| cmp(&heap[(child - 1) / 2], &heap[child]) != Ordering::Less)
}

fn sift_up<T, F>(heap: &mut [T], mut child: usize, cmp: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    while child > 0 {
        let parent = (child - 1) / 2;
        if cmp(&heap[parent], &heap[child]) != Ordering::Less {
            break;
        }
        heap.swap(parent, child);
        child = parent;
    }
}

// Indices are relative to the start of `heap`, `len` bounds the live part.
fn sift_down<T, F>(heap: &mut [T], mut parent: usize, len: usize, cmp: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    loop {
        let left = 2 * parent + 1;
        if left >= len {
            break;
        }
        let right = left + 1;
        let mut best = left;
        if right < len && cmp(&heap[left], &heap[right]) == Ordering::Less {
            best = right;
        }
        if cmp(&heap[parent], &heap[best]) != Ordering::Less {
            break;
        }
        heap.swap(parent, best);
        parent = best;
    }
}
