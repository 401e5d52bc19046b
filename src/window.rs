//! Bounded FIFO window of recent quantized samples.
use std::collections::VecDeque;

/// One quantized 3-axis sample `(x, y, z)`.
pub type Sample = [i64; 3];

/// Fixed-capacity FIFO holding the most recent quantized samples.
///
/// The window always holds the most recent `min(pushes so far, capacity)`
/// samples in chronological order. Capacity is fixed at construction; no
/// operation can fail.
#[derive(Clone, Debug)]
pub struct SampleWindow {
    capacity: usize,
    items: VecDeque<Sample>,
}

impl SampleWindow {
    /// Create an empty window with the given capacity.
    ///
    /// Capacity is validated upstream at configuration time and is always
    /// at least 1 here.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, evicting the oldest one if the window is full.
    pub fn push(&mut self, sample: Sample) {
        self.items.push_back(sample);
        if self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    /// Empty the window.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the window holds no samples.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over the current contents, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_tracks_pushes_up_to_capacity() {
        let mut window = SampleWindow::new(15);
        for i in 0..40 {
            window.push([i, i, i]);
            assert_eq!(window.len(), usize::min(i as usize + 1, 15));
        }
    }

    #[test]
    fn eviction_is_strict_fifo() {
        let mut window = SampleWindow::new(2);
        window.push([1, 1, 1]); // A
        window.push([2, 2, 2]); // B
        window.push([3, 3, 3]); // C evicts A
        let contents: Vec<Sample> = window.iter().copied().collect();
        assert_eq!(contents, vec![[2, 2, 2], [3, 3, 3]]);
    }

    #[test]
    fn holds_most_recent_samples_in_order() {
        let mut window = SampleWindow::new(4);
        for i in 0..10i64 {
            window.push([i, -i, 2 * i]);
        }
        let contents: Vec<Sample> = window.iter().copied().collect();
        let expected: Vec<Sample> = (6..10i64).map(|i| [i, -i, 2 * i]).collect();
        assert_eq!(contents, expected);
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut window = SampleWindow::new(3);
        window.push([5, 5, 5]);
        window.push([6, 6, 6]);
        assert!(!window.is_empty());
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.len(), 0);
        // capacity is unaffected and the window accepts new pushes
        window.push([7, 7, 7]);
        assert_eq!(window.len(), 1);
        assert_eq!(window.capacity(), 3);
    }
}
