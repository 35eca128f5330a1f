//! Bounded undo history for pose matrices

use pose6d_core::Pose;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of poses kept for undo
pub const UNDO_CAPACITY: usize = 20;

/// A bounded stack of pose matrices
///
/// Pushing beyond [`UNDO_CAPACITY`] drops the oldest entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UndoStack {
    entries: VecDeque<Pose>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a pose, evicting the oldest entry at capacity
    pub fn push(&mut self, pose: Pose) {
        if self.entries.len() == UNDO_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(pose);
    }

    /// Pop the most recently pushed pose
    pub fn pop(&mut self) -> Option<Pose> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use pose6d_core::Matrix3;

    fn translation(x: f64) -> Pose {
        Pose::from_rot_trans(Matrix3::identity(), Vector3::new(x, 0.0, 0.0))
    }

    #[test]
    fn pop_after_push_returns_pushed_pose() {
        let mut stack = UndoStack::new();
        let pose = translation(7.0);
        stack.push(pose);
        assert_eq!(stack.pop(), Some(pose));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn capacity_is_bounded_and_oldest_is_evicted() {
        let mut stack = UndoStack::new();
        for i in 0..50 {
            stack.push(translation(i as f64));
            assert!(stack.len() <= UNDO_CAPACITY);
        }
        assert_eq!(stack.len(), UNDO_CAPACITY);
        // Most recent first, entries 30..49 survive
        assert_eq!(stack.pop(), Some(translation(49.0)));
        for _ in 0..UNDO_CAPACITY - 2 {
            stack.pop();
        }
        assert_eq!(stack.pop(), Some(translation(30.0)));
        assert!(stack.is_empty());
    }
}
