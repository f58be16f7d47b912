/// Cursor over the keypoint list marking which keypoint a placement click
/// will set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    index: usize,
    len: usize,
}

impl Selection {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves the cursor. Out-of-range and unchanged indices are ignored and
    /// report `false`.
    pub fn set(&mut self, index: usize) -> bool {
        if index >= self.len || index == self.index {
            return false;
        }
        self.index = index;
        true
    }

    pub fn increment(&mut self) -> bool {
        self.set(self.index + 1)
    }

    pub fn decrement(&mut self) -> bool {
        match self.index.checked_sub(1) {
            Some(index) => self.set(index),
            None => false,
        }
    }
}
