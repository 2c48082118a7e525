//! Per-session chunk selection state.

/// Inclusion flags keyed by chunk index.
///
/// Sized to the chunk list at creation; every flag starts unselected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    flags: Vec<bool>,
}

impl SelectionSet {
    /// Create an all-unselected set for `len` chunks.
    pub fn new(len: usize) -> Self {
        Self {
            flags: vec![false; len],
        }
    }

    /// Number of chunks the set covers.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Flip the flag at `index`. Returns the new state, or `None` when
    /// `index` is out of range (nothing changes).
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let flag = self.flags.get_mut(index)?;
        *flag = !*flag;
        Some(*flag)
    }

    /// Flip every flag.
    pub fn toggle_all(&mut self) {
        for flag in &mut self.flags {
            *flag = !*flag;
        }
    }

    /// Set every flag to selected, regardless of its current state.
    pub fn select_all(&mut self) {
        self.flags.fill(true);
    }

    /// Set every flag to unselected.
    pub fn clear(&mut self) {
        self.flags.fill(false);
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Number of selected chunks.
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }

    /// Selected indices in ascending order.
    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.then_some(i))
    }
}
