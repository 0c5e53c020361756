/// Append-only rule id allocator.
///
/// Rules are never deleted during factorization, so ids are handed out in
/// sequence and never reused. Id 0 is the start rule.
#[derive(Debug)]
pub(crate) struct IdGenerator {
    next: u32,
}

impl IdGenerator {
    /// Creates a new ID generator starting from ID 0.
    pub(crate) fn new() -> Self {
        Self { next: 0 }
    }

    /// Gets the next unused ID.
    pub(crate) fn get(&mut self) -> u32 {
        let id = self.next;
        self.next = self
            .next
            .checked_add(1)
            .expect("rule id space exhausted");
        id
    }

    /// Number of IDs handed out so far.
    pub(crate) fn allocated(&self) -> u32 {
        self.next
    }
}
