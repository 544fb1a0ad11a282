/// Cross-collection changes raised by one table and consumed by others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// A team role changed name. Every reference to `from` must become `to`.
    RoleRenamed { from: String, to: String },
}

/// A collection that reacts to domain events. Returns how many rows changed.
pub trait EventHandler {
    fn apply(&mut self, event: &DomainEvent) -> usize;
}

pub(crate) fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().unwrap_or(0) + 1
}
