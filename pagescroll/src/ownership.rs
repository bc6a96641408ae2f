use crate::{MutatePriority, OwnershipError};

/// Identifies one acquisition of a [`ScrollOwnershipToken`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScrollOwner {
    id: u64,
    priority: MutatePriority,
}

impl ScrollOwner {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn priority(&self) -> MutatePriority {
        self.priority
    }
}

/// Mutual exclusion between scroll operations driving the pager (drag streams, flings).
///
/// An acquisition with a priority greater than or equal to the current owner's preempts it;
/// a lower priority one is refused. The preempted owner finds out through
/// [`ScrollOwnershipToken::is_owned_by`] before applying its next frame, so cancellation
/// happens on frame boundaries and never inside one.
#[derive(Clone, Debug, Default)]
pub struct ScrollOwnershipToken {
    current: Option<ScrollOwner>,
    next_id: u64,
}

impl ScrollOwnershipToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&mut self, priority: MutatePriority) -> Result<ScrollOwner, OwnershipError> {
        if let Some(held) = self.current {
            if priority < held.priority {
                pdebug!(?held, ?priority, "ScrollOwnershipToken: acquisition refused");
                return Err(OwnershipError::Busy {
                    held: held.priority,
                    requested: priority,
                });
            }
            pdebug!(
                preempted = held.id,
                ?priority,
                "ScrollOwnershipToken: preempting owner"
            );
        }
        self.next_id = self.next_id.wrapping_add(1);
        let owner = ScrollOwner {
            id: self.next_id,
            priority,
        };
        self.current = Some(owner);
        Ok(owner)
    }

    /// Releases the token if `owner` still holds it. Returns `false` for a stale owner.
    pub fn release(&mut self, owner: ScrollOwner) -> bool {
        if self.current == Some(owner) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn is_owned_by(&self, owner: ScrollOwner) -> bool {
        self.current == Some(owner)
    }

    pub fn current(&self) -> Option<ScrollOwner> {
        self.current
    }

    pub fn is_held(&self) -> bool {
        self.current.is_some()
    }
}
