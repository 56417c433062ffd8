//! Access gate for privileged operations.

use tokenlock_types::HolderId;

/// Answers whether a caller may perform privileged operations.
pub trait AccessGate {
    fn is_operator(&self, caller: HolderId) -> bool;
}

/// Gate with exactly one operator, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleOperator {
    operator: HolderId,
}

impl SingleOperator {
    #[must_use]
    pub fn new(operator: HolderId) -> Self {
        Self { operator }
    }

    #[must_use]
    pub fn operator(&self) -> HolderId {
        self.operator
    }
}

impl AccessGate for SingleOperator {
    fn is_operator(&self, caller: HolderId) -> bool {
        caller == self.operator
    }
}
