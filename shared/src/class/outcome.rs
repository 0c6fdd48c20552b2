/// Result of a `pre_mutate` hook: either the (possibly rewritten) arguments,
/// or a veto
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Accepted(T),
    Rejected,
}

/// Pipeline stage that declined a mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    PreMutateVeto,
    CoercionFailed,
    ValidationVeto,
}

/// What happened to a single `set`/`add`/`set_all` call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    Accepted,
    Rejected(Rejection),
}

impl SetOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SetOutcome::Accepted)
    }
}
