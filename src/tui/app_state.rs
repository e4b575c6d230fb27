/// How the interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The user finished normally; the selection should be used and saved.
    Confirmed,
    /// The user bailed out; nothing is emitted or persisted.
    Aborted,
}
