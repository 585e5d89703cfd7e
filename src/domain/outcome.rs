/// Result of one external step in the enrichment cascade.
///
/// `Failed` keeps the reason around for logging and tests, but callers in the
/// cascade treat it the same as `Empty`: every external call fails closed.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome<T> {
    Found(T),
    Empty,
    Failed(String),
}

impl<T> StepOutcome<T> {
    pub fn failed(reason: impl ToString) -> Self {
        StepOutcome::Failed(reason.to_string())
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            StepOutcome::Found(value) => Some(value),
            StepOutcome::Empty | StepOutcome::Failed(_) => None,
        }
    }

    /// Chains a step that can itself come up empty.
    pub fn and_then<U, F: FnOnce(T) -> StepOutcome<U>>(self, f: F) -> StepOutcome<U> {
        match self {
            StepOutcome::Found(value) => f(value),
            StepOutcome::Empty => StepOutcome::Empty,
            StepOutcome::Failed(reason) => StepOutcome::Failed(reason),
        }
    }
}

impl<T> From<Option<T>> for StepOutcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => StepOutcome::Found(v),
            None => StepOutcome::Empty,
        }
    }
}
