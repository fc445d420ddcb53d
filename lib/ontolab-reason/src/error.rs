/// Error returned when a closure computation is stopped before reaching its fixpoint.
///
/// When [`ClosureReasoner::expand`](crate::ClosureReasoner::expand) fails the graph keeps the
/// triples inferred by the rounds that completed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ReasoningError {
    /// The fixpoint was not reached within the configured number of rounds.
    #[error("The closure did not reach a fixpoint after {limit} iterations")]
    IterationLimit { limit: usize },

    /// More triples were inferred than allowed.
    #[error("Materialization limit exceeded: {inferred} inferred triples, the limit is {limit}")]
    MaterializationLimit { limit: usize, inferred: usize },
}
