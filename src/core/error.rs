#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    #[error("Numeric domain error: {context}")]
    DomainError { context: String },
}

pub type PlannerResult<T> = Result<T, PlannerError>;
