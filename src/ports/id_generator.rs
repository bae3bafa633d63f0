/// Source of fresh identifiers for projects, columns and tasks.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}
