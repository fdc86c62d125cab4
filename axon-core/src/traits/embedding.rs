use crate::errors::AxonResult;

/// Embedding collaborator. Used identically at index time and query time;
/// a model/version mismatch between the two is a configuration error, not
/// something this engine defends against.
pub trait IEmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> AxonResult<Vec<f32>>;
    fn dimensions(&self) -> usize;
    fn name(&self) -> &str;
    fn is_available(&self) -> bool {
        true
    }
}
