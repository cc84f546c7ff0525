use std::sync::Arc;

use crate::evaluation::Evaluator;

#[derive(Clone)]
pub struct HandlerState {
    pub evaluator: Arc<Evaluator>,
}

impl HandlerState {
    pub fn new(evaluator: Arc<Evaluator>) -> Self {
        Self { evaluator }
    }

    /// State backed by stub models.
    pub fn stub() -> Self {
        Self::new(Arc::new(Evaluator::stub()))
    }
}
