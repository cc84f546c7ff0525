/// Response header carrying the outcome of a request.
pub const EVALUATOR_STATUS_HEADER: &str = "X-Evaluator-Status";

pub const STATUS_HEALTHY: &str = "healthy";
/// Feedback came from the generation model.
pub const STATUS_GENERATED: &str = "generated";
/// Feedback came from the score-band table.
pub const STATUS_FALLBACK: &str = "fallback";
pub const STATUS_BATCH: &str = "batch";
pub const STATUS_INVALID_REQUEST: &str = "invalid_request";
pub const STATUS_EVALUATION_ERROR: &str = "evaluation_error";
pub const STATUS_NOT_FOUND: &str = "not_found";
pub const STATUS_INTERNAL_ERROR: &str = "internal_error";
