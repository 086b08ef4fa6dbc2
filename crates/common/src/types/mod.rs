use serde::{Deserialize, Serialize};

/// Body returned by the liveness route.
pub const ONLINE: &str = "ONLINE";

/// JSON error envelope shared by every failing route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
