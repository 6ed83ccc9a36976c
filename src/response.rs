use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Returned by updates: where the changed record can be read back.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedBody {
    pub message: String,
    pub location: String,
}
