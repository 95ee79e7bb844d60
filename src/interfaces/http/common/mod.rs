pub mod response;
pub mod validated_json;

pub use response::{domain_error, ApiError, ApiResponse};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
