pub mod deletion_request;
pub mod login_record;

pub use deletion_request::DeletionRequest;
pub use login_record::{DeletionInfo, LoginRecord, DEFAULT_USER_TYPE, LOGIN_COLLECTION};
