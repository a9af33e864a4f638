pub mod auth;
pub mod notification;
pub mod payment;
pub mod upload;

pub use auth::PasswordResetFlow;
pub use notification::NotificationService;
pub use payment::CheckoutFlow;
pub use upload::{UploadAdapter, UploadOutcome};
