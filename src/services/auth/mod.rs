pub mod authenticator;
pub mod friendly;
pub mod redirecting;

pub use authenticator::{Authenticator, Challenge, ClientIdentity};
pub use friendly::FriendlyForm;
pub use redirecting::RedirectingForm;
