//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of a
//! request and orchestrates repositories, hashing and domain operations.

pub mod account;
pub mod auth;
pub mod authorization;
pub mod context;
pub mod error;
pub mod events;
pub mod field;
pub mod form;
pub mod mailer;
pub mod system_message;
pub mod verification;

pub use account::AccountService;
pub use auth::AuthService;
pub use authorization::AuthorizationService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use events::EventDispatcher;
pub use field::FieldService;
pub use form::FormService;
pub use mailer::{LogMailer, MailKind, Mailer, OutgoingMail};
pub use system_message::SystemMessageService;
pub use verification::VerificationService;
