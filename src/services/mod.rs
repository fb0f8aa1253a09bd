pub mod account_service;
pub mod identity_provider;
pub mod mail_relay;

pub use account_service::{
    AccountService, AccountServiceError, RegistrationRequest, SignInLinkRequest,
};
pub use identity_provider::{CreatedUser, IdentityError, IdentityProvider, IdentityToolkitClient};
pub use mail_relay::{create_mailer, LogMailer, MailError, Mailer, SmtpMailer};
