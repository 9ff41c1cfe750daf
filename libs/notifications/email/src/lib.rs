//! Transactional email delivery for the storefront.
//!
//! ## Components
//!
//! - **Email Model**: [`Email`] with text and HTML bodies
//! - **Providers**: SMTP via lettre and a capturing mock for tests
//! - **Templates**: Handlebars-based [`TemplateEngine`] with the storefront templates
//!
//! Sending is a single attempt. Callers decide what a failure means.
//!
//! ```ignore
//! use email::{Email, EmailProvider, SmtpConfig, SmtpProvider, TemplateEngine};
//! use core_config::FromEnv;
//!
//! let provider = SmtpProvider::new(SmtpConfig::from_env()?)?;
//! let rendered = TemplateEngine::new()?.render("password_reset", &data)?;
//! provider.send(&rendered.into_email("user@example.com")).await?;
//! ```

pub mod models;
pub mod provider;
pub mod templates;

pub use models::Email;
pub use provider::{Delivery, EmailProvider, MockSmtpProvider, SmtpConfig, SmtpProvider};
pub use templates::{EmailTemplate, RenderedTemplate, TemplateEngine};
