//! Handlebars email templates

use crate::models::Email;
use eyre::{eyre, Result};
use handlebars::Handlebars;
use serde_json::Value;
use std::collections::HashMap;

pub const PASSWORD_RESET: &str = "password_reset";
pub const PASSWORD_CHANGED: &str = "password_changed";

/// Rendered template result
#[derive(Debug, Clone)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
}

impl RenderedTemplate {
    pub fn into_email(self, to: impl Into<String>) -> Email {
        let mut email = Email::new(to, self.subject);
        email.body_text = self.body_text;
        email.body_html = self.body_html;
        email
    }
}

/// Email template definition
#[derive(Clone, Debug)]
pub struct EmailTemplate {
    pub name: String,
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
}

/// Handlebars-based template engine
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
    templates: HashMap<String, EmailTemplate>,
}

impl TemplateEngine {
    /// Create a new TemplateEngine with the built-in templates registered
    pub fn new() -> Result<Self> {
        let mut engine = Self {
            handlebars: Handlebars::new(),
            templates: HashMap::new(),
        };
        engine.handlebars.set_strict_mode(true);
        engine.register_defaults()?;
        Ok(engine)
    }

    pub fn register(&mut self, template: EmailTemplate) -> Result<()> {
        self.handlebars
            .register_template_string(&format!("{}_subject", template.name), &template.subject)
            .map_err(|e| eyre!("Failed to register subject template: {}", e))?;

        if let Some(text) = &template.body_text {
            self.handlebars
                .register_template_string(&format!("{}_text", template.name), text)
                .map_err(|e| eyre!("Failed to register text template: {}", e))?;
        }

        if let Some(html) = &template.body_html {
            self.handlebars
                .register_template_string(&format!("{}_html", template.name), html)
                .map_err(|e| eyre!("Failed to register HTML template: {}", e))?;
        }

        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    pub fn render(&self, name: &str, data: &Value) -> Result<RenderedTemplate> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| eyre!("Template not found: {}", name))?;

        let subject = self
            .handlebars
            .render(&format!("{}_subject", name), data)
            .map_err(|e| eyre!("Failed to render subject: {}", e))?;

        let body_text = match template.body_text {
            Some(_) => Some(
                self.handlebars
                    .render(&format!("{}_text", name), data)
                    .map_err(|e| eyre!("Failed to render text: {}", e))?,
            ),
            None => None,
        };

        let body_html = match template.body_html {
            Some(_) => Some(
                self.handlebars
                    .render(&format!("{}_html", name), data)
                    .map_err(|e| eyre!("Failed to render HTML: {}", e))?,
            ),
            None => None,
        };

        Ok(RenderedTemplate {
            subject,
            body_text,
            body_html,
        })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn register_defaults(&mut self) -> Result<()> {
        self.register(EmailTemplate {
            name: PASSWORD_RESET.to_string(),
            subject: "Your password reset code".to_string(),
            body_text: Some(
                r#"Hello {{name}},

Use the following code to reset your password:

{{code}}

The code expires in {{expiry_minutes}} minutes.

If you didn't request this, ignore this email. Your password will remain unchanged."#
                    .to_string(),
            ),
            body_html: Some(
                r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <h1 style="color: #2563eb;">Password Reset</h1>
    <p>Hello {{name}},</p>
    <p>Use the following code to reset your password:</p>
    <p style="font-size: 28px; letter-spacing: 6px; font-weight: bold; text-align: center;">{{code}}</p>
    <p style="color: #666; font-size: 14px;">The code expires in {{expiry_minutes}} minutes.</p>
    <p style="color: #666; font-size: 14px;">If you didn't request this, ignore this email. Your password will remain unchanged.</p>
</body>
</html>"#
                    .to_string(),
            ),
        })?;

        self.register(EmailTemplate {
            name: PASSWORD_CHANGED.to_string(),
            subject: "Your password has been changed".to_string(),
            body_text: Some(
                r#"Hello {{name}},

Your password has been changed.

If you did not make this change, contact support immediately."#
                    .to_string(),
            ),
            body_html: None,
        })?;

        Ok(())
    }
}
