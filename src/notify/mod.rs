// Branded lifecycle email rendering
//
// Pure templating. Delivery belongs to an external collaborator; the
// rendered message is handed over (or logged) and an unknown event
// must still produce the generic notification rather than fail.

use serde::Serialize;

use crate::config::BrandConfig;

/// Directory lifecycle events that carry a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    SignUp,
    AdminInvite,
    ForgotPassword,
    VerifyAttribute,
    UpdateAttribute,
    ResendCode,
    Authentication,
    Other,
}

/// Per-recipient values substituted into a template. `code` carries
/// the verification code, or the temporary password for invites.
#[derive(Debug, Clone, Default)]
pub struct RecipientContext {
    pub name: String,
    pub username: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

pub struct Notifier {
    brand: BrandConfig,
}

impl Notifier {
    pub fn new(brand: BrandConfig) -> Self {
        Self { brand }
    }

    pub fn render(&self, event: LifecycleEvent, ctx: &RecipientContext) -> EmailMessage {
        let brand = &self.brand.name;
        match event {
            LifecycleEvent::SignUp => self.standard(
                format!("Welcome to {} - Verify Your Email", brand),
                "Welcome! Verify Your Email",
                &format!(
                    "Hi {},\n\nWelcome to {}! We're excited to have you join us.\n\nTo get started, please verify your email address using the code below:",
                    ctx.name, brand
                ),
                Some(&ctx.code),
            ),
            LifecycleEvent::AdminInvite => self.invite(ctx),
            LifecycleEvent::ForgotPassword => self.standard(
                format!("{} - Password Reset Request", brand),
                "Password Reset Request",
                &format!(
                    "Hello,\n\nWe received a request to reset your password for your {} account.\n\nUse the code below to reset your password:",
                    brand
                ),
                Some(&ctx.code),
            ),
            LifecycleEvent::VerifyAttribute => self.standard(
                format!("{} - Verify Your Email", brand),
                "Verify Your Email",
                "Hi,\n\nPlease use the code below to verify your email address:",
                Some(&ctx.code),
            ),
            LifecycleEvent::UpdateAttribute => self.standard(
                format!("{} - Confirm Your Update", brand),
                "Confirm Your Update",
                "Hi,\n\nWe received a request to update your account information.\n\nPlease use the code below to confirm the change:",
                Some(&ctx.code),
            ),
            LifecycleEvent::ResendCode => self.standard(
                format!("{} - Verification Code", brand),
                "Verification Code",
                "Hi,\n\nHere's your requested verification code:",
                Some(&ctx.code),
            ),
            LifecycleEvent::Authentication => self.standard(
                format!("{} - Authentication Code", brand),
                "Authentication Required",
                "Hi,\n\nPlease use the code below to complete your sign-in:",
                Some(&ctx.code),
            ),
            LifecycleEvent::Other => self.standard(
                format!("{} - Notification", brand),
                "Notification",
                "This is a notification from your account.",
                None,
            ),
        }
    }

    fn standard(
        &self,
        subject: String,
        title: &str,
        message: &str,
        code: Option<&str>,
    ) -> EmailMessage {
        let code = code.filter(|c| !c.is_empty());
        EmailMessage {
            html_body: self.html_shell(title, &text_to_html(message), code),
            text_body: self.text_shell(title, message, code),
            subject,
        }
    }

    /// The invite variant embeds login credentials instead of a code.
    fn invite(&self, ctx: &RecipientContext) -> EmailMessage {
        let brand = &self.brand.name;
        let username = if ctx.username.is_empty() {
            &ctx.name
        } else {
            &ctx.username
        };
        let subject = format!("Welcome to {} - You've Been Invited!", brand);

        let html_body = format!(
            r#"<html>
  <head><meta charset="UTF-8"></head>
  <body style="font-family: Arial, sans-serif; background-color: #f8f9fa; padding: 20px; margin: 0;">
    <div style="max-width: 600px; margin: 0 auto; background: white; padding: 40px; border-radius: 8px;">
      <div style="text-align: center; margin-bottom: 30px;">
        <h1 style="color: {brand_color}; font-size: 32px; margin: 0;">{brand}</h1>
      </div>
      <h2 style="color: {accent_color}; font-size: 24px;">Welcome to {brand}!</h2>
      <p style="font-size: 16px; color: #333;">Hello <strong>{username}</strong>,</p>
      <p style="font-size: 16px; color: #333;">You've been invited to join <strong>{brand}</strong>. Here are your login credentials:</p>
      <div style="background-color: #f8f9fa; padding: 20px; border-radius: 6px; margin: 20px 0;">
        <p style="margin: 0; font-size: 16px;"><strong>Username:</strong> {username}</p>
        <p style="margin: 10px 0 0 0; font-size: 16px;"><strong>Temporary Password:</strong> {password}</p>
      </div>
      <p style="font-size: 14px; color: #666;">You'll be prompted to change your password on first login.</p>
      <div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #eee; font-size: 12px; color: #888; text-align: center;">
        Thanks,<br>The {brand} Team
      </div>
    </div>
  </body>
</html>"#,
            brand = brand,
            brand_color = self.brand.color,
            accent_color = self.brand.accent_color,
            username = username,
            password = ctx.code,
        );

        let text_body = format!(
            "Welcome to {brand}!\n\nHello {username},\n\nYou've been invited to join {brand}.\n\nUsername: {username}\nTemporary Password: {password}\n\nYou'll be prompted to change your password on first login.\n\nThanks,\nThe {brand} Team",
            brand = brand,
            username = username,
            password = ctx.code,
        );

        EmailMessage {
            subject,
            html_body,
            text_body,
        }
    }

    fn html_shell(&self, title: &str, message_html: &str, code: Option<&str>) -> String {
        let code_block = match code {
            Some(code) => format!(
                r#"<div style="background-color: #f8f9fa; padding: 20px; border-radius: 6px; margin: 20px 0; text-align: center;">
        <p style="font-size: 24px; font-weight: bold; color: {accent}; margin: 0; letter-spacing: 2px;">{code}</p>
      </div>"#,
                accent = self.brand.accent_color,
                code = code,
            ),
            None => String::new(),
        };

        format!(
            r#"<html>
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
  </head>
  <body style="font-family: Arial, sans-serif; background-color: #F9F9F9; padding: 20px; margin: 0;">
    <div style="max-width: 600px; margin: 0 auto; background: white; padding: 40px; border-radius: 8px;">
      <div style="text-align: center; margin-bottom: 30px;">
        <h1 style="color: {brand_color}; font-size: 32px; margin: 0; font-weight: 700;">{brand}</h1>
      </div>
      <h2 style="color: {brand_color}; font-size: 24px; margin-bottom: 20px; text-align: center;">{title}</h2>
      <div style="color: #333; font-size: 16px; line-height: 1.6;">{message}</div>
      {code_block}
      <div style="margin-top: 40px; padding-top: 20px; border-top: 1px solid #eee; font-size: 12px; color: #888; text-align: center;">
        If you did not request this, please ignore this email.
      </div>
    </div>
  </body>
</html>"#,
            brand = self.brand.name,
            brand_color = self.brand.color,
            title = title,
            message = message_html,
            code_block = code_block,
        )
    }

    fn text_shell(&self, title: &str, message: &str, code: Option<&str>) -> String {
        let brand = &self.brand.name;
        let mut text = format!("{}\n{}\n\n{}\n\n{}", brand, "=".repeat(brand.len()), title, message);
        if let Some(code) = code {
            text.push_str(&format!("\n\nCode: {}", code));
        }
        text.push_str(&format!(
            "\n\n{}\nIf you did not request this, please ignore this email.",
            "-".repeat(50)
        ));
        text
    }
}

fn text_to_html(message: &str) -> String {
    message
        .split("\n\n")
        .map(|para| format!("<p>{}</p>", para.replace('\n', "<br>")))
        .collect()
}
