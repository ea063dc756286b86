use anyhow::Context;
use handlebars::Handlebars;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Context rendered into the cancellation template and carried by the
/// background job payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationContext {
    pub provider: String,
    pub user: String,
    pub date: String,
}

/// Sender seam for the cancellation notice, so the delivery side effect
/// can be observed in tests without an SMTP server.
#[async_trait::async_trait]
pub trait CancellationSender {
    async fn send_cancellation(&self, to: &str, context: &CancellationContext)
        -> anyhow::Result<()>;
}

/// SMTP transport plus the compiled message templates. Built once at
/// startup and handed to whoever needs to send mail.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    templates: Handlebars<'static>,
    from: String,
}

impl Mailer {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let credentials = Credentials::new(config.smtp_user.clone(), config.smtp_pass.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .context("invalid SMTP host")?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        let mut templates = Handlebars::new();
        templates
            .register_template_string("cancellation", include_str!("templates/cancellation.hbs"))
            .context("invalid cancellation template")?;

        Ok(Self {
            transport,
            templates,
            from: config.smtp_from.clone(),
        })
    }

    async fn send_mail<T: Serialize>(
        &self,
        to: &str,
        subject: &str,
        template: &str,
        context: &T,
    ) -> anyhow::Result<()> {
        let body = self
            .templates
            .render(template, context)
            .with_context(|| format!("error rendering template {template}"))?;

        let message = Message::builder()
            .from(self.from.parse().context("invalid sender address")?)
            .to(to.parse().context("invalid recipient address")?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body)?;

        self.transport
            .send(message)
            .await
            .context("error sending mail")?;

        log::info!("mail sent to {}", to);
        Ok(())
    }
}

#[async_trait::async_trait]
impl CancellationSender for Mailer {
    async fn send_cancellation(
        &self,
        to: &str,
        context: &CancellationContext,
    ) -> anyhow::Result<()> {
        self.send_mail(to, "Agendamento Cancelado!", "cancellation", context)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_template_renders_the_context() {
        let mut templates = Handlebars::new();
        templates
            .register_template_string("cancellation", include_str!("templates/cancellation.hbs"))
            .unwrap();

        let body = templates
            .render(
                "cancellation",
                &CancellationContext {
                    provider: "Cleiton".to_string(),
                    user: "Maria".to_string(),
                    date: "dia 01 de janeiro, às 10:00h".to_string(),
                },
            )
            .unwrap();

        assert!(body.contains("Cleiton"));
        assert!(body.contains("Maria"));
        assert!(body.contains("dia 01 de janeiro, às 10:00h"));
    }
}
