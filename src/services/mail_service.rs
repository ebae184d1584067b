// src/services/mail_service.rs
use crate::{
    config::SmtpConfig,
    error::{AppError, AppResult},
};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};

/// Envio de emails. Implementado por SMTP em produção e por gravadores nos testes.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: Message) -> AppResult<()>;
}

/// Mailer ligado a um servidor SMTP real através do `lettre`.
#[derive(Clone)]
pub struct LettreMailer(AsyncSmtpTransport<Tokio1Executor>);

impl LettreMailer {
    pub fn connect(config: &SmtpConfig) -> AppResult<Self> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.relay)
            .map_err(|e| AppError::ConfigError(format!("SMTP_RELAY inválido: {}", e)))?
            .credentials(creds)
            .build();
        Ok(LettreMailer(transport))
    }
}

#[async_trait]
impl Mailer for LettreMailer {
    async fn send(&self, message: Message) -> AppResult<()> {
        self.0
            .send(message)
            .await
            .map_err(|e| AppError::MailError(format!("Falha na comunicação SMTP: {}", e)))?;
        Ok(())
    }
}

/// Sem SMTP configurado os emails ficam apenas no log.
#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: Message) -> AppResult<()> {
        let to: Vec<String> = message.envelope().to().iter().map(ToString::to_string).collect();
        tracing::warn!("SMTP não configurado; email para {:?} descartado.", to);
        Ok(())
    }
}

fn parse_mailbox(raw: &str) -> AppResult<Mailbox> {
    raw.parse::<Mailbox>()
        .map_err(|e| AppError::MailError(format!("Endereço inválido '{}': {}", raw, e)))
}

/// Monta o email de recuperação de senha. O token fica sozinho numa linha.
pub fn reset_password_message(from: &str, to: &str, token: &str, ttl_minutes: i64) -> AppResult<Message> {
    let body = format!(
        "Recebemos um pedido para redefinir a sua senha do Circular.\n\
         \n\
         Use o código abaixo no aplicativo:\n\
         \n\
         {}\n\
         \n\
         O código expira em {} minutos. Se não fez este pedido, ignore este email.\n",
        token, ttl_minutes
    );

    Message::builder()
        .from(parse_mailbox(from)?)
        .to(parse_mailbox(to)?)
        .subject("Redefinição de senha")
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| AppError::MailError(format!("Falha ao montar email: {}", e)))
}
