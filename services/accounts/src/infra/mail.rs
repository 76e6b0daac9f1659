use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use tracing::info;
use uuid::Uuid;

use ave_accounts_schema::outbox_mails;

use crate::domain::repository::MailPort;
use crate::domain::types::OutgoingMail;
use crate::error::AccountsServiceError;

/// Queues mail in `outbox_mails`; a separate worker performs delivery.
#[derive(Clone)]
pub struct OutboxMailer {
    pub db: DatabaseConnection,
    /// Sender used when a mail has no `from_email`.
    pub default_from_email: String,
}

impl MailPort for OutboxMailer {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<(), AccountsServiceError> {
        let id = Uuid::now_v7();
        let from_email = mail
            .from_email
            .clone()
            .unwrap_or_else(|| self.default_from_email.clone());
        outbox_mails::ActiveModel {
            id: Set(id),
            subject: Set(mail.subject.clone()),
            message: Set(mail.message.clone()),
            from_email: Set(from_email),
            recipients: Set(serde_json::json!(mail.recipients)),
            idempotency_key: Set(format!("mail:{id}")),
            attempts: Set(0),
            last_error: Set(None),
            created_at: Set(Utc::now()),
            sent_at: Set(None),
            failed_at: Set(None),
        }
        .insert(&self.db)
        .await
        .map_err(|e| anyhow::Error::new(e).context("queue outbox mail"))?;
        info!(mail_id = %id, recipients = mail.recipients.len(), "mail queued");
        Ok(())
    }
}
