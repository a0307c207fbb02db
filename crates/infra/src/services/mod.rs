mod mailer;

pub use mailer::{IMailer, InMemoryMailer, MailRelayService, ReminderEmail};
