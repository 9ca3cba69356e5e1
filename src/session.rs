//! Per-process session holding the last ranked table for export

use crate::config::EmailConfig;
use crate::error::{RankerError, Result};
use crate::export::{EmailMessage, MailTransport};
use crate::output::{render_html_fragment, RankedTable};
use crate::processing::pipeline::RunReport;
use log::info;

#[derive(Debug, Default)]
pub struct Session {
    last_table: Option<RankedTable>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the table of a completed run. Runs over an empty folder leave
    /// the previous table in place and return `None`.
    pub fn record(&mut self, report: &RunReport) -> Option<&RankedTable> {
        if report.no_files_found() {
            return None;
        }
        self.last_table = Some(RankedTable::from_report(report));
        self.last_table.as_ref()
    }

    pub fn last_table(&self) -> Option<&RankedTable> {
        self.last_table.as_ref()
    }

    /// Email the last ranked table
    pub async fn export(&self, transport: &dyn MailTransport, email: &EmailConfig) -> Result<()> {
        let table = self.last_table.as_ref().ok_or(RankerError::ExportPrecondition)?;

        let message = EmailMessage {
            from: email.sender.clone(),
            to: email.receiver.clone(),
            subject: email.subject.clone(),
            html_body: render_html_fragment(table)?,
        };
        transport.send(&message).await?;

        info!("Exported {} ranked resumes to {}", table.rows.len(), email.receiver);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::processing::ranker::MatchResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<EmailMessage>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, message: &EmailMessage) -> Result<()> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn report(files_listed: usize) -> RunReport {
        RunReport {
            folder_id: "folder".to_string(),
            files_listed,
            ranked: (0..files_listed)
                .map(|i| MatchResult {
                    name: format!("r{i}.pdf"),
                    file_id: format!("r{i}"),
                    score: 1.0 - i as f32 * 0.1,
                    download_link: format!("https://drive.google.com/file/d/r{i}/view?usp=sharing"),
                })
                .collect(),
            skipped: Vec::new(),
            model_name: "test".to_string(),
            processing_time_ms: 1,
        }
    }

    fn email() -> EmailConfig {
        let mut email = Config::default().email;
        email.sender = "hr@example.com".to_string();
        email.receiver = "lead@example.com".to_string();
        email
    }

    #[tokio::test]
    async fn test_export_before_run_is_rejected() {
        let transport = RecordingTransport::default();
        let err = Session::new().export(&transport, &email()).await.unwrap_err();
        assert!(matches!(err, RankerError::ExportPrecondition));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_sends_last_table() {
        let transport = RecordingTransport::default();
        let mut session = Session::new();
        session.record(&report(1));
        session.record(&report(2));

        session.export(&transport, &email()).await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "lead@example.com");
        assert!(sent[0].html_body.contains("r1.pdf"));
    }

    #[test]
    fn test_empty_folder_keeps_previous_table() {
        let mut session = Session::new();
        assert!(session.record(&report(0)).is_none());
        assert!(session.last_table().is_none());

        session.record(&report(2));
        assert!(session.record(&report(0)).is_none());
        assert_eq!(session.last_table().unwrap().rows.len(), 2);
    }
}
