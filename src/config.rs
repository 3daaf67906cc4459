use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "form_uploader", about = "Send a name, a description and files to an upload endpoint")]
pub struct Settings {
    /// Base URL of the upload service; requests go to `<base>/upload`.
    #[arg(long, env = "FORM_UPLOADER_API_BASE_URL", default_value = "http://localhost:5000")]
    pub api_base_url: String,

    /// Seconds a notification stays visible before it closes by itself.
    #[arg(long, env = "FORM_UPLOADER_NOTIFICATION_TIMEOUT", default_value_t = 6)]
    pub notification_timeout_secs: u64,

    /// tracing filter directive, e.g. `info` or `form_uploader=debug`.
    #[arg(long = "log", env = "FORM_UPLOADER_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Settings {
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }
}
