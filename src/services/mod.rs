pub mod interview_session;
pub mod persona_directory;
pub mod usage_monitor;

pub use interview_session::InterviewSession;
pub use persona_directory::PersonaDirectory;
pub use usage_monitor::UsageMonitor;
