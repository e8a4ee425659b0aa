//! 数据模型
//!
//! 与角色服务 HTTP 契约一一对应的类型

pub mod bulk;
pub mod catalog;
pub mod interview;
pub mod persona;
pub mod profile;
pub mod region;

pub use bulk::{BulkQuestionRequest, ProgressEvent, StreamRecord};
pub use catalog::{PrefectureSummary, UsageLevel, UsageStatus};
pub use interview::{ChatMessage, ChatRole, InterviewReply, InterviewRequest};
pub use persona::{Persona, PersonaList};
pub use profile::{EnhancedProfile, LifelogCategory, LifelogEvent, PersonaProfile, PsychProfile};
pub use region::{region_of, Region, REGIONS};
