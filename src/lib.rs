//! Configuration layer of the Auto Merge Tool: the front-end configuration record, the tool's
//! own settings, and the persisted list of merge schedules.

pub mod app_config;
pub mod error;
pub mod schedule;
pub mod settings;


pub use app_config::AppConfig;
pub use error::AutoMergeError;
pub use schedule::{MergeSchedule, NewMergeSchedule, ScheduleStore};
pub use settings::Settings;
