pub mod illustration;
pub mod report;
pub mod story;

pub use illustration::{IllustrationProvider, IllustrationStatus};
pub use report::{LogReportSink, ReportSink};
pub use story::{JsonStoryDirectory, StoryProvider};
