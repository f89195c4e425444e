pub mod models;
pub mod selector;
pub mod traits;
pub mod ytdlp;

pub use models::{Format, FormatList, VideoInfo};
pub use selector::{select_audio_format, select_format_by_label};
pub use traits::VideoSource;
pub use ytdlp::YtDlpSource;
