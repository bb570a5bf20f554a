pub mod recorder;

pub use recorder::{record_response_time, RecorderConfig, RecorderLayerState};
