use serde::{Deserialize, Serialize};

/// A named, half-open span `[begin_time, end_time)` of the lesson timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub content: String,
    pub begin_time: f64,
    pub end_time: f64,
}

impl Phase {
    pub fn new(content: impl Into<String>, begin_time: f64, end_time: f64) -> Self {
        Self {
            content: content.into(),
            begin_time,
            end_time,
        }
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.begin_time && time < self.end_time
    }
}
