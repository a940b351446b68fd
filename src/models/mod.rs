pub mod chain;
pub mod phase;
pub mod question;
pub mod report;

pub use chain::{
    BloomProgression, Chain, ChainedQuestion, Characteristics, ProgressionPattern,
    SentimentClass, Timeline,
};
pub use phase::Phase;
pub use question::{CognitiveLevel, Question, RawQuestion, Sentiment, TopicCategory};
pub use report::{ChainReport, ReportMetadata, TimeRange};
