pub mod codec;
pub mod consumer;
pub mod dispatch;
pub mod processors;
pub mod producer;
pub mod validation;

pub use consumer::{ConsumerRunner, ConsumerRunnerConfig};
pub use dispatch::{DeliveredMessage, KindProcessor};
pub use processors::{HistoryProcessor, PersonalProcessor, PositionProcessor, ProcessorCore};
pub use producer::HrEventPublisher;
pub use validation::ValidationRules;
