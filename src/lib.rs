pub mod logging;
pub mod notifier;
pub mod pipeline;
pub mod storage;
pub mod submission;
pub mod web;
