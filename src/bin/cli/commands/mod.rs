pub mod acquire;
pub mod add;
pub mod exchange;
pub mod list;
pub mod reset;
pub mod review;
pub mod say;
pub mod screens;
pub mod settings;
pub mod stats;
pub mod study;
