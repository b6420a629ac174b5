pub mod completion_client;
pub mod normalizer;
pub mod prompt_builder;
pub mod quiz_service;
