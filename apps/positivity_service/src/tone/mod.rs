pub mod models;
pub mod prompt_builder;
pub mod request_validator;
pub mod response_parser;
pub mod tone_controller;
pub mod tone_service;
