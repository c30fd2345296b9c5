//! Storage module for genro-api
//!
//! - `json`: JSON - 설정 파일 레이어 읽기

mod json;

pub use json::{read_file, JsonStore};
