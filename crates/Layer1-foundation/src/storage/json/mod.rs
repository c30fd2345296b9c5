//! JSON 설정 레이어

mod store;

pub use store::{read_file, JsonStore};
