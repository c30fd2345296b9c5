//! Config - Publisher 설정 관리
//!
//! - `publisher.rs` - PublisherConfig (host/port/제목/표면 활성화)
//!
//! ## 로드 순서
//!
//! 1. 기본값
//! 2. 글로벌: `<config_dir>/genro/publisher.json`
//! 3. 프로젝트: `.genro/publisher.json`
//! 4. 환경 변수: `GENRO_HOST`, `GENRO_PORT`, `GENRO_TITLE`
//!
//! 각 단계는 이전 단계를 필드 단위로 덮어씁니다.

mod publisher;

pub use publisher::{
    PublisherConfig, PublisherConfigFile, ENV_HOST, ENV_PORT, ENV_TITLE, PUBLISHER_CONFIG_FILE,
};
