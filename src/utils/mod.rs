//! # Utilities
//!
//! - [`string_utils`] - 입력 문자열 정리, 이메일 정규화, 슬러그
//! - [`bson_json`] - 응답용 BSON → JSON 변환
//! - [`html`] - 서버 렌더링 페이지용 HTML 빌더

pub mod bson_json;
pub mod html;
pub mod string_utils;
