//! # 사용자 셀프 서비스
//!
//! 로그인한 사용자가 자기 계정에 대해 수행하는 작업입니다.
//! 관리자용 사용자 CRUD는 범용 핸들러([`crate::handlers::factory`])가 처리합니다.

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use singleton_macro::service;

use crate::{
    core::errors::{AppError, AppResult},
    domain::dto::users::request::UpdateMeRequest,
    domain::entities::users::User,
    repositories::users::UserRepository,
};

#[service(name = "user")]
pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    /// `name`, `email`만 수정합니다. 비밀번호 필드가 있으면 400.
    pub async fn update_me(&self, user_id: ObjectId, request: UpdateMeRequest) -> AppResult<User> {
        let set = request.to_set_document()?;

        let user = self
            .user_repo
            .update_fields(user_id, set)
            .await?
            .ok_or_else(|| AppError::NotFound("No document found with that ID".to_string()))?;

        Ok(user.without_secrets())
    }

    /// 계정 비활성화. 문서는 남고 이후 모든 조회에서 제외됩니다.
    pub async fn delete_me(&self, user_id: ObjectId) -> AppResult<()> {
        self.user_repo.deactivate(user_id).await?;
        log::info!("계정 비활성화: {}", user_id);
        Ok(())
    }
}
