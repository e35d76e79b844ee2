//! # 범용 CRUD 리포지토리
//!
//! 투어/사용자/리뷰 리포지토리가 공유하는 목록·단건·생성·수정·삭제 구현입니다.
//! 각 리포지토리는 컬렉션 핸들과 모델별 훅만 제공하고, 범용 핸들러
//! ([`crate::handlers::factory`])가 이 트레이트를 통해 동작합니다.
//!
//! ```text
//! GET    /             → find_many      (QueryBuilder + list_populates)
//! GET    /{id}         → find_one_by_id (detail_populates)
//! POST   /             → new_document → insert → after_write
//! PATCH  /{id}         → update_document → update_by_id → after_write
//! DELETE /{id}         → delete_by_id → after_write
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Collection,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::User;
use crate::repositories::{populate::Populate, query_builder::ListQuery};

/// 중첩 경로의 부모 참조 (`/tours/{tourId}/reviews` → `tour` 필드)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef {
    /// 경로 파라미터 이름
    pub param: &'static str,
    /// 자식 문서의 참조 필드
    pub field: &'static str,
}

/// 생성 훅에 전달되는 요청 문맥
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteContext<'a> {
    pub parent_id: Option<ObjectId>,
    pub current_user: Option<&'a User>,
}

#[async_trait]
pub trait CrudRepository: Send + Sync + 'static {
    type Create: DeserializeOwned + Validate + Send + 'static;
    type Update: DeserializeOwned + Validate + Send + Sync + 'static;

    /// 로그용 모델 이름
    const MODEL: &'static str;
    const PARENT: Option<ParentRef> = None;
    /// 응답에서 항상 제거되는 필드
    const HIDDEN_FIELDS: &'static [&'static str] = &["__v"];
    /// 삭제 시 문서를 지우지 않고 `active: false`로 표시
    const SOFT_DELETE: bool = false;

    fn handle() -> Arc<Self>;

    fn documents(&self) -> Collection<Document>;

    /// 모든 조회에 항상 적용되는 조건
    fn base_filter(&self) -> Document {
        Document::new()
    }

    fn list_populates(&self) -> Vec<Populate> {
        Vec::new()
    }

    fn detail_populates(&self) -> Vec<Populate> {
        self.list_populates()
    }

    fn new_document(&self, input: Self::Create, ctx: &WriteContext<'_>) -> AppResult<Document>;

    fn update_document(&self, input: &Self::Update) -> AppResult<Document>;

    /// 쓰기(생성/수정/삭제) 직후 호출. 파생 데이터 재계산에 사용합니다.
    async fn after_write(&self, _document: &Document) -> AppResult<()> {
        Ok(())
    }

    fn id_filter(&self, id: ObjectId) -> Document {
        let mut filter = self.base_filter();
        filter.insert("_id", id);
        filter
    }

    fn hidden_projection(&self) -> Document {
        Self::HIDDEN_FIELDS
            .iter()
            .map(|field| (field.to_string(), Bson::Int32(0)))
            .collect()
    }

    async fn find_many(&self, query: &ListQuery) -> AppResult<Vec<Document>> {
        let mut query = query.clone();
        query.hide_fields(Self::HIDDEN_FIELDS);

        let cursor = self
            .documents()
            .aggregate(query.pipeline(&self.list_populates()))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one_by_id(&self, id: ObjectId) -> AppResult<Option<Document>> {
        let mut pipeline = vec![doc! { "$match": self.id_filter(id) }];
        for populate in self.detail_populates() {
            pipeline.extend(populate.stages());
        }
        pipeline.push(doc! { "$project": self.hidden_projection() });

        let mut cursor = self.documents().aggregate(pipeline).await?;
        Ok(cursor.try_next().await?)
    }

    async fn insert(&self, mut document: Document) -> AppResult<Document> {
        let result = self.documents().insert_one(&document).await?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError(format!("{} insert returned a non-ObjectId id", Self::MODEL))
        })?;
        document.insert("_id", id);

        self.after_write(&document).await?;
        log::debug!("{} 생성: {}", Self::MODEL, id);
        Ok(document)
    }

    async fn update_by_id(&self, id: ObjectId, set: Document) -> AppResult<Option<Document>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .documents()
            .find_one_and_update(self.id_filter(id), doc! { "$set": set })
            .with_options(options)
            .await?;

        if let Some(document) = &updated {
            self.after_write(document).await?;
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, id: ObjectId) -> AppResult<Option<Document>> {
        let deleted = if Self::SOFT_DELETE {
            self.documents()
                .find_one_and_update(self.id_filter(id), doc! { "$set": { "active": false } })
                .await?
        } else {
            self.documents().find_one_and_delete(self.id_filter(id)).await?
        };

        if let Some(document) = &deleted {
            self.after_write(document).await?;
            log::debug!("{} 삭제: {}", Self::MODEL, id);
        }
        Ok(deleted)
    }
}
