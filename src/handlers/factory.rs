//! # 범용 핸들러 팩토리
//!
//! [`CrudRepository`]를 구현한 모든 리포지토리에 대해 목록/단건/생성/수정/삭제
//! 핸들러 본문을 제공합니다. 라우트별 핸들러는 리포지토리 타입만 지정해 호출합니다.
//!
//! ```rust,ignore
//! #[get("")]
//! pub async fn get_all_tours(req: HttpRequest) -> Result<HttpResponse, AppError> {
//!     factory::get_all::<TourRepository>(&req).await
//! }
//! ```
//!
//! 중첩 경로(`/tours/{tourId}/reviews`)에서는 `R::PARENT`의 경로 파라미터가
//! 목록 필터와 생성 문맥에 자동으로 들어갑니다.

use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use mongodb::bson::{oid::ObjectId, Document};
use validator::Validate;

use crate::core::errors::{AppError, AppResult};
use crate::domain::auth::authenticated_user::AuthenticatedUser;
use crate::domain::dto::envelope;
use crate::repositories::crud::{CrudRepository, WriteContext};
use crate::repositories::query_builder::{QueryBuilder, QueryString};
use crate::utils::bson_json::{document_to_json, documents_to_json};

pub const NO_DOCUMENT_FOUND: &str = "No document found with that ID";

fn not_found() -> AppError {
    AppError::NotFound(NO_DOCUMENT_FOUND.to_string())
}

/// 경로 파라미터를 ObjectId로 변환합니다. 형식이 틀리면 400.
pub fn path_object_id(req: &HttpRequest, param: &str) -> AppResult<ObjectId> {
    let raw = req
        .match_info()
        .get(param)
        .ok_or_else(|| AppError::ValidationError(format!("Missing path parameter: {}", param)))?;
    ObjectId::parse_str(raw).map_err(|_| AppError::invalid_id(raw))
}

/// 중첩 경로의 부모 ID. 중첩되지 않은 경로에서는 `None`.
fn parent_id<R: CrudRepository>(req: &HttpRequest) -> AppResult<Option<ObjectId>> {
    match R::PARENT {
        Some(parent) if req.match_info().get(parent.param).is_some() => {
            path_object_id(req, parent.param).map(Some)
        }
        _ => Ok(None),
    }
}

/// 부모 ID가 있으면 기본 필터에 참조 조건을 더합니다.
pub fn list_base_filter<R: CrudRepository>(repo: &R, parent: Option<ObjectId>) -> Document {
    let mut filter = repo.base_filter();
    if let (Some(parent_ref), Some(id)) = (R::PARENT, parent) {
        filter.insert(parent_ref.field, id);
    }
    filter
}

pub async fn get_all<R: CrudRepository>(req: &HttpRequest) -> AppResult<HttpResponse> {
    let query = QueryString::parse(req.query_string());
    get_all_with::<R>(req, &query).await
}

/// 이미 가공된 쿼리 문자열로 목록 조회 (별칭 경로용)
pub async fn get_all_with<R: CrudRepository>(
    req: &HttpRequest,
    query: &QueryString,
) -> AppResult<HttpResponse> {
    let repo = R::handle();
    let base = list_base_filter(repo.as_ref(), parent_id::<R>(req)?);

    let list_query = QueryBuilder::new(query, base)
        .filter()?
        .sort()
        .limit_fields()
        .paginate()
        .build();

    let docs = repo.find_many(&list_query).await?;
    log::debug!("{} 목록 조회: {}건", R::MODEL, docs.len());

    Ok(HttpResponse::Ok().json(envelope::list(documents_to_json(&docs, R::HIDDEN_FIELDS))))
}

pub async fn get_one<R: CrudRepository>(req: &HttpRequest) -> AppResult<HttpResponse> {
    get_by_id::<R>(path_object_id(req, "id")?).await
}

pub async fn get_by_id<R: CrudRepository>(id: ObjectId) -> AppResult<HttpResponse> {
    let doc = R::handle().find_one_by_id(id).await?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(envelope::single(document_to_json(&doc, R::HIDDEN_FIELDS))))
}

pub async fn create_one<R: CrudRepository>(
    req: &HttpRequest,
    input: R::Create,
) -> AppResult<HttpResponse> {
    input.validate()?;

    let repo = R::handle();
    let current = req.extensions().get::<AuthenticatedUser>().cloned();
    let ctx = WriteContext {
        parent_id: parent_id::<R>(req)?,
        current_user: current.as_ref().map(|auth| &auth.user),
    };

    let document = repo.new_document(input, &ctx)?;
    let created = repo.insert(document).await?;

    Ok(HttpResponse::Created().json(envelope::single(document_to_json(&created, R::HIDDEN_FIELDS))))
}

pub async fn update_one<R: CrudRepository>(
    req: &HttpRequest,
    input: R::Update,
) -> AppResult<HttpResponse> {
    input.validate()?;
    let id = path_object_id(req, "id")?;

    let repo = R::handle();
    let set = repo.update_document(&input)?;
    let updated = repo.update_by_id(id, set).await?.ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(envelope::single(document_to_json(&updated, R::HIDDEN_FIELDS))))
}

pub async fn delete_one<R: CrudRepository>(req: &HttpRequest) -> AppResult<HttpResponse> {
    let id = path_object_id(req, "id")?;
    R::handle().delete_by_id(id).await?.ok_or_else(not_found)?;

    Ok(HttpResponse::NoContent().finish())
}
