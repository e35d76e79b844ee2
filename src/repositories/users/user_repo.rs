//! # 사용자 리포지토리 구현
//!
//! 사용자 엔티티의 데이터 액세스 계층입니다. MongoDB를 주 저장소로 사용하고,
//! 인증 미들웨어가 매 요청마다 조회하는 사용자 정보는 Redis에 캐싱합니다.
//!
//! ## 특징
//!
//! - **비활성 사용자 제외**: `active: false` 문서는 모든 조회에서 제외
//! - **민감 필드 숨김**: 비밀번호 해시, 재설정 토큰은 응답에 포함되지 않음
//! - **쓰기 후 캐시 무효화**: 수정/비밀번호 변경/비활성화 시 캐시 제거

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::{
    bson::{self, doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    IndexModel,
};
use singleton_macro::repository;

use crate::{
    caching::redis::RedisClient,
    config::PasswordConfig,
    core::errors::AppResult,
    core::registry::Repository,
    db::Database,
    domain::dto::users::request::{AdminUpdateUserRequest, SignupRequest},
    domain::entities::users::User,
    repositories::crud::{CrudRepository, WriteContext},
    utils::string_utils::normalize_email,
};

/// 캐시 TTL (초)
const USER_CACHE_TTL: u64 = 600;

/// 세대 키 TTL (초). 캐시 TTL보다 길어야 합니다.
const USER_GENERATION_TTL: i64 = 86_400;

/// 캐시 키마다 따로 두는 쓰기 세대 키
pub fn generation_key(cache_key: &str) -> String {
    format!("{}:generation", cache_key)
}

/// 사용자 데이터 액세스 리포지토리
///
/// ## 캐싱 전략
///
/// - **키 패턴**: `user_repository:{user_id}` (매크로의 `cache_key()` 사용)
/// - **TTL**: 10분 (600초)
/// - **저장 형태**: 비밀번호/재설정 토큰을 제거한 사본
/// - **쓰기 세대**: 쓰기마다 `{key}:generation`을 올린 뒤 키를 지우고, 캐시 미스 시에는
///   조회 전에 읽어 둔 세대가 그대로일 때만 저장합니다. 조회와 무효화가 겹쳐도
///   비밀번호 변경이나 비활성화 이전의 사본이 다시 캐싱되지 않습니다.
///
/// 비밀번호 검증이 필요한 조회(`find_by_email`, `find_with_password`)는 캐시를 거치지 않습니다.
#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    /// MongoDB 데이터베이스 연결
    db: Arc<Database>,

    /// Redis 캐시 클라이언트
    redis: Arc<RedisClient>,
}

fn active_filter() -> Document {
    doc! { "active": { "$ne": false } }
}

impl UserRepository {
    fn active_by_id(id: ObjectId) -> Document {
        let mut filter = active_filter();
        filter.insert("_id", id);
        filter
    }

    async fn evict(&self, id: &ObjectId) {
        let key = self.cache_key(&id.to_hex());
        if let Err(e) = self
            .redis
            .bump_generation(&generation_key(&key), USER_GENERATION_TTL)
            .await
        {
            log::warn!("사용자 캐시 세대 갱신 실패 ({}): {}", key, e);
        }
        if let Err(e) = self.redis.del(&key).await {
            log::warn!("사용자 캐시 무효화 실패 ({}): {}", key, e);
        }
    }

    /// 로그인용 이메일 조회 (비밀번호 해시 포함)
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let mut filter = active_filter();
        filter.insert("email", normalize_email(email));

        Ok(self.collection::<User>().find_one(filter).await?)
    }

    /// 비밀번호 변경용 조회 (비밀번호 해시 포함, 캐시 미사용)
    pub async fn find_with_password(&self, id: ObjectId) -> AppResult<Option<User>> {
        Ok(self
            .collection::<User>()
            .find_one(Self::active_by_id(id))
            .await?)
    }

    /// ID로 활성 사용자 조회
    ///
    /// 캐시 우선 조회 후, 캐시 미스면 DB에서 읽어 비밀 필드를 제거한 사본을 저장합니다.
    /// 조회 도중 쓰기가 끝났으면 저장하지 않습니다.
    pub async fn find_active_by_id(&self, id: ObjectId) -> AppResult<Option<User>> {
        let cache_key = self.cache_key(&id.to_hex());
        let generation_key = generation_key(&cache_key);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }
        let generation = self.redis.generation(&generation_key).await.ok();

        let user = self
            .collection::<User>()
            .find_one(Self::active_by_id(id))
            .await?
            .map(|user| user.without_secrets());

        if let (Some(user), Some(generation)) = (&user, generation) {
            match self
                .redis
                .set_if_generation(&cache_key, &generation_key, generation, user, USER_CACHE_TTL)
                .await
            {
                Ok(false) => log::debug!("동시 쓰기로 사용자 캐시 저장 생략: {}", cache_key),
                Ok(true) => {}
                Err(e) => log::warn!("사용자 캐시 저장 실패 ({}): {}", cache_key, e),
            }
        }

        Ok(user)
    }

    /// 해시된 재설정 토큰이 일치하고 아직 만료되지 않은 사용자
    pub async fn find_by_reset_token(&self, token_hash: &str, now: DateTime) -> AppResult<Option<User>> {
        let mut filter = active_filter();
        filter.insert("passwordResetToken", token_hash);
        filter.insert("passwordResetExpires", doc! { "$gt": now });

        Ok(self.collection::<User>().find_one(filter).await?)
    }

    /// 재설정 토큰 저장. `None`이면 두 필드를 모두 제거합니다.
    pub async fn set_reset_token(
        &self,
        id: ObjectId,
        token: Option<(String, DateTime)>,
    ) -> AppResult<()> {
        let update = match token {
            Some((hash, expires)) => doc! { "$set": {
                "passwordResetToken": hash,
                "passwordResetExpires": expires,
            } },
            None => doc! { "$unset": {
                "passwordResetToken": "",
                "passwordResetExpires": "",
            } },
        };

        self.collection::<User>()
            .update_one(doc! { "_id": id }, update)
            .await?;
        Ok(())
    }

    /// 비밀번호 교체. 변경 시각을 기록하고 남아 있는 재설정 토큰을 제거합니다.
    pub async fn set_password(
        &self,
        id: ObjectId,
        password_hash: &str,
        changed_at: DateTime,
    ) -> AppResult<()> {
        self.collection::<User>()
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": { "password": password_hash, "passwordChangedAt": changed_at },
                    "$unset": { "passwordResetToken": "", "passwordResetExpires": "" },
                },
            )
            .await?;

        self.evict(&id).await;
        Ok(())
    }

    /// 본인 정보 수정 후 최신 사용자 반환
    pub async fn update_fields(&self, id: ObjectId, set: Document) -> AppResult<Option<User>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let user = self
            .collection::<User>()
            .find_one_and_update(Self::active_by_id(id), doc! { "$set": set })
            .with_options(options)
            .await?;

        self.evict(&id).await;
        Ok(user)
    }

    /// 소프트 삭제 (`active: false`)
    pub async fn deactivate(&self, id: ObjectId) -> AppResult<()> {
        self.collection::<User>()
            .update_one(doc! { "_id": id }, doc! { "$set": { "active": false } })
            .await?;

        self.evict(&id).await;
        Ok(())
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// - **이메일 유니크 인덱스**: 중복 가입 방지 (중복 시 409)
    pub async fn create_indexes(&self) -> AppResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        self.collection::<User>().create_index(email_index).await?;
        Ok(())
    }
}

#[async_trait]
impl CrudRepository for UserRepository {
    type Create = SignupRequest;
    type Update = AdminUpdateUserRequest;

    const MODEL: &'static str = "user";
    const HIDDEN_FIELDS: &'static [&'static str] = &[
        "__v",
        "password",
        "active",
        "passwordResetToken",
        "passwordResetExpires",
    ];
    const SOFT_DELETE: bool = true;

    fn handle() -> Arc<Self> {
        Self::instance()
    }

    fn documents(&self) -> mongodb::Collection<Document> {
        self.collection::<Document>()
    }

    fn base_filter(&self) -> Document {
        active_filter()
    }

    /// 신규 사용자 문서. 역할은 요청과 무관하게 `user`이며 비밀번호는 bcrypt로 해시합니다.
    fn new_document(&self, input: SignupRequest, _ctx: &WriteContext<'_>) -> AppResult<Document> {
        let hash = bcrypt::hash(&input.password, PasswordConfig::bcrypt_cost())?;
        let user = User::new(input.name, normalize_email(&input.email), hash);
        Ok(bson::to_document(&user)?)
    }

    fn update_document(&self, input: &AdminUpdateUserRequest) -> AppResult<Document> {
        input.to_set_document()
    }

    async fn after_write(&self, document: &Document) -> AppResult<()> {
        if let Ok(id) = document.get_object_id("_id") {
            self.evict(&id).await;
        }
        Ok(())
    }
}
