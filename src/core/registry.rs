//! # Service Registry
//!
//! `singleton_macro`의 `#[service]`, `#[repository]` 매크로가 생성한 등록 정보를
//! `inventory`로 수집하고, 타입 기반으로 싱글톤 인스턴스를 해결하는 컨테이너입니다.
//!
//! - `Database`, `RedisClient` 같은 인프라 컴포넌트는 시작 시 `ServiceLocator::set`으로 등록
//! - `TourRepository`, `AuthService` 등은 타입 이름으로 등록 정보를 찾아 지연 생성
//! - `Arc<T>` 필드는 매크로가 생성한 `new()`에서 `ServiceLocator::get::<T>()`로 주입
//!
//! 이름 규칙: `XxxRepository` → `#[repository(name = "xxx")]`,
//! `XxxService` → `#[service(name = "xxx")]`.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use log::{debug, info};
use once_cell::sync::Lazy;

/// `#[service]` 매크로가 구현하는 서비스 trait
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// `#[repository]` 매크로가 구현하는 리포지토리 trait
///
/// 캐시 키 헬퍼(`cache_key`)가 `self.name()`을 사용하므로,
/// 리포지토리 모듈에서는 이 trait을 스코프에 가져와야 합니다.
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    fn collection_name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

static SERVICE_NAME_CACHE: Lazy<HashMap<String, &'static ServiceRegistration>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
        .map(|registration| (strip_registration_suffix(registration.name), registration))
        .collect();

    debug!("Service cache: {} entries loaded", cache.len());
    cache
});

static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, &'static RepositoryRegistration>> =
    Lazy::new(|| {
        let cache: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
            .map(|registration| (strip_registration_suffix(registration.name), registration))
            .collect();

        debug!("Repository cache: {} entries loaded", cache.len());
        cache
    });

/// `"tour_repository"` → `"tour"`, `"auth_service"` → `"auth"`
fn strip_registration_suffix(name: &str) -> String {
    name.strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .unwrap_or(name)
        .to_string()
}

/// `"tour_booking_backend::repositories::tours::TourRepository"` → `"TourRepository"`
fn short_type_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// 타입 이름에서 등록 키와 종류를 계산합니다.
///
/// `TourRepository` → `Some(("tour", true))`, `EmailService` → `Some(("email", false))`
fn registration_key(type_name: &str) -> Option<(String, bool)> {
    let short = short_type_name(type_name);

    if let Some(entity) = short.strip_suffix("Repository") {
        return Some((entity.to_lowercase(), true));
    }
    short
        .strip_suffix("Service")
        .map(|entity| (entity.to_lowercase(), false))
}

type Instance = Arc<dyn Any + Send + Sync>;

pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Instance>>,
    initializing: RwLock<HashSet<TypeId>>,
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            initializing: RwLock::new(HashSet::new()),
        }
    }

    /// 타입 `T`의 싱글톤 인스턴스를 반환합니다.
    ///
    /// 생성자는 락을 잡지 않은 상태에서 호출되므로, 생성 중에 다른 의존성을
    /// `get`으로 해결해도 교착 상태가 생기지 않습니다.
    ///
    /// # Panics
    ///
    /// - 등록되지 않은 타입
    /// - 순환 의존성
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(instance) = Self::lookup::<T>(type_id) {
            return instance;
        }

        {
            let mut initializing = LOCATOR
                .initializing
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if !initializing.insert(type_id) {
                panic!("Circular dependency detected: {} is already being initialized", type_name);
            }
        }

        let instance = Self::construct::<T>(type_name);

        LOCATOR
            .initializing
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&type_id);

        let stored = LOCATOR
            .instances
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| instance.clone() as Instance)
            .clone();

        stored.downcast::<T>().unwrap_or(instance)
    }

    fn lookup<T: 'static + Send + Sync>(type_id: TypeId) -> Option<Arc<T>> {
        LOCATOR
            .instances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    fn construct<T: 'static + Send + Sync>(type_name: &str) -> Arc<T> {
        let (key, is_repository) = registration_key(type_name).unwrap_or_else(|| {
            panic!(
                "Service not found: {}. Register it with #[service] / #[repository] or ServiceLocator::set()",
                type_name
            )
        });

        let (registration_name, boxed) = if is_repository {
            let registration = REPOSITORY_NAME_CACHE
                .get(&key)
                .unwrap_or_else(|| panic!("No repository found for entity: {}", key));
            (registration.name, (registration.constructor)())
        } else {
            let registration = SERVICE_NAME_CACHE
                .get(&key)
                .unwrap_or_else(|| panic!("No service found for entity: {}", key));
            (registration.name, (registration.constructor)())
        };

        match boxed.downcast::<Arc<T>>() {
            Ok(instance) => *instance,
            Err(_) => panic!("Type mismatch for registration: {}", registration_name),
        }
    }

    /// 외부에서 생성한 인스턴스(Database, RedisClient 등)를 등록합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_id = TypeId::of::<T>();
        info!("📦 Registering: {}", short_type_name(std::any::type_name::<T>()));

        LOCATOR
            .instances
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_id, instance as Instance);
    }

    /// 등록된 모든 리포지토리와 서비스를 미리 생성합니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        info!("🔄 Initializing service registry");

        let mut repo_count = 0;
        for registration in inventory::iter::<RepositoryRegistration>() {
            let _instance = (registration.constructor)();
            debug!("   ├─ {}: ✓ created", registration.name);
            repo_count += 1;
        }

        let mut service_count = 0;
        for registration in inventory::iter::<ServiceRegistration>() {
            let _instance = (registration.constructor)();
            debug!("   ├─ {}: ✓ created", registration.name);
            service_count += 1;
        }

        info!(
            "🎉 Service registry initialized: {} repositories, {} services",
            repo_count, service_count
        );
        Ok(())
    }
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_registration_suffix() {
        assert_eq!(strip_registration_suffix("tour_repository"), "tour");
        assert_eq!(strip_registration_suffix("auth_service"), "auth");
        assert_eq!(strip_registration_suffix("plain"), "plain");
    }

    #[test]
    fn test_registration_key_from_type_name() {
        assert_eq!(
            registration_key("tour_booking_backend::repositories::tours::TourRepository"),
            Some(("tour".to_string(), true))
        );
        assert_eq!(
            registration_key("tour_booking_backend::services::email::EmailService"),
            Some(("email".to_string(), false))
        );
        assert_eq!(registration_key("tour_booking_backend::db::Database"), None);
    }

    struct Marker(u32);

    #[test]
    fn test_set_then_get_returns_same_instance() {
        ServiceLocator::set(Arc::new(Marker(7)));
        let first = ServiceLocator::get::<Marker>();
        let second = ServiceLocator::get::<Marker>();

        assert_eq!(first.0, 7);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
