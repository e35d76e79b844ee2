use crate::domain::entities::users::Role;

/// 토큰이 없거나 유효하지 않을 때의 처리 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 실패 시 401 응답
    Required,
    /// 쿠키가 유효하면 사용자를 바인딩하고, 그 외에는 그냥 통과
    Optional,
}

/// 경로에 필요한 역할
#[derive(Debug, Clone)]
pub enum RequiredRole {
    Single(Role),
    Any(Vec<Role>),
}

impl RequiredRole {
    pub fn is_satisfied(&self, role: Role) -> bool {
        match self {
            RequiredRole::Single(required) => *required == role,
            RequiredRole::Any(required) => required.contains(&role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_requirements() {
        let staff = RequiredRole::Any(vec![Role::Admin, Role::LeadGuide]);
        assert!(staff.is_satisfied(Role::LeadGuide));
        assert!(!staff.is_satisfied(Role::Guide));

        assert!(RequiredRole::Single(Role::User).is_satisfied(Role::User));
        assert!(!RequiredRole::Single(Role::User).is_satisfied(Role::Admin));
    }
}
