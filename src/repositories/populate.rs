//! # 참조 문서 채우기
//!
//! ObjectId 참조를 `$lookup` 단계로 풀어 응답에 실제 문서를 넣습니다.
//!
//! ```rust,ignore
//! // 리뷰 → 작성자 (name, photo만)
//! Populate::one("user", "users").select(&["name", "photo"]);
//!
//! // 투어 → 리뷰 목록 (역참조) → 각 리뷰의 작성자
//! Populate::reverse("reviews", "reviews", "tour")
//!     .with(Populate::one("user", "users").select(&["name", "photo"]));
//! ```

use mongodb::bson::{doc, Bson, Document};

/// 조회 결과에 끼워 넣을 참조 정의
#[derive(Debug, Clone, PartialEq)]
pub struct Populate {
    /// 결과를 담을 필드
    pub path: &'static str,
    pub from: &'static str,
    pub local_field: &'static str,
    pub foreign_field: &'static str,
    /// 단일 참조면 배열 대신 문서 하나(없으면 필드 제거)
    pub single: bool,
    pub projection: Document,
    pub filter: Document,
    pub nested: Vec<Populate>,
}

impl Populate {
    fn base(path: &'static str, from: &'static str) -> Self {
        Self {
            path,
            from,
            local_field: path,
            foreign_field: "_id",
            single: false,
            projection: Document::new(),
            filter: Document::new(),
            nested: Vec::new(),
        }
    }

    /// `path`에 ObjectId 하나가 저장된 경우
    pub fn one(path: &'static str, from: &'static str) -> Self {
        Self { single: true, ..Self::base(path, from) }
    }

    /// `path`에 ObjectId 배열이 저장된 경우
    pub fn many(path: &'static str, from: &'static str) -> Self {
        Self::base(path, from)
    }

    /// 상대 컬렉션의 `foreign_field`가 이 문서의 `_id`를 가리키는 경우 (가상 필드)
    pub fn reverse(path: &'static str, from: &'static str, foreign_field: &'static str) -> Self {
        Self {
            local_field: "_id",
            foreign_field,
            ..Self::base(path, from)
        }
    }

    pub fn select(mut self, fields: &[&str]) -> Self {
        self.projection = fields.iter().map(|f| (f.to_string(), Bson::Int32(1))).collect();
        self
    }

    pub fn exclude(mut self, fields: &[&str]) -> Self {
        self.projection = fields.iter().map(|f| (f.to_string(), Bson::Int32(0))).collect();
        self
    }

    pub fn filter(mut self, filter: Document) -> Self {
        self.filter = filter;
        self
    }

    pub fn with(mut self, nested: Populate) -> Self {
        self.nested.push(nested);
        self
    }

    pub fn stages(&self) -> Vec<Document> {
        let mut sub_pipeline: Vec<Document> = Vec::new();
        if !self.filter.is_empty() {
            sub_pipeline.push(doc! { "$match": self.filter.clone() });
        }
        for nested in &self.nested {
            sub_pipeline.extend(nested.stages());
        }
        if !self.projection.is_empty() {
            sub_pipeline.push(doc! { "$project": self.projection.clone() });
        }

        let mut lookup = doc! {
            "from": self.from,
            "localField": self.local_field,
            "foreignField": self.foreign_field,
            "as": self.path,
        };
        if !sub_pipeline.is_empty() {
            lookup.insert("pipeline", sub_pipeline);
        }

        let mut stages = vec![doc! { "$lookup": lookup }];
        if self.single {
            stages.push(doc! {
                "$unwind": {
                    "path": format!("${}", self.path),
                    "preserveNullAndEmptyArrays": true,
                }
            });
        }
        stages
    }
}

/// 비활성 사용자는 참조 결과에서도 제외하고 민감 필드를 숨깁니다.
pub fn public_user(path: &'static str) -> Populate {
    Populate::one(path, "users").filter(doc! { "active": { "$ne": false } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_reference_unwinds() {
        let stages = Populate::one("user", "users").select(&["name", "photo"]).stages();
        assert_eq!(stages.len(), 2);

        let lookup = stages[0].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("localField").unwrap(), "user");
        assert_eq!(lookup.get_str("foreignField").unwrap(), "_id");
        let pipeline = lookup.get_array("pipeline").unwrap();
        assert_eq!(pipeline.len(), 1);

        let unwind = stages[1].get_document("$unwind").unwrap();
        assert_eq!(unwind.get_str("path").unwrap(), "$user");
        assert!(unwind.get_bool("preserveNullAndEmptyArrays").unwrap());
    }

    #[test]
    fn test_reverse_reference_with_nested_lookup() {
        let populate = Populate::reverse("reviews", "reviews", "tour")
            .with(public_user("user").select(&["name", "photo"]));
        let stages = populate.stages();
        assert_eq!(stages.len(), 1);

        let lookup = stages[0].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("localField").unwrap(), "_id");
        assert_eq!(lookup.get_str("foreignField").unwrap(), "tour");

        // nested: $lookup + $unwind
        let pipeline = lookup.get_array("pipeline").unwrap();
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn test_plain_lookup_has_no_pipeline() {
        let stages = Populate::many("guides", "users").stages();
        let lookup = stages[0].get_document("$lookup").unwrap();
        assert!(!lookup.contains_key("pipeline"));
    }
}
