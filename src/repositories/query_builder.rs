//! # 목록 조회 쿼리 빌더
//!
//! URL 쿼리 문자열을 MongoDB 필터/정렬/프로젝션/페이지네이션으로 변환합니다.
//!
//! ```text
//! ?difficulty=easy&price[lt]=1500&sort=-ratingsAverage,price&fields=name,price&page=2&limit=10
//!
//! filter     { difficulty: "easy", price: { $lt: 1500 } }
//! sort       { ratingsAverage: -1, price: 1, _id: 1 }
//! projection { name: 1, price: 1 }
//! skip/limit 10 / 10
//! ```
//!
//! 각 단계는 독립적이라 필요한 것만 체이닝할 수 있습니다.
//!
//! ```rust,ignore
//! let query = QueryBuilder::new(&qs, repo.base_filter())
//!     .filter()?
//!     .sort()
//!     .limit_fields()
//!     .paginate()
//!     .build();
//! ```

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

use crate::core::errors::{AppError, AppResult};
use crate::repositories::populate::Populate;

/// 필터로 해석하지 않는 예약 파라미터
pub const RESERVED_PARAMS: [&str; 4] = ["page", "sort", "limit", "fields"];

/// 허용되는 비교 연산자 (`field[op]=value`)
pub const OPERATORS: [&str; 4] = ["gte", "gt", "lte", "lt"];

pub const DEFAULT_SORT_FIELD: &str = "createdAt";
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 100;

/// 디코딩된 쿼리 파라미터 목록 (순서 유지)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| spaced.clone())
}

impl QueryString {
    pub fn parse(raw: &str) -> Self {
        let pairs = raw
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .filter(|(key, _)| !key.is_empty())
            .collect();

        Self { pairs }
    }

    /// 같은 키가 여러 번 오면 마지막 값을 사용합니다.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 기존 값을 모두 지우고 새 값으로 덮어씁니다. 별칭 경로(top-5-cheap 등)에서 사용합니다.
    pub fn set(&mut self, key: &str, value: &str) {
        self.pairs.retain(|(k, _)| k != key);
        self.pairs.push((key.to_string(), value.to_string()));
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// `price[gte]` → (`price`, Some(`gte`))
fn split_operator(key: &str) -> AppResult<(&str, Option<&str>)> {
    let Some((field, rest)) = key.split_once('[') else {
        return Ok((key, None));
    };

    let operator = rest
        .strip_suffix(']')
        .ok_or_else(|| AppError::ValidationError(format!("Invalid query parameter: {}", key)))?;

    if !OPERATORS.contains(&operator) {
        return Err(AppError::ValidationError(format!(
            "Invalid query operator: {}",
            operator
        )));
    }

    Ok((field, Some(operator)))
}

/// 쿼리 문자열 값은 숫자 → 불리언 → ObjectId → 문자열 순으로 해석합니다.
pub fn coerce_value(raw: &str) -> Bson {
    if let Ok(value) = raw.parse::<i64>() {
        return Bson::Int64(value);
    }
    if let Ok(value) = raw.parse::<f64>() {
        if value.is_finite() {
            return Bson::Double(value);
        }
    }
    match raw {
        "true" => return Bson::Boolean(true),
        "false" => return Bson::Boolean(false),
        _ => {}
    }
    if raw.len() == 24 {
        if let Ok(id) = ObjectId::parse_str(raw) {
            return Bson::ObjectId(id);
        }
    }
    Bson::String(raw.to_string())
}

/// 예약 파라미터를 제외한 나머지를 필터 문서로 변환하고 기본 필터를 덮어씁니다.
///
/// `$`로 시작하는 필드와 허용되지 않은 연산자는 400으로 거부됩니다.
pub fn build_filter(query: &QueryString, base: &Document) -> AppResult<Document> {
    let mut filter = Document::new();

    for (key, raw) in query.pairs() {
        if RESERVED_PARAMS.contains(&key) {
            continue;
        }

        let (field, operator) = split_operator(key)?;
        if field.is_empty() || field.starts_with('$') {
            return Err(AppError::ValidationError(format!("Invalid query field: {}", field)));
        }

        let value = coerce_value(raw);
        match operator {
            None => {
                filter.insert(field, value);
            }
            Some(op) => {
                let op_key = format!("${}", op);
                match filter.get_mut(field) {
                    Some(Bson::Document(ops)) => {
                        ops.insert(op_key, value);
                    }
                    _ => {
                        let mut ops = Document::new();
                        ops.insert(op_key, value);
                        filter.insert(field, ops);
                    }
                }
            }
        }
    }

    for (key, value) in base {
        filter.insert(key.clone(), value.clone());
    }

    Ok(filter)
}

/// `sort=price,-ratingsAverage` → `{ price: 1, ratingsAverage: -1, _id: 1 }`
///
/// 없으면 최신순. 동일 값에서도 순서가 고정되도록 `_id`를 마지막 키로 붙입니다.
pub fn build_sort(raw: Option<&str>) -> Document {
    let mut sort = Document::new();

    for token in raw.unwrap_or_default().split(',').map(str::trim) {
        let (field, direction) = match token.strip_prefix('-') {
            Some(field) => (field, -1),
            None => (token.strip_prefix('+').unwrap_or(token), 1),
        };
        if field.is_empty() || field.starts_with('$') {
            continue;
        }
        sort.insert(field, direction);
    }

    if sort.is_empty() {
        sort.insert(DEFAULT_SORT_FIELD, -1);
    }
    if !sort.contains_key("_id") {
        sort.insert("_id", 1);
    }
    sort
}

/// `fields=name,price` → 포함 프로젝션, `fields=-summary` → 제외 프로젝션
///
/// 포함과 제외가 섞이면 포함 목록만 사용하고, `-_id`만 예외로 허용합니다.
pub fn build_projection(raw: Option<&str>) -> Document {
    let tokens: Vec<&str> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && !token.trim_start_matches('-').starts_with('$'))
        .collect();

    let (excluded, included): (Vec<&str>, Vec<&str>) =
        tokens.into_iter().partition(|token| token.starts_with('-'));

    let mut projection = Document::new();
    if included.is_empty() {
        for field in excluded.iter().filter_map(|t| t.strip_prefix('-')) {
            if !field.is_empty() {
                projection.insert(field, 0);
            }
        }
    } else {
        for field in included {
            projection.insert(field, 1);
        }
        if excluded.contains(&"-_id") {
            projection.insert("_id", 0);
        }
    }

    if projection.is_empty() {
        projection.insert("__v", 0);
    }
    projection
}

/// (skip, limit). 잘못된 값은 기본값(1페이지, 100개)으로 대체합니다.
pub fn pagination(page: Option<&str>, limit: Option<&str>) -> (i64, i64) {
    let page = page
        .and_then(|p| p.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(DEFAULT_PAGE);
    let limit = limit
        .and_then(|l| l.trim().parse::<i64>().ok())
        .filter(|l| *l >= 1)
        .unwrap_or(DEFAULT_LIMIT);

    ((page - 1).saturating_mul(limit), limit)
}

fn is_inclusion(projection: &Document) -> bool {
    projection
        .iter()
        .any(|(key, value)| key != "_id" && !matches!(value, Bson::Int32(0) | Bson::Int64(0) | Bson::Boolean(false)))
}

/// 빌드된 목록 조회 조건
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filter: Document,
    pub sort: Document,
    pub projection: Document,
    pub skip: i64,
    pub limit: i64,
}

impl ListQuery {
    /// 노출하면 안 되는 필드를 프로젝션에 반영합니다.
    pub fn hide_fields(&mut self, hidden: &[&str]) {
        if is_inclusion(&self.projection) {
            for field in hidden {
                self.projection.remove(*field);
            }
            if is_inclusion(&self.projection) {
                return;
            }
            let id = self.projection.get("_id").cloned();
            self.projection = Document::new();
            if let Some(id) = id {
                self.projection.insert("_id", id);
            }
        }
        for field in hidden {
            self.projection.insert(*field, 0);
        }
    }

    /// `$match → $sort → $skip → $limit → $lookup... → $project`
    pub fn pipeline(&self, populates: &[Populate]) -> Vec<Document> {
        let mut pipeline = vec![
            doc! { "$match": self.filter.clone() },
            doc! { "$sort": self.sort.clone() },
            doc! { "$skip": self.skip },
            doc! { "$limit": self.limit },
        ];
        for populate in populates {
            pipeline.extend(populate.stages());
        }
        if !self.projection.is_empty() {
            pipeline.push(doc! { "$project": self.projection.clone() });
        }
        pipeline
    }
}

/// 필터 → 정렬 → 필드 선택 → 페이지네이션 순의 체이닝 빌더
#[derive(Debug)]
pub struct QueryBuilder<'a> {
    query: &'a QueryString,
    base: Document,
    filter: Document,
    sort: Document,
    projection: Document,
    skip: i64,
    limit: i64,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(query: &'a QueryString, base: Document) -> Self {
        let (skip, limit) = pagination(None, None);
        Self {
            query,
            filter: base.clone(),
            base,
            sort: build_sort(None),
            projection: build_projection(None),
            skip,
            limit,
        }
    }

    pub fn filter(mut self) -> AppResult<Self> {
        self.filter = build_filter(self.query, &self.base)?;
        Ok(self)
    }

    pub fn sort(mut self) -> Self {
        self.sort = build_sort(self.query.get("sort"));
        self
    }

    pub fn limit_fields(mut self) -> Self {
        self.projection = build_projection(self.query.get("fields"));
        self
    }

    pub fn paginate(mut self) -> Self {
        let (skip, limit) = pagination(self.query.get("page"), self.query.get("limit"));
        self.skip = skip;
        self.limit = limit;
        self
    }

    pub fn build(self) -> ListQuery {
        ListQuery {
            filter: self.filter,
            sort: self.sort,
            projection: self.projection,
            skip: self.skip,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(raw: &str, base: Document) -> AppResult<ListQuery> {
        let qs = QueryString::parse(raw);
        Ok(QueryBuilder::new(&qs, base)
            .filter()?
            .sort()
            .limit_fields()
            .paginate()
            .build())
    }

    #[test]
    fn test_parse_decodes_brackets_and_plus() {
        let qs = QueryString::parse("price%5Bgte%5D=500&name=The+Forest+Hiker&sort=");
        assert_eq!(qs.get("price[gte]"), Some("500"));
        assert_eq!(qs.get("name"), Some("The Forest Hiker"));
        assert_eq!(qs.get("sort"), Some(""));
        assert_eq!(qs.get("missing"), None);
    }

    #[test]
    fn test_set_overrides_existing_values() {
        let mut qs = QueryString::parse("limit=50&limit=20&sort=name");
        qs.set("limit", "5");
        assert_eq!(qs.get("limit"), Some("5"));
        assert_eq!(qs.pairs().filter(|(k, _)| *k == "limit").count(), 1);
    }

    #[test]
    fn test_filter_with_operators_and_reserved_params() {
        let query = build("duration[gte]=5&duration[lt]=10&difficulty=easy&page=2&sort=price", doc! {}).unwrap();
        assert_eq!(
            query.filter,
            doc! {
                "duration": { "$gte": 5_i64, "$lt": 10_i64 },
                "difficulty": "easy",
            }
        );
    }

    #[test]
    fn test_value_coercion() {
        assert_eq!(coerce_value("5"), Bson::Int64(5));
        assert_eq!(coerce_value("4.5"), Bson::Double(4.5));
        assert_eq!(coerce_value("true"), Bson::Boolean(true));
        assert_eq!(coerce_value("inf"), Bson::String("inf".into()));
        assert_eq!(coerce_value("easy"), Bson::String("easy".into()));

        let id = ObjectId::new();
        assert_eq!(coerce_value(&id.to_hex()), Bson::ObjectId(id));
    }

    #[test]
    fn test_base_filter_wins() {
        let tour = ObjectId::new();
        let query = build(&format!("tour={}&rating=5", ObjectId::new().to_hex()), doc! { "tour": tour }).unwrap();
        assert_eq!(query.filter.get_object_id("tour").unwrap(), tour);
        assert_eq!(query.filter.get_i64("rating").unwrap(), 5);
    }

    #[test]
    fn test_operator_injection_is_rejected() {
        assert!(matches!(build("$where=1", doc! {}), Err(AppError::ValidationError(_))));
        assert!(matches!(build("price[ne]=1", doc! {}), Err(AppError::ValidationError(_))));
        assert!(matches!(build("price[gte=1", doc! {}), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_sort_defaults_and_tiebreaker() {
        assert_eq!(build_sort(None), doc! { "createdAt": -1, "_id": 1 });
        assert_eq!(
            build_sort(Some("price,-ratingsAverage")),
            doc! { "price": 1, "ratingsAverage": -1, "_id": 1 }
        );
        assert_eq!(build_sort(Some("-_id")), doc! { "_id": -1 });
        assert_eq!(build_sort(Some("$natural")), doc! { "createdAt": -1, "_id": 1 });
    }

    #[test]
    fn test_projection_modes() {
        assert_eq!(build_projection(None), doc! { "__v": 0 });
        assert_eq!(build_projection(Some("name,price")), doc! { "name": 1, "price": 1 });
        assert_eq!(build_projection(Some("-summary,-images")), doc! { "summary": 0, "images": 0 });
        assert_eq!(build_projection(Some("name,-_id")), doc! { "name": 1, "_id": 0 });
    }

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(pagination(None, None), (0, 100));
        assert_eq!(pagination(Some("3"), Some("10")), (20, 10));
        assert_eq!(pagination(Some("0"), Some("-5")), (0, 100));
        assert_eq!(pagination(Some("abc"), Some("5")), (0, 5));
    }

    #[test]
    fn test_hide_fields_respects_projection_mode() {
        let mut query = build("fields=name,password", doc! {}).unwrap();
        query.hide_fields(&["password", "__v"]);
        assert_eq!(query.projection, doc! { "name": 1 });

        let mut query = build("fields=password", doc! {}).unwrap();
        query.hide_fields(&["password"]);
        assert_eq!(query.projection, doc! { "password": 0 });

        let mut query = build("", doc! {}).unwrap();
        query.hide_fields(&["password"]);
        assert_eq!(query.projection, doc! { "__v": 0, "password": 0 });
    }

    #[test]
    fn test_pipeline_order() {
        let query = build("limit=5", doc! {}).unwrap();
        let pipeline = query.pipeline(&[Populate::one("user", "users")]);
        let stages: Vec<&str> = pipeline
            .iter()
            .filter_map(|stage| stage.keys().next().map(String::as_str))
            .collect();
        assert_eq!(stages, vec!["$match", "$sort", "$skip", "$limit", "$lookup", "$unwind", "$project"]);
        assert_eq!(pipeline[3].get_i64("$limit").unwrap(), 5);
    }
}
