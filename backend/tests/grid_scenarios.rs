//! Grid-level scenarios over an in-memory store.
//!
//! Exercises the record service together with the decoded filter/sort
//! expressions against a fixture repository that interprets them the way the
//! SQL translation does: substring operators case-insensitive, equality
//! exact, multi-key stable ordering. SQL generation itself is covered by the
//! persistence layer's unit tests.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;

use backend::domain::ports::{UserListRequest, UserPage, UserRepository, UserRepositoryError};
use backend::domain::{
    BatchChange, ErrorCode, FieldFilter, FilterOp, FilterValue, NewUser, SortEntry, User,
    UserChanges, UserField, UserFilter, UserId, UsersService, sort_from_wire,
};

/// Fixture store interpreting filter and sort expressions in memory.
#[derive(Default)]
struct InMemoryUserRepository {
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    users: Vec<User>,
    next_id: i32,
}

impl InMemoryUserRepository {
    fn seeded(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id.value()).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(StoreState { users, next_id }),
        }
    }

    fn snapshot(&self) -> Vec<User> {
        self.state.lock().expect("state lock").users.clone()
    }
}

fn text_field<'a>(user: &'a User, field: UserField) -> Option<&'a str> {
    match field {
        UserField::Email => Some(&user.email),
        UserField::FirstName => Some(&user.first_name),
        UserField::LastName => Some(&user.last_name),
        UserField::Position => Some(&user.position),
        _ => None,
    }
}

fn matches(user: &User, condition: &FieldFilter) -> bool {
    match &condition.value {
        FilterValue::Text(value) => {
            let Some(haystack) = text_field(user, condition.field) else {
                return false;
            };
            match condition.op {
                FilterOp::Equals => haystack == value,
                FilterOp::Contains => haystack.to_lowercase().contains(&value.to_lowercase()),
                FilterOp::StartsWith => {
                    haystack.to_lowercase().starts_with(&value.to_lowercase())
                }
                FilterOp::EndsWith => haystack.to_lowercase().ends_with(&value.to_lowercase()),
            }
        }
        FilterValue::Number(value) => match condition.field {
            UserField::Id => i64::from(user.id.value()) == *value,
            UserField::Phone => user.phone == *value,
            _ => false,
        },
    }
}

fn compare(a: &User, b: &User, sort: &[SortEntry]) -> Ordering {
    for entry in sort {
        let ordering = match entry.field {
            UserField::Id => a.id.cmp(&b.id),
            UserField::Email => a.email.cmp(&b.email),
            UserField::FirstName => a.first_name.cmp(&b.first_name),
            UserField::LastName => a.last_name.cmp(&b.last_name),
            UserField::Position => a.position.cmp(&b.position),
            UserField::Phone => a.phone.cmp(&b.phone),
            UserField::CreatedAt => a.created_at.cmp(&b.created_at),
            UserField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        let ordering = if entry.descending {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self, request: &UserListRequest) -> Result<UserPage, UserRepositoryError> {
        let state = self.state.lock().expect("state lock");
        let mut matching: Vec<User> = state
            .users
            .iter()
            .filter(|user| request.filter.conditions().iter().all(|c| matches(user, c)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| compare(a, b, &request.sort));

        let total_count = request
            .require_total_count
            .then(|| i64::try_from(matching.len()).unwrap_or(i64::MAX));
        let data = matching
            .into_iter()
            .skip(usize::try_from(request.skip).unwrap_or(0))
            .take(usize::try_from(request.take).unwrap_or(0))
            .collect();
        Ok(UserPage { data, total_count })
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.state.lock().expect("state lock");
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let state = self.state.lock().expect("state lock");
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut state = self.state.lock().expect("state lock");
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(UserRepositoryError::unique_violation(
                "duplicate key value violates unique constraint \"users_email_key\"",
            ));
        }
        let id = UserId::new(state.next_id);
        state.next_id += 1;
        let now = Utc::now();
        let created = User {
            id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            position: user.position.clone(),
            phone: user.phone,
            created_at: now,
            updated_at: now,
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut state = self.state.lock().expect("state lock");
        let duplicate = changes.email.as_ref().is_some_and(|email| {
            state.users.iter().any(|u| u.id != id && &u.email == email)
        });
        if duplicate {
            return Err(UserRepositoryError::unique_violation(
                "duplicate key value violates unique constraint \"users_email_key\"",
            ));
        }
        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(first_name) = &changes.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &changes.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(position) = &changes.position {
            user.position = position.clone();
        }
        if let Some(phone) = changes.phone {
            user.phone = phone;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut state = self.state.lock().expect("state lock");
        let index = state.users.iter().position(|u| u.id == id);
        Ok(index.map(|i| state.users.remove(i)))
    }

    async fn delete_all(&self) -> Result<usize, UserRepositoryError> {
        let mut state = self.state.lock().expect("state lock");
        let count = state.users.len();
        state.users.clear();
        Ok(count)
    }
}

/// Fifty records with a deterministic mix of positions and names.
fn seeded_store() -> Arc<InMemoryUserRepository> {
    let base = Utc::now() - Duration::days(30);
    let users = (0..50)
        .map(|i| {
            let position = match i % 3 {
                0 => "Software Engineer",
                1 => "Senior Engineer",
                _ => "Product Manager",
            };
            User {
                id: UserId::new(i + 1),
                email: format!("user{i}@example.com"),
                first_name: format!("First{i:02}"),
                last_name: format!("Last{:02}", (50 - i)),
                position: position.into(),
                phone: 10_000_000 + i64::from(i),
                created_at: base + Duration::hours(i64::from(i)),
                updated_at: base + Duration::hours(i64::from(i)),
            }
        })
        .collect();
    Arc::new(InMemoryUserRepository::seeded(users))
}

fn service(repository: Arc<InMemoryUserRepository>) -> UsersService {
    UsersService::new(repository)
}

#[tokio::test]
async fn filtered_sorted_page_over_fifty_records() {
    let svc = service(seeded_store());

    let filter =
        UserFilter::from_wire(&json!(["position", "contains", "Engineer"])).expect("filter");
    let sort = sort_from_wire(&json!([{ "selector": "lastName", "desc": false }])).expect("sort");

    let page = svc
        .list(&UserListRequest {
            skip: 0,
            take: 10,
            filter,
            sort,
            require_total_count: true,
        })
        .await
        .expect("list");

    assert!(page.data.len() <= 10);
    assert!(!page.data.is_empty());
    for user in &page.data {
        assert!(
            user.position.contains("Engineer"),
            "unexpected position {}",
            user.position
        );
    }
    let last_names: Vec<&str> = page.data.iter().map(|u| u.last_name.as_str()).collect();
    let mut sorted = last_names.clone();
    sorted.sort_unstable();
    assert_eq!(last_names, sorted, "page must be ascending by lastName");
    // 2 of every 3 seeded positions contain "Engineer".
    assert_eq!(page.total_count, Some(34));
}

#[tokio::test]
async fn contains_is_case_insensitive_and_exact_about_matches() {
    let svc = service(seeded_store());

    let filter =
        UserFilter::from_wire(&json!(["position", "contains", "engineer"])).expect("filter");
    let page = svc
        .list(&UserListRequest {
            skip: 0,
            take: 50,
            filter,
            sort: Vec::new(),
            require_total_count: true,
        })
        .await
        .expect("list");

    assert_eq!(page.total_count, Some(34));
    assert!(
        page.data
            .iter()
            .all(|u| u.position.to_lowercase().contains("engineer"))
    );
}

#[tokio::test]
async fn multi_key_sort_orders_by_position_then_last_name() {
    let svc = service(seeded_store());

    let sort = sort_from_wire(&json!([
        { "selector": "position", "desc": false },
        { "selector": "lastName", "desc": true },
    ]))
    .expect("sort");
    let page = svc
        .list(&UserListRequest {
            skip: 0,
            take: 50,
            filter: UserFilter::Empty,
            sort,
            require_total_count: false,
        })
        .await
        .expect("list");

    let keys: Vec<(&str, &str)> = page
        .data
        .iter()
        .map(|u| (u.position.as_str(), u.last_name.as_str()))
        .collect();
    let mut expected = keys.clone();
    expected.sort_by(|a, b| a.0.cmp(b.0).then(b.1.cmp(a.1)));
    assert_eq!(keys, expected);
}

#[tokio::test]
async fn created_record_round_trips_through_get() {
    let repository = Arc::new(InMemoryUserRepository::default());
    let svc = service(repository);

    let created = svc
        .create(&NewUser {
            email: "grace@example.com".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            position: "Rear Admiral".into(),
            phone: 55500000,
        })
        .await
        .expect("create");

    let fetched = svc.get(created.id).await.expect("get");
    assert_eq!(fetched, created);
    assert_eq!(fetched.email, "grace@example.com");
}

#[tokio::test]
async fn duplicate_email_create_fails_and_leaves_store_unchanged() {
    let repository = seeded_store();
    let before = repository.snapshot();
    let svc = service(repository.clone());

    let err = svc
        .create(&NewUser {
            email: "user0@example.com".into(),
            first_name: "Duplicate".into(),
            last_name: "Email".into(),
            position: "Tester".into(),
            phone: 1,
        })
        .await
        .expect_err("duplicate email");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(repository.snapshot(), before);
}

#[tokio::test]
async fn batch_insert_survives_a_later_missing_key() {
    let repository = Arc::new(InMemoryUserRepository::default());
    let svc = service(repository.clone());

    let err = svc
        .batch_apply(vec![
            BatchChange::Insert {
                data: NewUser {
                    email: "kept@example.com".into(),
                    first_name: "Keeps".into(),
                    last_name: "Going".into(),
                    position: "Survivor".into(),
                    phone: 2,
                },
            },
            BatchChange::Remove {
                key: UserId::new(999_999),
            },
        ])
        .await
        .expect_err("missing key");

    assert_eq!(err.code(), ErrorCode::NotFound);
    let users = repository.snapshot();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "kept@example.com");
}

#[tokio::test]
async fn update_refreshes_updated_at_and_later_get_sees_it() {
    let repository = seeded_store();
    let svc = service(repository);
    let id = UserId::new(1);

    let before = svc.get(id).await.expect("get before");
    svc.update(
        id,
        &UserChanges {
            last_name: Some("X".into()),
            ..UserChanges::default()
        },
    )
    .await
    .expect("update");

    let after = svc.get(id).await.expect("get after");
    assert_eq!(after.last_name, "X");
    assert!(after.updated_at > before.updated_at);
    assert_eq!(after.created_at, before.created_at);
}
