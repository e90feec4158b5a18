//! Request/response shapes and boundary validation for the users endpoints.
//!
//! Everything the grid client sends is validated here before it reaches the
//! record service: body fields (lengths, email shape), the percent-encoded
//! JSON `filter`/`sort` query parameters, and batch change envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::domain::ports::UserListRequest;
use crate::domain::{
    BatchChange, Error, NewUser, User, UserChanges, UserFilter, UserId, is_valid_email_shape,
    sort_from_wire,
};

/// Minimum accepted length of a first name, counted in characters.
const FIRST_NAME_MIN_LENGTH: usize = 5;

/// Default page size when the grid omits `take`.
const DEFAULT_TAKE: i64 = 20;

fn field_error(message: impl Into<String>, field: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

fn validate_first_name(value: &str) -> Result<(), Error> {
    if value.chars().count() < FIRST_NAME_MIN_LENGTH {
        return Err(field_error(
            format!("firstName must be at least {FIRST_NAME_MIN_LENGTH} characters long"),
            "firstName",
            "too_short",
        ));
    }
    Ok(())
}

fn validate_non_empty(value: &str, field: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(field_error(
            format!("{field} must not be empty"),
            field,
            "empty_field",
        ));
    }
    Ok(())
}

fn validate_email(value: &str) -> Result<(), Error> {
    if !is_valid_email_shape(value) {
        return Err(field_error("invalid email format", "email", "invalid_email"));
    }
    Ok(())
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Given name; at least five characters.
    pub first_name: String,
    /// Family name; non-empty.
    pub last_name: String,
    /// Job position; non-empty.
    pub position: String,
    /// Phone number as a plain integer.
    pub phone: i64,
    /// Email address; must be unique.
    pub email: String,
}

impl CreateUserRequest {
    /// Validate the request and convert it into a domain input.
    pub fn into_new_user(self) -> Result<NewUser, Error> {
        validate_first_name(&self.first_name)?;
        validate_non_empty(&self.last_name, "lastName")?;
        validate_non_empty(&self.position, "position")?;
        validate_email(&self.email)?;
        Ok(NewUser {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            position: self.position,
            phone: self.phone,
        })
    }
}

/// Body of `PATCH /users/{id}`: every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Replacement given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Replacement family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Replacement job position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Replacement phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<i64>,
    /// Replacement email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// Validate present fields and convert into a domain change set.
    pub fn into_changes(self) -> Result<UserChanges, Error> {
        if let Some(first_name) = &self.first_name {
            validate_first_name(first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            validate_non_empty(last_name, "lastName")?;
        }
        if let Some(position) = &self.position {
            validate_non_empty(position, "position")?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }

        let changes = UserChanges {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            position: self.position,
            phone: self.phone,
        };
        if changes.is_empty() {
            return Err(Error::invalid_request("no fields to update"));
        }
        Ok(changes)
    }
}

/// Query parameters of `GET /users`.
///
/// `filter` and `sort` arrive as percent-encoded JSON strings;
/// `requireTotalCount` as the string `"true"` when set, matching the grid's
/// serialisation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Number of matching records to skip. Defaults to 0.
    pub skip: Option<i64>,
    /// Maximum number of records to return. Defaults to 20.
    pub take: Option<i64>,
    /// JSON filter expression.
    pub filter: Option<String>,
    /// JSON sort expression.
    pub sort: Option<String>,
    /// Whether to count all matching records.
    pub require_total_count: Option<String>,
}

impl ListParams {
    /// Decode and validate into a store page request.
    pub fn into_request(self) -> Result<UserListRequest, Error> {
        let skip = self.skip.unwrap_or(0);
        let take = self.take.unwrap_or(DEFAULT_TAKE);
        if skip < 0 {
            return Err(field_error("skip must not be negative", "skip", "invalid_value"));
        }
        if take < 0 {
            return Err(field_error("take must not be negative", "take", "invalid_value"));
        }

        let filter = match self.filter.as_deref() {
            None | Some("") => UserFilter::Empty,
            Some(raw) => UserFilter::from_wire(&parse_json(raw, "filter")?)?,
        };
        let sort = match self.sort.as_deref() {
            None | Some("") => Vec::new(),
            Some(raw) => sort_from_wire(&parse_json(raw, "sort")?)?,
        };
        let require_total_count = self.require_total_count.as_deref() == Some("true");

        Ok(UserListRequest {
            skip,
            take,
            filter,
            sort,
            require_total_count,
        })
    }
}

fn parse_json(raw: &str, field: &str) -> Result<Value, Error> {
    serde_json::from_str(raw)
        .map_err(|err| field_error(format!("{field} is not valid JSON: {err}"), field, "invalid_json"))
}

/// Response envelope of `GET /users`.
///
/// `summary` and `groupCount` are always null; the fields exist only for
/// grid-contract compatibility.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    /// Records of the requested page.
    pub data: Vec<User>,
    /// Total number of matching records, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    /// Always null.
    pub summary: Option<Vec<f64>>,
    /// Always null.
    pub group_count: Option<i64>,
}

impl UserListResponse {
    /// Wrap a page in the grid envelope.
    pub fn new(data: Vec<User>, total_count: Option<i64>) -> Self {
        Self {
            data,
            total_count,
            summary: None,
            group_count: None,
        }
    }
}

/// One element of a `POST /users/batch` submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BatchChangeRequest {
    /// Create a record.
    Insert {
        /// Attributes of the record to create.
        data: CreateUserRequest,
    },
    /// Overwrite fields of an existing record.
    Update {
        /// Record identifier; a number or its string rendering.
        key: Value,
        /// Fields to overwrite.
        data: UpdateUserRequest,
    },
    /// Delete an existing record.
    Remove {
        /// Record identifier; a number or its string rendering.
        key: Value,
    },
}

impl BatchChangeRequest {
    /// Validate and convert into a domain batch change.
    pub fn to_domain(&self) -> Result<BatchChange, Error> {
        match self {
            Self::Insert { data } => Ok(BatchChange::Insert {
                data: data.clone().into_new_user()?,
            }),
            Self::Update { key, data } => Ok(BatchChange::Update {
                key: decode_key(key)?,
                changes: data.clone().into_changes()?,
            }),
            Self::Remove { key } => Ok(BatchChange::Remove {
                key: decode_key(key)?,
            }),
        }
    }
}

/// Decode a batch change key: a JSON number or its string rendering.
fn decode_key(value: &Value) -> Result<UserId, Error> {
    let id = match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.parse::<i32>().ok(),
        _ => None,
    };
    id.map(UserId::new)
        .ok_or_else(|| field_error("key must be an integer identifier", "key", "invalid_key"))
}

/// Query parameters of `GET /users/check-email/{email}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckEmailParams {
    /// Identifier of the record being edited, so its own email is not
    /// reported as taken.
    pub exclude_id: Option<i32>,
}

/// Response body of a successful email check.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckEmailResponse {
    /// Human-readable confirmation.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, FilterOp, UserField};
    use rstest::rstest;

    fn create_request() -> CreateUserRequest {
        CreateUserRequest {
            first_name: "Adaline".into(),
            last_name: "Lovelace".into(),
            position: "Analyst".into(),
            phone: 55512345,
            email: "ada@example.com".into(),
        }
    }

    #[test]
    fn valid_create_request_converts() {
        let new_user = create_request().into_new_user().expect("valid request");
        assert_eq!(new_user.email, "ada@example.com");
    }

    #[rstest]
    #[case({ let mut r = create_request(); r.first_name = "Ada".into(); r }, "too_short")]
    #[case({ let mut r = create_request(); r.last_name = "  ".into(); r }, "empty_field")]
    #[case({ let mut r = create_request(); r.position = String::new(); r }, "empty_field")]
    #[case({ let mut r = create_request(); r.email = "ada@nowhere".into(); r }, "invalid_email")]
    fn invalid_create_requests_are_rejected(
        #[case] request: CreateUserRequest,
        #[case] expected_code: &str,
    ) {
        let err = request.into_new_user().expect_err("must reject");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["code"], expected_code);
    }

    #[test]
    fn update_with_no_fields_is_rejected() {
        let err = UpdateUserRequest::default()
            .into_changes()
            .expect_err("empty update");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn update_validates_present_fields_only() {
        let request = UpdateUserRequest {
            last_name: Some("X".into()),
            ..UpdateUserRequest::default()
        };
        let changes = request.into_changes().expect("partial update");
        assert_eq!(changes.last_name.as_deref(), Some("X"));
        assert!(changes.first_name.is_none());
    }

    #[test]
    fn list_params_defaults() {
        let request = ListParams::default().into_request().expect("defaults");
        assert_eq!(request.skip, 0);
        assert_eq!(request.take, DEFAULT_TAKE);
        assert_eq!(request.filter, UserFilter::Empty);
        assert!(request.sort.is_empty());
        assert!(!request.require_total_count);
    }

    #[test]
    fn list_params_decode_filter_sort_and_count_flag() {
        let params = ListParams {
            skip: Some(10),
            take: Some(5),
            filter: Some(r#"["position","contains","Engineer"]"#.into()),
            sort: Some(r#"[{"selector":"lastName","desc":false}]"#.into()),
            require_total_count: Some("true".into()),
        };
        let request = params.into_request().expect("decode");
        assert_eq!(request.skip, 10);
        assert_eq!(request.take, 5);
        assert_eq!(request.filter.conditions()[0].op, FilterOp::Contains);
        assert_eq!(request.sort[0].field, UserField::LastName);
        assert!(request.require_total_count);
    }

    #[rstest]
    #[case(Some(-1), None)]
    #[case(None, Some(-5))]
    fn negative_paging_is_rejected(#[case] skip: Option<i64>, #[case] take: Option<i64>) {
        let params = ListParams {
            skip,
            take,
            ..ListParams::default()
        };
        let err = params.into_request().expect_err("negative paging");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn malformed_filter_json_is_rejected() {
        let params = ListParams {
            filter: Some("[not json".into()),
            ..ListParams::default()
        };
        let err = params.into_request().expect_err("bad JSON");
        assert_eq!(err.details().expect("details")["code"], "invalid_json");
    }

    #[test]
    fn require_total_count_must_be_the_literal_true() {
        let params = ListParams {
            require_total_count: Some("yes".into()),
            ..ListParams::default()
        };
        let request = params.into_request().expect("decode");
        assert!(!request.require_total_count);
    }

    #[rstest]
    #[case(json!(7), 7)]
    #[case(json!("7"), 7)]
    fn batch_keys_accept_numbers_and_numeric_strings(#[case] key: Value, #[case] expected: i32) {
        let change = BatchChangeRequest::Remove { key };
        let BatchChange::Remove { key } = change.to_domain().expect("decode key") else {
            panic!("expected remove");
        };
        assert_eq!(key, UserId::new(expected));
    }

    #[test]
    fn batch_change_round_trips_through_serde() {
        let wire = json!([
            { "type": "insert", "data": {
                "firstName": "Adaline", "lastName": "Lovelace", "position": "Analyst",
                "phone": 55512345, "email": "ada@example.com"
            }},
            { "type": "update", "key": 3, "data": { "lastName": "Hopper" } },
            { "type": "remove", "key": "4" },
        ]);
        let changes: Vec<BatchChangeRequest> =
            serde_json::from_value(wire.clone()).expect("decode batch");
        assert_eq!(serde_json::to_value(&changes).expect("encode batch"), wire);
    }

    #[test]
    fn list_response_serialises_nulls_and_omits_absent_count() {
        let value =
            serde_json::to_value(UserListResponse::new(Vec::new(), None)).expect("serialise");
        assert!(value.get("totalCount").is_none());
        assert_eq!(value["summary"], Value::Null);
        assert_eq!(value["groupCount"], Value::Null);

        let value =
            serde_json::to_value(UserListResponse::new(Vec::new(), Some(50))).expect("serialise");
        assert_eq!(value["totalCount"], 50);
    }
}
