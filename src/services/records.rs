//! Record service client.
//!
//! Translates task and user intents into calls against the hosted record
//! service and normalizes its record shape into the domain types.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::config::RecordServiceSettings;
use crate::domain::{
    NewTask, ProfileUpdate, Task, TaskCategory, TaskId, TaskPatch, TaskPriority, TaskQuery,
    TaskStatus, UserId, UserIdentity,
};
use crate::error::{RecordError, RecordResult};

const TASK_FIELDS: &[&str] = &[
    "Id",
    "title",
    "description",
    "due_date",
    "priority",
    "status",
    "is_completed",
    "category",
    "CreatedOn",
    "ModifiedOn",
];

const USER_FIELDS: &[&str] = &["Id", "FirstName", "LastName", "Email", "Phone", "AvatarUrl"];

/// The four CRUD intents on tasks plus the user profile calls.
///
/// Every failure surfaces as a single [`RecordError`]; nothing is retried.
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Tasks matching `query`, sorted by due date ascending, one page.
    async fn fetch_tasks(&self, query: &TaskQuery) -> RecordResult<Vec<Task>>;

    async fn get_task(&self, id: TaskId) -> RecordResult<Task>;

    async fn create_task(&self, task: &NewTask) -> RecordResult<Task>;

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> RecordResult<Task>;

    async fn delete_task(&self, id: TaskId) -> RecordResult<()>;

    async fn fetch_user(&self, id: UserId) -> RecordResult<UserIdentity>;

    async fn update_user(&self, id: UserId, update: &ProfileUpdate) -> RecordResult<UserIdentity>;

    async fn health_check(&self) -> RecordResult<()>;
}

// =========================================================================
// Wire shapes
// =========================================================================

#[derive(Debug, Serialize, PartialEq)]
struct Condition {
    field: &'static str,
    operator: &'static str,
    value: Value,
}

#[derive(Debug, Serialize)]
struct OrderBy {
    field: &'static str,
    direction: &'static str,
}

#[derive(Debug, Serialize)]
struct PagingInfo {
    limit: u32,
    offset: u32,
}

#[derive(Debug, Serialize)]
struct FetchParams {
    fields: &'static [&'static str],
    #[serde(rename = "where", skip_serializing_if = "Vec::is_empty")]
    conditions: Vec<Condition>,
    #[serde(rename = "orderBy", skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<OrderBy>,
    #[serde(rename = "pagingInfo", skip_serializing_if = "Option::is_none")]
    paging_info: Option<PagingInfo>,
}

#[derive(Debug, Serialize)]
struct FieldsParams {
    fields: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct Records<T> {
    records: Vec<T>,
}

#[derive(Debug, Serialize)]
struct TaskUpdateRecord<'a> {
    #[serde(rename = "Id")]
    id: TaskId,
    #[serde(flatten)]
    patch: &'a TaskPatch,
}

#[derive(Debug, Serialize)]
struct UserUpdateRecord<'a> {
    #[serde(rename = "Id")]
    id: UserId,
    #[serde(rename = "FirstName", skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(rename = "LastName", skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    #[serde(rename = "Phone", skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DeleteParams {
    #[serde(rename = "RecordIds")]
    record_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Option::default")]
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct MutationResult<T> {
    #[serde(default = "Option::default")]
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct MutationEnvelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default = "Vec::new")]
    results: Vec<MutationResult<T>>,
}

impl<T> MutationEnvelope<T> {
    /// Data of the first result, only when the whole call reported success.
    fn into_first(self) -> Option<T> {
        if !self.success {
            return None;
        }
        self.results.into_iter().next().and_then(|r| r.data)
    }
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    message: String,
}

/// Task record as stored in the task table
#[derive(Debug, Deserialize)]
struct TaskRecord {
    #[serde(rename = "Id")]
    id: TaskId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    priority: Option<TaskPriority>,
    #[serde(default)]
    status: Option<TaskStatus>,
    #[serde(default)]
    is_completed: Option<bool>,
    #[serde(default)]
    category: Option<TaskCategory>,
    #[serde(rename = "CreatedOn")]
    created_on: DateTime<Utc>,
    #[serde(rename = "ModifiedOn")]
    modified_on: DateTime<Utc>,
}

impl From<TaskRecord> for Task {
    fn from(r: TaskRecord) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description.unwrap_or_default(),
            due_date: r.due_date,
            priority: r.priority.unwrap_or_default(),
            status: r.status.unwrap_or_default(),
            category: r.category.unwrap_or_default(),
            is_completed: r.is_completed.unwrap_or(false),
            created_at: r.created_on,
            updated_at: r.modified_on,
        }
    }
}

/// User record as stored in the user table
#[derive(Debug, Deserialize)]
struct UserRecord {
    #[serde(rename = "Id")]
    id: UserId,
    #[serde(rename = "FirstName", default)]
    first_name: Option<String>,
    #[serde(rename = "LastName", default)]
    last_name: Option<String>,
    #[serde(rename = "Email", default)]
    email: Option<String>,
    #[serde(rename = "Phone", default)]
    phone: Option<String>,
    #[serde(rename = "AvatarUrl", default)]
    avatar_url: Option<String>,
}

impl From<UserRecord> for UserIdentity {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name.unwrap_or_default(),
            last_name: r.last_name.unwrap_or_default(),
            email: r.email.unwrap_or_default(),
            phone: r.phone.filter(|p| !p.is_empty()),
            avatar_url: r.avatar_url.filter(|a| !a.is_empty()),
        }
    }
}

/// Accepts `null`, `""`, a plain date or a full timestamp.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };
    let date_part = raw.get(..10).unwrap_or(raw.as_str());
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(serde::de::Error::custom)
}

fn task_conditions(query: &TaskQuery) -> Vec<Condition> {
    let mut conditions = Vec::new();
    let mut equals = |field: &'static str, value: Value| {
        conditions.push(Condition {
            field,
            operator: "equals",
            value,
        });
    };

    if let Some(status) = query.status {
        equals("status", status.as_str().into());
    }
    if let Some(priority) = query.priority {
        equals("priority", priority.as_str().into());
    }
    if let Some(category) = query.category {
        equals("category", category.as_str().into());
    }
    if let Some(is_completed) = query.is_completed {
        equals("is_completed", is_completed.into());
    }
    conditions
}

// =========================================================================
// HTTP client
// =========================================================================

/// Client for the hosted record service.
#[derive(Clone)]
pub struct HttpRecordClient {
    client: Client,
    base_url: String,
    project_id: String,
    public_key: String,
    task_table: String,
    user_table: String,
    page_limit: u32,
}

impl HttpRecordClient {
    /// Create a new record service client.
    pub fn new(settings: &RecordServiceSettings) -> anyhow::Result<Self> {
        use anyhow::Context;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = settings.base_url.as_str().trim_end_matches('/').to_string();
        tracing::info!(base_url = %base_url, "Record service client initialized");

        Ok(Self {
            client,
            base_url,
            project_id: settings.project_id.clone(),
            public_key: settings.public_key.clone(),
            task_table: settings.task_table.clone(),
            user_table: settings.user_table.clone(),
            page_limit: settings.page_limit,
        })
    }

    fn table_url(&self, table: &str, suffix: &str) -> String {
        format!("{}/tables/{}/records{}", self.base_url, table, suffix)
    }

    /// Performs one call and decodes a 2xx body into `R`.
    ///
    /// 401/403 and connection problems are always Transport failures. Any
    /// other non-success status goes through `rejected`, which picks the
    /// failure for the calling operation.
    async fn call<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &B,
        rejected: fn(StatusCode, String) -> RecordError,
    ) -> RecordResult<R> {
        debug!(method = %method, url = %url, "Record service request");

        let response = self
            .client
            .request(method, url)
            .header("X-Project-Id", &self.project_id)
            .bearer_auth(&self.public_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Record service request failed");
                RecordError::Transport(e.to_string())
            })?;

        let status = response.status();

        if status.is_success() {
            return response.json::<R>().await.map_err(|e| {
                error!(error = %e, "Failed to parse record service response");
                RecordError::Transport(format!("malformed response: {}", e))
            });
        }

        let message = response
            .json::<ServiceErrorBody>()
            .await
            .map(|b| b.message)
            .unwrap_or_else(|_| format!("record service error: {}", status));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!(status = %status, "Record service rejected credentials");
                Err(RecordError::Transport(message))
            }
            _ => {
                warn!(status = %status, message = %message, "Record service call unsuccessful");
                Err(rejected(status, message))
            }
        }
    }
}

fn transport(_: StatusCode, message: String) -> RecordError {
    RecordError::Transport(message)
}

fn task_lookup(status: StatusCode, message: String) -> RecordError {
    match status {
        StatusCode::NOT_FOUND => RecordError::NotFound("Task".to_string()),
        _ => RecordError::Transport(message),
    }
}

fn user_lookup(status: StatusCode, message: String) -> RecordError {
    match status {
        StatusCode::NOT_FOUND => RecordError::NotFound("User".to_string()),
        _ => RecordError::Transport(message),
    }
}

#[async_trait]
impl RecordService for HttpRecordClient {
    #[instrument(skip(self))]
    async fn fetch_tasks(&self, query: &TaskQuery) -> RecordResult<Vec<Task>> {
        let params = FetchParams {
            fields: TASK_FIELDS,
            conditions: task_conditions(query),
            order_by: vec![OrderBy {
                field: "due_date",
                direction: "asc",
            }],
            paging_info: Some(PagingInfo {
                limit: self.page_limit,
                offset: 0,
            }),
        };

        let url = self.table_url(&self.task_table, "/query");
        let envelope: DataEnvelope<Vec<TaskRecord>> =
            self.call(Method::POST, &url, &params, transport).await?;

        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_task(&self, id: TaskId) -> RecordResult<Task> {
        let url = self.table_url(&self.task_table, &format!("/{}/query", id));
        let envelope: DataEnvelope<TaskRecord> = self
            .call(
                Method::POST,
                &url,
                &FieldsParams { fields: TASK_FIELDS },
                task_lookup,
            )
            .await?;

        envelope
            .data
            .map(Into::into)
            .ok_or_else(|| RecordError::NotFound("Task".to_string()))
    }

    #[instrument(skip(self, task), fields(title = %task.title))]
    async fn create_task(&self, task: &NewTask) -> RecordResult<Task> {
        let url = self.table_url(&self.task_table, "");
        let envelope: MutationEnvelope<TaskRecord> = self
            .call(Method::POST, &url, &Records { records: vec![task] }, |_, _| {
                RecordError::CreateFailed("task".to_string())
            })
            .await?;

        envelope
            .into_first()
            .map(Into::into)
            .ok_or_else(|| RecordError::CreateFailed("task".to_string()))
    }

    #[instrument(skip(self, patch))]
    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> RecordResult<Task> {
        let url = self.table_url(&self.task_table, "");
        let body = Records {
            records: vec![TaskUpdateRecord { id, patch }],
        };
        let envelope: MutationEnvelope<TaskRecord> = self
            .call(Method::PATCH, &url, &body, |_, _| {
                RecordError::UpdateFailed("task".to_string())
            })
            .await?;

        envelope
            .into_first()
            .map(Into::into)
            .ok_or_else(|| RecordError::UpdateFailed("task".to_string()))
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: TaskId) -> RecordResult<()> {
        let url = self.table_url(&self.task_table, "");
        let envelope: StatusEnvelope = self
            .call(
                Method::DELETE,
                &url,
                &DeleteParams { record_ids: vec![id] },
                |_, _| RecordError::DeleteFailed("task".to_string()),
            )
            .await?;

        if envelope.success {
            Ok(())
        } else {
            Err(RecordError::DeleteFailed("task".to_string()))
        }
    }

    #[instrument(skip(self))]
    async fn fetch_user(&self, id: UserId) -> RecordResult<UserIdentity> {
        let params = FetchParams {
            fields: USER_FIELDS,
            conditions: vec![Condition {
                field: "Id",
                operator: "equals",
                value: id.into(),
            }],
            order_by: Vec::new(),
            paging_info: None,
        };

        let url = self.table_url(&self.user_table, "/query");
        let envelope: DataEnvelope<Vec<UserRecord>> =
            self.call(Method::POST, &url, &params, user_lookup).await?;

        envelope
            .data
            .and_then(|users| users.into_iter().next())
            .map(Into::into)
            .ok_or_else(|| RecordError::NotFound("User".to_string()))
    }

    #[instrument(skip(self, update))]
    async fn update_user(&self, id: UserId, update: &ProfileUpdate) -> RecordResult<UserIdentity> {
        let url = self.table_url(&self.user_table, "");
        let body = Records {
            records: vec![UserUpdateRecord {
                id,
                first_name: update.first_name.as_deref(),
                last_name: update.last_name.as_deref(),
                phone: update.phone.as_deref(),
            }],
        };
        let envelope: MutationEnvelope<UserRecord> = self
            .call(Method::PATCH, &url, &body, |_, _| {
                RecordError::UpdateFailed("user profile".to_string())
            })
            .await?;

        envelope
            .into_first()
            .map(Into::into)
            .ok_or_else(|| RecordError::UpdateFailed("user profile".to_string()))
    }

    async fn health_check(&self) -> RecordResult<()> {
        let response = self
            .client
            .get(&self.base_url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| RecordError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(RecordError::Transport(format!(
                "record service error: {}",
                status
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn fetch_params_carry_filters_order_and_paging() {
        let query = TaskQuery {
            status: Some(TaskStatus::InProgress),
            is_completed: Some(false),
            ..TaskQuery::default()
        };
        let params = FetchParams {
            fields: TASK_FIELDS,
            conditions: task_conditions(&query),
            order_by: vec![OrderBy {
                field: "due_date",
                direction: "asc",
            }],
            paging_info: Some(PagingInfo {
                limit: 100,
                offset: 0,
            }),
        };

        let body = serde_json::to_value(&params).unwrap();

        assert_eq!(
            body["where"],
            json!([
                { "field": "status", "operator": "equals", "value": "In Progress" },
                { "field": "is_completed", "operator": "equals", "value": false },
            ])
        );
        assert_eq!(body["orderBy"], json!([{ "field": "due_date", "direction": "asc" }]));
        assert_eq!(body["pagingInfo"], json!({ "limit": 100, "offset": 0 }));
        assert_eq!(body["fields"][0], "Id");
    }

    #[test]
    fn empty_query_sends_no_where_clause() {
        assert!(task_conditions(&TaskQuery::default()).is_empty());
        let params = FetchParams {
            fields: TASK_FIELDS,
            conditions: Vec::new(),
            order_by: Vec::new(),
            paging_info: None,
        };
        let body = serde_json::to_value(&params).unwrap();
        assert!(body.get("where").is_none());
    }

    #[test]
    fn update_record_flattens_patch_next_to_id() {
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            is_completed: Some(true),
            ..TaskPatch::default()
        };
        let body = serde_json::to_value(Records {
            records: vec![TaskUpdateRecord { id: 12, patch: &patch }],
        })
        .unwrap();

        assert_eq!(
            body,
            json!({ "records": [{ "Id": 12, "status": "Completed", "is_completed": true }] })
        );
    }

    #[test]
    fn create_record_uses_wire_field_names() {
        let mut task = NewTask::new("Dentist");
        task.due_date = NaiveDate::from_ymd_opt(2024, 6, 3);
        task.category = TaskCategory::Health;

        let body = serde_json::to_value(Records { records: vec![&task] }).unwrap();

        assert_eq!(
            body,
            json!({ "records": [{
                "title": "Dentist",
                "description": "",
                "due_date": "2024-06-03",
                "priority": "Medium",
                "status": "To Do",
                "category": "Health",
                "is_completed": false,
            }] })
        );
    }

    #[test]
    fn task_record_is_normalized() {
        let raw = json!({
            "Id": 4,
            "title": "Read",
            "description": null,
            "due_date": "",
            "status": "In Progress",
            "CreatedOn": "2024-05-01T09:00:00Z",
            "ModifiedOn": "2024-05-02T10:30:00Z",
        });

        let task: Task = serde_json::from_value::<TaskRecord>(raw).unwrap().into();

        assert_eq!(task.id, 4);
        assert_eq!(task.description, "");
        assert_eq!(task.due_date, None);
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.category, TaskCategory::Personal);
        assert!(!task.is_completed);
    }

    #[test]
    fn due_date_accepts_timestamps() {
        let raw = json!({
            "Id": 5,
            "title": "Ship",
            "due_date": "2024-07-01T00:00:00.000Z",
            "is_completed": true,
            "CreatedOn": "2024-05-01T09:00:00Z",
            "ModifiedOn": "2024-05-01T09:00:00Z",
        });

        let task: Task = serde_json::from_value::<TaskRecord>(raw).unwrap().into();

        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert!(task.is_completed);
    }

    #[test]
    fn mutation_envelope_requires_success_and_data() {
        let ok: MutationEnvelope<Value> =
            serde_json::from_value(json!({ "success": true, "results": [{ "data": { "Id": 1 } }] }))
                .unwrap();
        assert_eq!(ok.into_first(), Some(json!({ "Id": 1 })));

        let failed: MutationEnvelope<Value> =
            serde_json::from_value(json!({ "success": false, "results": [{ "data": { "Id": 1 } }] }))
                .unwrap();
        assert_eq!(failed.into_first(), None);

        let empty: MutationEnvelope<Value> =
            serde_json::from_value(json!({ "success": true, "results": [] })).unwrap();
        assert_eq!(empty.into_first(), None);
    }

    #[test]
    fn user_record_maps_to_identity() {
        let raw = json!({
            "Id": 9,
            "FirstName": "Alan",
            "LastName": "Turing",
            "Email": "alan@example.com",
            "Phone": "",
            "AvatarUrl": "https://cdn.example.com/a.png",
        });

        let user: UserIdentity = serde_json::from_value::<UserRecord>(raw).unwrap().into();

        assert_eq!(user.first_name, "Alan");
        assert_eq!(user.last_name, "Turing");
        assert_eq!(user.phone, None);
        assert_eq!(user.avatar_url.as_deref(), Some("https://cdn.example.com/a.png"));
    }

    #[test]
    fn user_update_skips_absent_fields() {
        let body = serde_json::to_value(UserUpdateRecord {
            id: 9,
            first_name: Some("Alan"),
            last_name: None,
            phone: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "Id": 9, "FirstName": "Alan" }));
    }

    mod http {
        use super::*;
        use pretty_assertions::assert_eq;
        use axum::{
            http::StatusCode as Status,
            routing::{get, patch, post},
            Json, Router,
        };
        use url::Url;

        fn client_for(base_url: &str) -> HttpRecordClient {
            HttpRecordClient::new(&RecordServiceSettings {
                base_url: Url::parse(base_url).unwrap(),
                project_id: "proj-1".to_string(),
                public_key: "pk-test".to_string(),
                timeout_seconds: 5,
                task_table: "task18".to_string(),
                user_table: "User".to_string(),
                page_limit: 100,
            })
            .unwrap()
        }

        async fn serve(router: Router) -> HttpRecordClient {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, router).await.unwrap();
            });
            client_for(&format!("http://{}", addr))
        }

        fn task_json(id: i64) -> Value {
            json!({
                "Id": id,
                "title": "Water plants",
                "due_date": "2024-05-03",
                "status": "To Do",
                "is_completed": false,
                "CreatedOn": "2024-05-01T09:00:00Z",
                "ModifiedOn": "2024-05-01T09:00:00Z",
            })
        }

        #[tokio::test]
        async fn lookup_by_id_separates_missing_from_unavailable() {
            let client = serve(
                Router::new()
                    .route(
                        "/tables/task18/records/7/query",
                        post(|| async { Status::INTERNAL_SERVER_ERROR }),
                    )
                    .route(
                        "/tables/task18/records/8/query",
                        post(|| async { Json(json!({ "data": task_json(8) })) }),
                    )
                    .route(
                        "/tables/task18/records/9/query",
                        post(|| async { Json(json!({ "data": null })) }),
                    ),
            )
            .await;

            let unavailable = client.get_task(7).await.unwrap_err();
            assert!(matches!(unavailable, RecordError::Transport(_)));

            assert_eq!(client.get_task(8).await.unwrap().id, 8);

            // No route for id 3, so the stub answers 404
            assert_eq!(
                client.get_task(3).await.unwrap_err(),
                RecordError::NotFound("Task".to_string())
            );
            assert_eq!(
                client.get_task(9).await.unwrap_err(),
                RecordError::NotFound("Task".to_string())
            );
        }

        #[tokio::test]
        async fn user_fetch_reports_server_errors_as_transport() {
            let failing = serve(Router::new().route(
                "/tables/User/records/query",
                post(|| async { (Status::BAD_GATEWAY, Json(json!({ "message": "upstream down" }))) }),
            ))
            .await;
            assert_eq!(
                failing.fetch_user(1).await.unwrap_err(),
                RecordError::Transport("upstream down".to_string())
            );

            let empty = serve(Router::new().route(
                "/tables/User/records/query",
                post(|| async { Json(json!({ "data": [] })) }),
            ))
            .await;
            assert_eq!(
                empty.fetch_user(1).await.unwrap_err(),
                RecordError::NotFound("User".to_string())
            );
        }

        #[tokio::test]
        async fn rejected_credentials_are_transport_failures() {
            let client = serve(
                Router::new()
                    .route(
                        "/tables/task18/records/query",
                        post(|| async { Status::UNAUTHORIZED }),
                    )
                    .route("/tables/task18/records", post(|| async { Status::FORBIDDEN })),
            )
            .await;

            let fetch = client.fetch_tasks(&TaskQuery::default()).await.unwrap_err();
            assert!(matches!(fetch, RecordError::Transport(_)));

            let create = client.create_task(&NewTask::new("Call bank")).await.unwrap_err();
            assert!(matches!(create, RecordError::Transport(_)));
        }

        #[tokio::test]
        async fn unsuccessful_mutations_map_to_their_own_failures() {
            let client = serve(
                Router::new()
                    .route(
                        "/tables/task18/records",
                        post(|| async {
                            Json(json!({ "success": false, "results": [{ "data": task_json(1) }] }))
                        })
                        .patch(|| async { Json(json!({ "success": false, "results": [] })) })
                        .delete(|| async { Json(json!({ "success": false })) }),
                    )
                    .route(
                        "/tables/User/records",
                        patch(|| async { Status::INTERNAL_SERVER_ERROR }),
                    ),
            )
            .await;

            assert_eq!(
                client.create_task(&NewTask::new("Call bank")).await.unwrap_err(),
                RecordError::CreateFailed("task".to_string())
            );
            assert_eq!(
                client.update_task(1, &TaskPatch::default()).await.unwrap_err(),
                RecordError::UpdateFailed("task".to_string())
            );
            assert_eq!(
                client.delete_task(1).await.unwrap_err(),
                RecordError::DeleteFailed("task".to_string())
            );
            assert_eq!(
                client.update_user(1, &ProfileUpdate::default()).await.unwrap_err(),
                RecordError::UpdateFailed("user profile".to_string())
            );
        }

        #[tokio::test]
        async fn successful_mutations_return_the_stored_record() {
            let client = serve(Router::new().route(
                "/tables/task18/records",
                post(|| async {
                    Json(json!({ "success": true, "results": [{ "data": task_json(21) }] }))
                })
                .delete(|| async { Json(json!({ "success": true })) }),
            ))
            .await;

            let created = client.create_task(&NewTask::new("Water plants")).await.unwrap();
            assert_eq!(created.id, 21);
            assert_eq!(created.due_date, NaiveDate::from_ymd_opt(2024, 5, 3));

            client.delete_task(21).await.unwrap();
        }

        #[tokio::test]
        async fn malformed_success_body_is_transport_failure() {
            let client = serve(Router::new().route(
                "/tables/task18/records/query",
                post(|| async { "<html>maintenance</html>" }),
            ))
            .await;

            let err = client.fetch_tasks(&TaskQuery::default()).await.unwrap_err();
            assert!(matches!(err, RecordError::Transport(ref m) if m.starts_with("malformed response")));
        }

        #[tokio::test]
        async fn unreachable_service_is_transport_failure() {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);
            let client = client_for(&format!("http://{}", addr));

            let err = client.fetch_tasks(&TaskQuery::default()).await.unwrap_err();
            assert!(matches!(err, RecordError::Transport(_)));
            assert!(client.health_check().await.is_err());
        }

        #[tokio::test]
        async fn health_check_fails_on_server_errors() {
            let healthy = serve(Router::new().route("/", get(|| async { "ok" }))).await;
            assert_eq!(healthy.health_check().await, Ok(()));

            let broken =
                serve(Router::new().route("/", get(|| async { Status::SERVICE_UNAVAILABLE }))).await;
            assert!(matches!(
                broken.health_check().await,
                Err(RecordError::Transport(_))
            ));
        }
    }
}
