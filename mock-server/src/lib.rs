use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, patch},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const TODOS_PATH: &str = "/api/todos";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Deserialize)]
pub struct TitleInput {
    pub title: String,
}

#[derive(Default)]
pub struct Todos {
    next_id: i64,
    items: BTreeMap<i64, Todo>,
}

pub type Db = Arc<RwLock<Todos>>;

type Reply<T> = (StatusCode, Json<Envelope<T>>);

fn ok<T>(status: StatusCode, message: &str, data: T) -> Reply<T> {
    (
        status,
        Json(Envelope {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }),
    )
}

fn fail<T>(status: StatusCode, message: &str) -> Reply<T> {
    (
        status,
        Json(Envelope {
            success: false,
            message: message.to_string(),
            data: None,
        }),
    )
}

pub fn app() -> Router {
    let db: Db = Arc::default();
    Router::new()
        .route(TODOS_PATH, get(list_todos).post(create_todo))
        .route(&format!("{TODOS_PATH}/{{id}}"), delete(delete_todo))
        .route(&format!("{TODOS_PATH}/{{id}}/status"), patch(toggle_status))
        .route(&format!("{TODOS_PATH}/{{id}}/title"), patch(rename_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>) -> Reply<Vec<Todo>> {
    let todos = db.read().await;
    let newest_first = todos.items.values().rev().cloned().collect();
    ok(StatusCode::OK, "Todos retrieved", newest_first)
}

/// Parse `{title}` and reject blank titles with an envelope rather than
/// axum's plain-text rejection.
fn title_from(input: Result<Json<TitleInput>, JsonRejection>) -> Result<String, StatusCode> {
    match input {
        Ok(Json(TitleInput { title })) if !title.trim().is_empty() => Ok(title),
        _ => Err(StatusCode::BAD_REQUEST),
    }
}

async fn create_todo(State(db): State<Db>, input: Result<Json<TitleInput>, JsonRejection>) -> Reply<Todo> {
    let Ok(title) = title_from(input) else {
        return fail(StatusCode::BAD_REQUEST, "Title is required");
    };
    let mut todos = db.write().await;
    todos.next_id += 1;
    let now = Utc::now();
    let todo = Todo {
        id: todos.next_id,
        title,
        completed: false,
        created_at: now,
        updated_at: now,
    };
    todos.items.insert(todo.id, todo.clone());
    debug!(id = todo.id, "todo created");
    ok(StatusCode::CREATED, "Todo created", todo)
}

async fn toggle_status(State(db): State<Db>, Path(id): Path<i64>) -> Reply<Todo> {
    let mut todos = db.write().await;
    let Some(todo) = todos.items.get_mut(&id) else {
        return fail(StatusCode::NOT_FOUND, "Todo not found");
    };
    todo.completed = !todo.completed;
    todo.updated_at = Utc::now();
    ok(StatusCode::OK, "Todo status updated", todo.clone())
}

async fn rename_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    input: Result<Json<TitleInput>, JsonRejection>,
) -> Reply<Todo> {
    let Ok(title) = title_from(input) else {
        return fail(StatusCode::BAD_REQUEST, "Title is required");
    };
    let mut todos = db.write().await;
    let Some(todo) = todos.items.get_mut(&id) else {
        return fail(StatusCode::NOT_FOUND, "Todo not found");
    };
    todo.title = title;
    todo.updated_at = Utc::now();
    ok(StatusCode::OK, "Todo title updated", todo.clone())
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<i64>) -> Reply<Todo> {
    let mut todos = db.write().await;
    match todos.items.remove(&id) {
        Some(todo) => ok(StatusCode::OK, "Todo deleted", todo),
        None => fail(StatusCode::NOT_FOUND, "Todo not found"),
    }
}
