use super::ApiState;
use super::error::ApiError;
use crate::models::{CustomLevel, LevelType, NewLevel, Word, WordPatch};
use crate::stats::{VocabularyStats, search_words};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateWordRequest {
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub arabic: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRequest {
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLevelRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub word_ids: Option<serde_json::Value>,
    #[serde(default, rename = "type")]
    pub level_type: Option<LevelType>,
}

impl CreateLevelRequest {
    fn into_new_level(self) -> ApiResult<NewLevel> {
        let missing = || ApiError::BadRequest("level name and word list are required".to_string());

        let name = self.name.ok_or_else(missing)?;
        let Some(serde_json::Value::Array(items)) = self.word_ids else {
            return Err(missing());
        };
        let word_ids = items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(id) => Ok(id),
                _ => Err(ApiError::BadRequest("word ids must be strings".to_string())),
            })
            .collect::<ApiResult<Vec<String>>>()?;

        Ok(NewLevel {
            name,
            word_ids,
            level_type: self.level_type.unwrap_or_default(),
        })
    }
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "OK",
        message: "Server is running",
    })
}

pub async fn list_words(
    State(state): State<ApiState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Word>>> {
    let words = state.stores.words.list().await?;
    let words = match query.search.as_deref() {
        Some(term) => search_words(&words, term).into_iter().cloned().collect(),
        None => words,
    };
    Ok(Json(words))
}

pub async fn create_word(
    State(state): State<ApiState>,
    payload: Result<Json<CreateWordRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Word>)> {
    let Json(request) = payload?;
    let english = request.english.unwrap_or_default();
    let arabic = request.arabic.unwrap_or_default();
    let word = state.stores.words.create(&english, &arabic).await?;
    Ok((StatusCode::CREATED, Json(word)))
}

pub async fn update_word(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<WordPatch>, JsonRejection>,
) -> ApiResult<Json<Word>> {
    let Json(patch) = payload?;
    let word = state.stores.words.update(&id, patch).await?;
    Ok(Json(word))
}

pub async fn delete_word(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    state.stores.words.delete(&id).await?;
    Ok(Json(Message {
        message: "word deleted".to_string(),
    }))
}

pub async fn record_word_stats(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<StatsRequest>, JsonRejection>,
) -> ApiResult<Json<Word>> {
    let Json(request) = payload?;
    let word = state.stores.words.record_stats(&id, request.is_correct).await?;
    Ok(Json(word))
}

pub async fn list_levels(State(state): State<ApiState>) -> ApiResult<Json<Vec<CustomLevel>>> {
    Ok(Json(state.stores.levels.list().await?))
}

pub async fn create_level(
    State(state): State<ApiState>,
    payload: Result<Json<CreateLevelRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CustomLevel>)> {
    let Json(request) = payload?;
    let level = state.stores.levels.create(request.into_new_level()?).await?;
    Ok((StatusCode::CREATED, Json(level)))
}

pub async fn delete_level(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Message>> {
    state.stores.levels.delete(&name).await?;
    Ok(Json(Message {
        message: "level deleted".to_string(),
    }))
}

pub async fn record_level_stats(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    payload: Result<Json<StatsRequest>, JsonRejection>,
) -> ApiResult<Json<CustomLevel>> {
    let Json(request) = payload?;
    let level = state
        .stores
        .levels
        .record_stats(&name, request.is_correct)
        .await?;
    Ok(Json(level))
}

pub async fn vocabulary_stats(State(state): State<ApiState>) -> ApiResult<Json<VocabularyStats>> {
    let words = state.stores.words.list().await?;
    Ok(Json(VocabularyStats::from_words(&words)))
}
