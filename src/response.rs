//! Standard response envelope: `{result, msg, data?, quantity?, type?, url?}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const ACTION_SUCCESS: &str = "Action successfully !";

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub result: u8,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<usize>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T> Envelope<T> {
    fn new(result: u8, msg: impl Into<String>, status: StatusCode) -> Self {
        Envelope {
            result,
            msg: msg.into(),
            data: None,
            quantity: None,
            kind: None,
            url: None,
            status,
        }
    }

    pub fn ok(msg: impl Into<String>) -> Self {
        Self::new(1, msg, StatusCode::OK)
    }

    pub fn created(msg: impl Into<String>) -> Self {
        Self::new(1, msg, StatusCode::CREATED)
    }

    pub fn fail(msg: impl Into<String>) -> Self {
        Self::new(0, msg, StatusCode::OK)
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }
}

impl<T> Envelope<Vec<T>> {
    /// Success carrying a list; `quantity` is the number of rows returned.
    pub fn many(msg: impl Into<String>, rows: Vec<T>) -> Self {
        let mut env = Self::ok(msg);
        env.quantity = Some(rows.len());
        env.data = Some(rows);
        env
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
