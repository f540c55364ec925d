#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use shulea_server::api::middleware::SESSION_COOKIE;
use shulea_server::entities::{school, user, user::Role};
use shulea_server::{app, migrator};
use tower::ServiceExt;
use tower_cookies::cookie::{Cookie, CookieJar};
use tower_cookies::Key;

pub struct TestApp {
    pub db: DatabaseConnection,
    pub key: Key,
    pub router: Router,
}

pub async fn spawn_app() -> TestApp {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migrator::Migrator::up(&db, None).await.unwrap();

    let key = Key::from(&[7u8; 64]);
    let router = app::router(
        db.clone(),
        key.clone(),
        HeaderValue::from_static("http://localhost:3000"),
    );

    TestApp { db, key, router }
}

impl TestApp {
    pub async fn school(&self, name: &str) -> school::Model {
        school::ActiveModel {
            name: Set(name.to_string()),
            logo_url: Set(None),
            primary_color: Set(school::DEFAULT_PRIMARY_COLOR.to_string()),
            secondary_color: Set(school::DEFAULT_SECONDARY_COLOR.to_string()),
            font_style: Set(school::DEFAULT_FONT_STYLE.to_string()),
            subscription_plan: Set(school::DEFAULT_SUBSCRIPTION_PLAN.to_string()),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    /// Inserts a user directly; the hash is never verified by these tests.
    pub async fn user(&self, email: &str, role: Option<Role>, school_id: Option<i32>) -> user::Model {
        let now = chrono::Utc::now().naive_utc();
        user::ActiveModel {
            name: Set(email.split('@').next().unwrap_or(email).to_string()),
            email: Set(email.to_string()),
            password_hash: Set("unused".to_string()),
            role: Set(role),
            phone: Set(Some("+254700000000".to_string())),
            school_id: Set(school_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    /// Cookie header value carrying a signed session for `user_id`.
    pub fn session(&self, user_id: i32) -> String {
        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key)
            .add(Cookie::new(SESSION_COOKIE, user_id.to_string()));
        let signed = jar.get(SESSION_COOKIE).unwrap();
        format!("{}={}", SESSION_COOKIE, signed.value())
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        session: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = session {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, session: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(session), None).await
    }

    pub async fn post(&self, uri: &str, session: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(session), Some(body)).await
    }

    pub async fn put(&self, uri: &str, session: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(session), Some(body)).await
    }
}
