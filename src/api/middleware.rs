use crate::api::ApiError;
use crate::entities::{user, user::Role, User};
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sea_orm::{DatabaseConnection, EntityTrait};
use tower_cookies::{Cookies, Key};

pub const SESSION_COOKIE: &str = "shulea_session";

/// The authenticated caller, resolved once per request and handed to
/// handlers as an extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub role: Option<Role>,
    pub school_id: Option<i32>,
}

impl From<&user::Model> for CurrentUser {
    fn from(model: &user::Model) -> Self {
        Self {
            id: model.id,
            role: model.role,
            school_id: model.school_id,
        }
    }
}

impl CurrentUser {
    pub fn require_staff(&self) -> Result<(), ApiError> {
        match self.role {
            Some(role) if role.is_staff() => Ok(()),
            _ => Err(ApiError::Forbidden("Teacher or admin role required")),
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        match self.role {
            Some(Role::Admin) => Ok(()),
            _ => Err(ApiError::Forbidden("Admin role required")),
        }
    }

    pub fn require_school_admin(&self, school_id: i32) -> Result<(), ApiError> {
        self.require_admin()?;
        if self.school_id == Some(school_id) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Not an admin of this school"))
        }
    }
}

pub async fn auth_middleware(
    Extension(db): Extension<DatabaseConnection>,
    Extension(key): Extension<Key>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = cookies
        .signed(&key)
        .get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse::<i32>().ok());

    let Some(user_id) = user_id else {
        return ApiError::Unauthorized.into_response();
    };

    match User::find_by_id(user_id).one(&db).await {
        Ok(Some(u)) => {
            tracing::Span::current().record("user_id", u.id);
            request.extensions_mut().insert(CurrentUser::from(&u));
            next.run(request).await
        }
        // Session outlived its user
        Ok(None) => ApiError::Unauthorized.into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
