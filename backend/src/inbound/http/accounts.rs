//! Account API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Sarah Chen","email":"sarah@example.com","password":"password123"}
//! POST /api/v1/auth/login {"email":"sarah@example.com","password":"password123"}
//! GET  /api/v1/auth/me
//! PUT  /api/v1/auth/me {"phone":"+44 7700 900123"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AuthSession, CredentialsValidationError, Error, LoginCredentials, ProfileUpdate,
    Registration, User, UserValidationError,
};

use super::ApiResult;
use super::auth::AuthenticatedUser;
use super::error::invalid_field;
use super::schemas::ErrorSchema;
use super::state::HttpState;

/// Body of `POST /api/v1/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Sarah Chen")]
    pub name: String,
    #[schema(example = "sarah@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
    pub phone: Option<String>,
}

/// Body of `POST /api/v1/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `PUT /api/v1/auth/me`; absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Public view of an account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[schema(example = "🧑")]
    pub avatar: String,
    #[schema(example = 5.0)]
    pub rating: f64,
    pub trips_count: u32,
    #[schema(value_type = String, example = "2026-03-01T08:30:00")]
    pub created_at: NaiveDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_i64(),
            name: user.name.as_str().to_owned(),
            email: user.email.as_str().to_owned(),
            phone: user.phone.map(|phone| phone.as_str().to_owned()),
            avatar: user.avatar.as_str().to_owned(),
            rating: user.rating,
            trips_count: user.trips_count,
            created_at: user.created_at,
        }
    }
}

/// Token and profile returned after sign-up or login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token.as_str().to_owned(),
            user: session.user.into(),
        }
    }
}

/// Result of `PUT /api/v1/auth/me`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdatedResponse {
    #[schema(example = "Profile updated.")]
    pub message: String,
    pub user: UserResponse,
}

fn credentials_error(err: CredentialsValidationError) -> Error {
    let field = err.field();
    match err {
        CredentialsValidationError::MissingField { .. } => invalid_field(field, &err),
        CredentialsValidationError::PasswordTooShort { min } => {
            Error::invalid_request(format!("Password must be at least {min} characters."))
                .with_details(json!({ "field": field }))
        }
        CredentialsValidationError::User(inner) => profile_error(inner),
    }
}

fn profile_error(err: UserValidationError) -> Error {
    let (field, message) = match err {
        UserValidationError::EmptyName | UserValidationError::NameTooLong { .. } => {
            ("name", "Please enter a valid name.")
        }
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => {
            ("email", "Please enter a valid email address.")
        }
        UserValidationError::EmptyPhone | UserValidationError::PhoneTooLong { .. } => {
            ("phone", "Please enter a valid phone number.")
        }
    };
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "reason": err.to_string(),
    }))
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Store busy", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
        phone,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&name, &email, &password, phone.as_deref())
        .map_err(credentials_error)?;
    let session = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(AuthResponse::from(session)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Missing fields", body = ErrorSchema),
        (status = 401, description = "Invalid email or password", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password).map_err(|err| {
        match err {
            CredentialsValidationError::MissingField { field } => {
                Error::invalid_request("Email and password are required.")
                    .with_details(json!({ "field": field }))
            }
            other => credentials_error(other),
        }
    })?;
    let session = state.accounts.login(credentials).await?;
    Ok(web::Json(session.into()))
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.account_query.profile(caller.id()).await?;
    Ok(web::Json(user.into()))
}

/// Change the signed-in user's name and/or phone number.
#[utoipa::path(
    put,
    path = "/api/v1/auth/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileUpdatedResponse),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "updateProfile"
)]
#[put("/auth/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<ProfileUpdatedResponse>> {
    let UpdateProfileRequest { name, phone } = payload.into_inner();
    let update =
        ProfileUpdate::try_from_parts(name.as_deref(), phone.as_deref()).map_err(profile_error)?;
    let user = state.accounts.update_profile(caller.id(), update).await?;
    Ok(web::Json(ProfileUpdatedResponse {
        message: "Profile updated.".to_owned(),
        user: user.into(),
    }))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
