use rolegate_domain::User;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for account creation by an administrator.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-user-request.ts"
)]
pub struct RegisterUserRequest {
    pub login: String,
    pub password: String,
}

/// Filters accepted by the user listing.
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub search: Option<String>,
}

/// API representation of a user. The password hash never leaves the service.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub login: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id.as_i64(),
            login: value.login,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}
