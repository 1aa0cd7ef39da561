use serde::{Deserialize, Serialize};

use crate::routes::user::model::PublicUser;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: PublicUser,
    pub redirect_to: &'static str,
}
