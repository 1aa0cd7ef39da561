use serde::{Deserialize, Serialize};

use crate::activation::Role;

#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
    pub matricule: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ActivationRequest {
    pub email: String,
    pub matricule: String,
    pub pseudo: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ActivationResponse {
    pub message: String,
    pub role: Role,
}
