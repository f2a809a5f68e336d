mod logout;
mod signin;
mod signup;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup::signup))
        .route("/signin", get(signin::signin_page).post(signin::signin))
        .route("/logout", get(logout::logout).post(logout::logout))
        .route("/me", get(signin::me))
}
