use axum::{debug_handler, extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{db::SessionUser, store::Store, users::{self, NewUser}, AppResult};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn signup(
    State(store): State<Store>,
    Json(form): Json<NewUser>,
) -> AppResult<impl IntoResponse> {
    let user = users::register(&store, form).await?;

    Ok((StatusCode::CREATED, Json(SessionUser::from(&user))))
}
