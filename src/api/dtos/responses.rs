use serde::Serialize;

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
    pub is_root: bool,
}

/// Search reply: either the matches, or a flag telling the client the
/// query matched more than it can usefully render and must be narrowed.
#[derive(Serialize)]
pub struct SearchResponse<T> {
    pub too_many: bool,
    pub results: Vec<T>,
}

impl<T> SearchResponse<T> {
    pub fn too_many() -> Self {
        Self { too_many: true, results: Vec::new() }
    }

    pub fn results(results: Vec<T>) -> Self {
        Self { too_many: false, results }
    }
}

#[derive(Serialize)]
pub struct MinAppVersionResponse {
    pub min_app_version: f64,
}
