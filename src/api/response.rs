use serde::Serialize;

/// Success envelope: `{ success: true, count?, data }`.
/// List endpoints carry `count`; single-resource endpoints omit it.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data,
        }
    }

    pub fn list(count: usize, data: T) -> Self {
        Self {
            success: true,
            count: Some(count),
            data,
        }
    }
}
