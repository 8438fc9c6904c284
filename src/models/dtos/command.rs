use serde::Deserialize;

/// Body of `POST /increment` and `POST /decrement`.
#[derive(Debug, Deserialize)]
pub struct CommandDto {
    pub value: i64,
}
