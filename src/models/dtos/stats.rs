use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct StatsDto {
    pub value: i64,
    pub observers: usize,
    pub sessions: usize,
}
