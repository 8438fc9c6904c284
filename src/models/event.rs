/// Payload pushed to streaming clients whenever the counter changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterEvent {
    pub value: i64,
}

impl CounterEvent {
    pub fn new(value: i64) -> Self {
        Self { value }
    }
    pub fn to_json(&self) -> String {
        format!("{{\"value\": {}}}", self.value)
    }
}

impl From<i64> for CounterEvent {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json() {
        assert_eq!(CounterEvent::new(3).to_json(), r#"{"value": 3}"#);
        let parsed: serde_json::Value =
            serde_json::from_str(&CounterEvent::new(42).to_json()).unwrap();
        assert_eq!(parsed["value"], 42);
    }
}
