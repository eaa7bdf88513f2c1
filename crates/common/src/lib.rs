pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn money_serializes_with_single_field() {
        let body = serde_json::to_value(types::Money { money: 3 }).unwrap();
        assert_eq!(body, serde_json::json!({"money": 3}));
    }
}
