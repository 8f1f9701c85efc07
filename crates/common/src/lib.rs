//! Pieces shared by every crate of the workspace: logging setup, runtime
//! environment checks and the small wire types used outside any domain.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok", version: "0.1.0" };
        assert_eq!(h.status, "ok");
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v["status"], "ok");
    }
}
