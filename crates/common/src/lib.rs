//! Shared building blocks for every crate in the workspace: logging setup,
//! the JSON response envelope, pagination and health types.

pub mod types;
pub mod utils;
pub mod pagination;
pub mod response;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }
}
