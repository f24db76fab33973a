use serde::Serialize;

/// Payload of the bare `/health` probe.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Payload of `/api/health`.
#[derive(Serialize, Debug, Clone)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub timestamp: String,
}

/// Payload of `/api/status`.
#[derive(Serialize, Debug, Clone)]
pub struct StatusReport {
    pub api: ApiStatus,
    pub database: DatabaseStatus,
    pub modules: Vec<ModuleStatus>,
    pub timestamp: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ApiStatus {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Serialize, Debug, Clone)]
pub struct DatabaseStatus {
    pub status: &'static str,
    pub backend: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ModuleStatus {
    pub name: &'static str,
    pub status: &'static str,
}
