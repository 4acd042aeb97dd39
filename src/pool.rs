use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::process::Command;
use tracing::info;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VolumeInfo {
    pub name: String,
    pub size: u64,
    pub uuid: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PoolInfo {
    pub name: String,
    pub size: u64,
    pub free_size: u64,
}

/// Backend failures keep their kind here for logging; the RPC layer
/// collapses all of them to one generic wire code.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Boundary to the storage subsystem. Implementations must be safe for
/// unsynchronized concurrent calls; the protocol layer does not serialize
/// requests against the pool.
#[async_trait]
pub trait PoolProvider: Send + Sync {
    async fn volumes(&self) -> Result<Vec<VolumeInfo>, PoolError>;
    async fn create_volume(&self, name: &str, size: u64) -> Result<(), PoolError>;
    async fn destroy_volume(&self, name: &str) -> Result<(), PoolError>;
    async fn pools(&self) -> Result<Vec<PoolInfo>, PoolError>;
}

/// LVM-backed provider. Every call spawns its own short-lived lvm tool
/// invocation against the configured volume group, so no pool handle
/// outlives a single request regardless of how the call ends.
#[derive(Debug, Clone)]
pub struct LvmPool {
    vg_name: String,
}

#[derive(Debug, Deserialize)]
struct LvmReport {
    report: Vec<LvmReportEntry>,
}

#[derive(Debug, Deserialize)]
struct LvmReportEntry {
    #[serde(default)]
    lv: Vec<LvRow>,
    #[serde(default)]
    vg: Vec<VgRow>,
}

#[derive(Debug, Deserialize)]
struct LvRow {
    lv_name: String,
    lv_size: String,
    lv_uuid: String,
}

#[derive(Debug, Deserialize)]
struct VgRow {
    vg_name: String,
    vg_size: String,
    vg_free: String,
}

impl LvmPool {
    pub fn new(vg_name: impl Into<String>) -> Self {
        Self {
            vg_name: vg_name.into(),
        }
    }

    /// Fail-early startup check that the configured volume group exists and
    /// is reachable. The daemon must not start serving without its pool.
    pub async fn probe(&self) -> Result<(), PoolError> {
        run_lvm(&["vgs", "--reportformat", "json", self.vg_name.as_str()]).await?;
        Ok(())
    }

    async fn report(&self, args: &[&str]) -> Result<LvmReport, PoolError> {
        let stdout = run_lvm(args).await?;
        serde_json::from_str(&stdout)
            .map_err(|err| PoolError::Backend(format!("unparseable lvm report: {err}")))
    }
}

async fn run_lvm(args: &[&str]) -> Result<String, PoolError> {
    let output = Command::new(args[0])
        .args(&args[1..])
        .output()
        .await
        .map_err(|err| PoolError::Backend(format!("failed to run {}: {err}", args[0])))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PoolError::Backend(format!(
            "{} exited with {}: {}",
            args[0],
            output.status,
            stderr.trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|_| PoolError::Backend(format!("{} produced non-utf8 output", args[0])))
}

#[async_trait]
impl PoolProvider for LvmPool {
    async fn volumes(&self) -> Result<Vec<VolumeInfo>, PoolError> {
        let report = self
            .report(&[
                "lvs",
                "--reportformat",
                "json",
                "--units",
                "b",
                "--nosuffix",
                "-o",
                "lv_name,lv_size,lv_uuid",
                self.vg_name.as_str(),
            ])
            .await?;
        map_lv_rows(report)
    }

    async fn create_volume(&self, name: &str, size: u64) -> Result<(), PoolError> {
        let size_arg = format!("{size}b");
        run_lvm(&["lvcreate", "-L", size_arg.as_str(), "-n", name, self.vg_name.as_str()]).await?;
        info!(volume = %name, size, "volume created");
        Ok(())
    }

    async fn destroy_volume(&self, name: &str) -> Result<(), PoolError> {
        // A missing volume is a lookup failure, not a tool failure.
        let existing = self.volumes().await?;
        if !existing.iter().any(|volume| volume.name == name) {
            return Err(PoolError::NotFound("lv".to_string()));
        }

        let target = format!("{}/{}", self.vg_name, name);
        run_lvm(&["lvremove", "-f", target.as_str()]).await?;
        info!(volume = %name, "volume removed");
        Ok(())
    }

    async fn pools(&self) -> Result<Vec<PoolInfo>, PoolError> {
        let report = self
            .report(&[
                "vgs",
                "--reportformat",
                "json",
                "--units",
                "b",
                "--nosuffix",
                "-o",
                "vg_name,vg_size,vg_free",
                self.vg_name.as_str(),
            ])
            .await?;
        map_vg_rows(report)
    }
}

fn map_lv_rows(report: LvmReport) -> Result<Vec<VolumeInfo>, PoolError> {
    let mut volumes: Vec<VolumeInfo> = report
        .report
        .into_iter()
        .flat_map(|entry| entry.lv)
        .map(|row| {
            Ok(VolumeInfo {
                size: parse_bytes(&row.lv_size)?,
                name: row.lv_name,
                uuid: row.lv_uuid,
            })
        })
        .collect::<Result<_, PoolError>>()?;

    volumes.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(volumes)
}

fn map_vg_rows(report: LvmReport) -> Result<Vec<PoolInfo>, PoolError> {
    report
        .report
        .into_iter()
        .flat_map(|entry| entry.vg)
        .map(|row| {
            Ok(PoolInfo {
                size: parse_bytes(&row.vg_size)?,
                free_size: parse_bytes(&row.vg_free)?,
                name: row.vg_name,
            })
        })
        .collect()
}

fn parse_bytes(raw: &str) -> Result<u64, PoolError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| PoolError::Backend(format!("unparseable size field: {raw:?}")))
}
