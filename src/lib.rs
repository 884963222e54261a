pub mod config;
pub mod error;
pub mod logging;
pub mod province;
pub mod raster;
pub mod reconcile;
pub mod resolver;
pub mod terrain;

pub use config::ReconcileConfig;
pub use error::{ReconcileError, Result};
pub use province::{ProvinceDefinition, ProvinceType};
pub use raster::{Color, RasterPair, RegionIndex, TerrainCounts, TerrainSampler};
pub use reconcile::{
    CancellationToken, Eligibility, ReconcileReport, ReconcileStats, Reconciler, RunStatus,
    SkipReason, reconcile_files,
};
pub use resolver::{Resolution, majority_color, resolve_counts, resolve_terrain};
pub use terrain::{PALETTE, Terrain};
