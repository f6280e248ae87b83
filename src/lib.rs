pub mod connectivity;
pub mod encoding;
pub mod geometry;
pub mod invariance;
pub mod network;
pub mod params;
pub mod pyramid;
pub mod spike_data;
pub mod state_snapshot;
pub mod tiling;

mod types;
mod util;
