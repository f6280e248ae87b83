use serde::{Deserialize, Serialize};

use crate::geometry::Shape2D;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub layer_states: Vec<LayerState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerState {
    pub scale: f64,
    pub input_shape: Shape2D,
    pub output_shape: Shape2D,
    pub synapse_states: Vec<SynapseState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynapseState {
    pub pre_syn_nid: usize,
    pub post_syn_nid: usize,
    pub weight: f32,
}
