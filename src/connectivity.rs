use std::sync::Arc;

use simple_error::{SimpleError, SimpleResult};

use crate::geometry::Shape2D;
use crate::state_snapshot::SynapseState;
use crate::tiling::{Tile, TileGrid};

// row-major over the feature window
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    shape: Shape2D,
    values: Vec<f32>,
}

impl WeightMatrix {
    pub fn new(shape: Shape2D, values: Vec<f32>) -> SimpleResult<Self> {
        if values.len() != shape.area() {
            return Err(SimpleError::new(format!(
                "weight matrix of shape {} needs {} values, got {}",
                shape,
                shape.area(),
                values.len()
            )));
        }

        if values.iter().any(|value| !value.is_finite()) {
            return Err(SimpleError::new("weight matrix values must be finite"));
        }

        Ok(Self { shape, values })
    }

    pub fn shape(&self) -> Shape2D {
        self.shape
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionSet {
    pub output_index: usize,
    pub source_indices: Vec<usize>,
    pub weight_matrix: Arc<WeightMatrix>,
}

impl ConnectionSet {
    pub fn for_tile(grid: &TileGrid, tile: &Tile, weight_matrix: Arc<WeightMatrix>) -> Self {
        Self {
            output_index: tile.output_index,
            source_indices: tile.source_indices(grid.feature(), grid.target()).collect(),
            weight_matrix,
        }
    }

    pub fn synapses(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.source_indices
            .iter()
            .zip(self.weight_matrix.values())
            .map(|(source_index, weight)| (*source_index, self.output_index, *weight))
    }
}

pub fn connection_sets<'a>(
    grid: &'a TileGrid,
    weight_matrix: &'a Arc<WeightMatrix>,
) -> SimpleResult<impl Iterator<Item = ConnectionSet> + 'a> {
    if weight_matrix.shape() != grid.feature() {
        return Err(SimpleError::new(format!(
            "weight matrix shape {} does not match feature shape {}",
            weight_matrix.shape(),
            grid.feature()
        )));
    }

    Ok(grid
        .iter()
        .map(move |tile| ConnectionSet::for_tile(grid, &tile, Arc::clone(weight_matrix))))
}

/// Receives the connections of an invariance layer, typically an adapter
/// registering projections with a spiking network simulator.
pub trait ProjectionSink {
    fn project(&mut self, connection_set: &ConnectionSet) -> SimpleResult<()>;
}

#[derive(Debug, Clone)]
pub struct ConnectionList {
    num_sources: usize,
    num_outputs: usize,
    synapse_states: Vec<SynapseState>,
}

impl ConnectionList {
    pub fn new(num_sources: usize, num_outputs: usize) -> Self {
        Self {
            num_sources,
            num_outputs,
            synapse_states: Vec::new(),
        }
    }

    pub fn synapse_states(&self) -> &[SynapseState] {
        &self.synapse_states
    }

    pub fn into_synapse_states(self) -> Vec<SynapseState> {
        self.synapse_states
    }
}

impl ProjectionSink for ConnectionList {
    fn project(&mut self, connection_set: &ConnectionSet) -> SimpleResult<()> {
        if connection_set.output_index >= self.num_outputs {
            return Err(SimpleError::new(format!(
                "Invalid output neuron id: {}",
                connection_set.output_index
            )));
        }

        for (pre_syn_nid, post_syn_nid, weight) in connection_set.synapses() {
            if pre_syn_nid >= self.num_sources {
                return Err(SimpleError::new(format!(
                    "Invalid source neuron id: {}",
                    pre_syn_nid
                )));
            }

            self.synapse_states.push(SynapseState {
                pre_syn_nid,
                post_syn_nid,
                weight,
            });
        }

        Ok(())
    }
}
