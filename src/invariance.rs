use std::sync::Arc;

use log::{debug, info};
use simple_error::{try_with, SimpleResult};

use crate::connectivity::{self, ConnectionList, ConnectionSet, ProjectionSink, WeightMatrix};
use crate::geometry::Shape2D;
use crate::state_snapshot::LayerState;
use crate::tiling::TileGrid;

#[derive(Debug, Clone)]
pub struct InvarianceLayer {
    scale: f64,
    grid: TileGrid,
    weight_matrix: Arc<WeightMatrix>,
}

impl InvarianceLayer {
    pub fn new(
        scale: f64,
        input_shape: Shape2D,
        weight_matrix: Arc<WeightMatrix>,
        delta_row: usize,
        delta_col: usize,
    ) -> SimpleResult<Self> {
        let grid = try_with!(
            TileGrid::new(weight_matrix.shape(), input_shape, delta_row, delta_col),
            "cannot place feature detectors at scale {}",
            scale
        );

        info!(
            "scale {}: {} input neurons, {} output neurons ({})",
            scale,
            input_shape.area(),
            grid.num_tiles(),
            grid.output_shape()
        );

        Ok(Self {
            scale,
            grid,
            weight_matrix,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn input_shape(&self) -> Shape2D {
        self.grid.target()
    }

    pub fn output_shape(&self) -> Shape2D {
        self.grid.output_shape()
    }

    pub fn num_outputs(&self) -> usize {
        self.grid.num_tiles()
    }

    pub fn num_connections(&self) -> usize {
        self.num_outputs() * self.grid.feature().area()
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn weight_matrix(&self) -> &Arc<WeightMatrix> {
        &self.weight_matrix
    }

    pub fn connection_sets(&self) -> SimpleResult<impl Iterator<Item = ConnectionSet> + '_> {
        connectivity::connection_sets(&self.grid, &self.weight_matrix)
    }

    pub fn register<S: ProjectionSink>(&self, sink: &mut S) -> SimpleResult<()> {
        for connection_set in self.connection_sets()? {
            try_with!(
                sink.project(&connection_set),
                "failed to project onto output neuron {} at scale {}",
                connection_set.output_index,
                self.scale
            );
        }

        debug!(
            "scale {}: registered {} connections",
            self.scale,
            self.num_connections()
        );

        Ok(())
    }

    pub fn extract_state(&self) -> SimpleResult<LayerState> {
        let mut connection_list =
            ConnectionList::new(self.input_shape().area(), self.num_outputs());
        self.register(&mut connection_list)?;

        Ok(LayerState {
            scale: self.scale,
            input_shape: self.input_shape(),
            output_shape: self.output_shape(),
            synapse_states: connection_list.into_synapse_states(),
        })
    }
}
