use std::sync::mpsc::channel as mpsc_channel;
use std::sync::Arc;
use std::thread;

use itertools::Itertools;
use log::info;
use simple_error::{try_with, SimpleError, SimpleResult};

use crate::connectivity::{ProjectionSink, WeightMatrix};
use crate::encoding::{GrayImage, SpikeSourceLayer};
use crate::geometry::Shape2D;
use crate::invariance::InvarianceLayer;
use crate::params::{self, ExperimentParams};
use crate::pyramid;
use crate::state_snapshot::{LayerState, StateSnapshot};
use crate::util;

pub struct InvarianceNetwork {
    layers: Vec<InvarianceLayer>,
    num_threads: usize,
}

pub fn create_network(
    params: &ExperimentParams,
    image_shape: Shape2D,
    weight_matrix: Arc<WeightMatrix>,
) -> SimpleResult<InvarianceNetwork> {
    try_with!(
        params::validate_experiment_params(params),
        "invalid experiment parameters"
    );

    let mut layers = Vec::new();

    for (scale, shape) in pyramid::pyramid_shapes(image_shape, &params.scales)? {
        layers.push(InvarianceLayer::new(
            scale,
            shape,
            Arc::clone(&weight_matrix),
            params.stride_params.delta_row,
            params.stride_params.delta_col,
        )?);
    }

    Ok(InvarianceNetwork {
        layers,
        num_threads: get_num_threads(params),
    })
}

fn get_num_threads(params: &ExperimentParams) -> usize {
    params
        .technical_params
        .num_threads
        .unwrap_or_else(num_cpus::get)
}

impl InvarianceNetwork {
    pub fn layers(&self) -> &[InvarianceLayer] {
        &self.layers
    }

    pub fn get_num_output_neurons(&self) -> usize {
        self.layers.iter().map(InvarianceLayer::num_outputs).sum()
    }

    pub fn get_num_connections(&self) -> usize {
        self.layers.iter().map(InvarianceLayer::num_connections).sum()
    }

    // one sink per layer, in scale order
    pub fn register<S: ProjectionSink>(&self, sinks: &mut [S]) -> SimpleResult<()> {
        if sinks.len() != self.layers.len() {
            return Err(SimpleError::new(format!(
                "expected {} sinks, got {}",
                self.layers.len(),
                sinks.len()
            )));
        }

        for (layer, sink) in self.layers.iter().zip(sinks.iter_mut()) {
            layer.register(sink)?;
        }

        Ok(())
    }

    pub fn encode_inputs(&self, images: &[GrayImage]) -> SimpleResult<Vec<SpikeSourceLayer>> {
        if images.len() != self.layers.len() {
            return Err(SimpleError::new(format!(
                "expected {} scaled images, got {}",
                self.layers.len(),
                images.len()
            )));
        }

        self.layers
            .iter()
            .zip(images)
            .map(|(layer, image)| {
                if image.shape() != layer.input_shape() {
                    return Err(SimpleError::new(format!(
                        "image for scale {} has shape {}, expected {}",
                        layer.scale(),
                        image.shape(),
                        layer.input_shape()
                    )));
                }
                Ok(SpikeSourceLayer::from_image(image))
            })
            .collect()
    }

    pub fn extract_state_snapshot(&self) -> SimpleResult<StateSnapshot> {
        let num_threads = self.num_threads.min(self.layers.len()).max(1);
        let layers = Arc::new(self.layers.clone());
        let (layer_state_tx, layer_state_rx) = mpsc_channel();

        info!(
            "extracting {} layers ({} connections) on {} threads",
            layers.len(),
            self.get_num_connections(),
            num_threads
        );

        let join_handles: Vec<_> = (0..num_threads)
            .map(|thread_id| {
                let layers = Arc::clone(&layers);
                let layer_state_tx = layer_state_tx.clone();

                thread::spawn(move || {
                    for layer_idx in util::get_partition_range(num_threads, thread_id, layers.len())
                    {
                        let result = layers[layer_idx].extract_state();
                        if layer_state_tx.send((layer_idx, result)).is_err() {
                            return;
                        }
                    }
                })
            })
            .collect();

        drop(layer_state_tx);

        for join_handle in join_handles {
            if join_handle.join().is_err() {
                return Err(SimpleError::new("layer extraction thread panicked"));
            }
        }

        let layer_states = layer_state_rx
            .into_iter()
            .sorted_by_key(|(layer_idx, _)| *layer_idx)
            .map(|(_, result)| result)
            .collect::<SimpleResult<Vec<LayerState>>>()?;

        Ok(StateSnapshot { layer_states })
    }
}
