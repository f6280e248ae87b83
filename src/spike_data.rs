use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};
use simple_error::{try_with, SimpleError, SimpleResult};

use crate::geometry::Shape2D;
use crate::types::{HashMap, HashSet};

// one train per neuron in row-major order, spike times in ms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpikes {
    pub label: String,
    pub shape: Shape2D,
    pub spike_trains: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSpikes {
    pub scale: f64,
    pub layers: Vec<LayerSpikes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeDump {
    pub dataset_label: String,
    pub sim_time: f64,
    pub image_count: usize,
    pub scales: Vec<ScaleSpikes>,
}

impl LayerSpikes {
    pub fn new(label: &str, shape: Shape2D, spike_trains: Vec<Vec<f64>>) -> SimpleResult<Self> {
        let layer = Self {
            label: label.to_string(),
            shape,
            spike_trains,
        };
        layer.validate()?;
        Ok(layer)
    }

    pub fn validate(&self) -> SimpleResult<()> {
        if self.spike_trains.len() != self.shape.area() {
            return Err(SimpleError::new(format!(
                "layer {} of shape {} needs {} spike trains, got {}",
                self.label,
                self.shape,
                self.shape.area(),
                self.spike_trains.len()
            )));
        }

        for (nid, spike_train) in self.spike_trains.iter().enumerate() {
            if spike_train.iter().any(|t| !t.is_finite() || *t < 0.0) {
                return Err(SimpleError::new(format!(
                    "layer {}: spike times of neuron {} must be finite and non-negative",
                    self.label, nid
                )));
            }

            if spike_train.iter().tuple_windows().any(|(t0, t1)| t1 < t0) {
                return Err(SimpleError::new(format!(
                    "layer {}: spike times of neuron {} are not sorted",
                    self.label, nid
                )));
            }
        }

        Ok(())
    }

    pub fn num_spikes(&self) -> usize {
        self.spike_trains.iter().map(Vec::len).sum()
    }

    pub fn spike_counts(&self) -> Vec<usize> {
        self.spike_trains.iter().map(Vec::len).collect()
    }
}

impl SpikeDump {
    pub fn new(dataset_label: &str, sim_time: f64, image_count: usize) -> Self {
        Self {
            dataset_label: dataset_label.to_string(),
            sim_time,
            image_count,
            scales: Vec::new(),
        }
    }

    pub fn push_scale(&mut self, scale: f64, layers: Vec<LayerSpikes>) {
        self.scales.push(ScaleSpikes { scale, layers });
    }

    pub fn validate(&self) -> SimpleResult<()> {
        if !(self.sim_time > 0.0) {
            return Err(SimpleError::new("sim_time must be strictly positive"));
        }

        let mut seen_labels = HashSet::default();

        for scale_spikes in &self.scales {
            for layer in &scale_spikes.layers {
                layer.validate()?;

                if !seen_labels.insert(layer.label.as_str()) {
                    return Err(SimpleError::new(format!(
                        "duplicate layer label {}",
                        layer.label
                    )));
                }
            }
        }

        Ok(())
    }

    /// `<dataset_label>_<scale>..._<sim_time>ms_<image_count>_images.json`
    pub fn file_name(&self) -> String {
        let scales = self
            .scales
            .iter()
            .map(|scale_spikes| format!("{:?}", scale_spikes.scale))
            .join("_");

        format!(
            "{}_{}_{:?}ms_{}_images.json",
            self.dataset_label, scales, self.sim_time, self.image_count
        )
    }

    pub fn layers_by_label(&self) -> HashMap<&str, &LayerSpikes> {
        self.scales
            .iter()
            .flat_map(|scale_spikes| scale_spikes.layers.iter())
            .map(|layer| (layer.label.as_str(), layer))
            .collect()
    }

    pub fn write_to_dir(&self, dir: &Path) -> SimpleResult<PathBuf> {
        self.validate()?;

        let path = dir.join(self.file_name());
        let file = try_with!(File::create(&path), "cannot create {}", path.display());
        let mut writer = BufWriter::new(file);
        try_with!(
            serde_json::to_writer(&mut writer, self),
            "cannot write spike dump to {}",
            path.display()
        );
        try_with!(writer.flush(), "cannot write spike dump to {}", path.display());
        let file = try_with!(
            writer.into_inner().map_err(|err| err.into_error()),
            "cannot write spike dump to {}",
            path.display()
        );
        try_with!(file.sync_all(), "cannot sync spike dump {}", path.display());

        info!(
            "dumped spikes of {} scales to {}",
            self.scales.len(),
            path.display()
        );

        Ok(path)
    }

    pub fn read_from(path: &Path) -> SimpleResult<Self> {
        let file = try_with!(File::open(path), "cannot open {}", path.display());
        let dump: SpikeDump = try_with!(
            serde_json::from_reader(BufReader::new(file)),
            "cannot parse spike dump {}",
            path.display()
        );
        try_with!(dump.validate(), "invalid spike dump {}", path.display());
        Ok(dump)
    }
}
