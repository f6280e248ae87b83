use std::sync::Arc;
use std::time::Instant;

use hmax_invariance::{connectivity::WeightMatrix, geometry::Shape2D, network};
use rand::{distributions::Uniform, prelude::Distribution, rngs::StdRng, SeedableRng};

#[path = "../scenario_params.rs"]
mod scenario_params;

fn main() {
    let params = scenario_params::get_scenario_params();

    let mut rng = StdRng::seed_from_u64(0);
    let weight_dist = Uniform::new_inclusive(0.0, 0.4);

    let feature_shape = Shape2D::new(10, 10).unwrap();
    let weights = (0..feature_shape.area())
        .map(|_| weight_dist.sample(&mut rng))
        .collect();
    let weight_matrix = Arc::new(WeightMatrix::new(feature_shape, weights).unwrap());

    let image_shape = Shape2D::new(840, 840).unwrap();
    let t_stop = 10;

    let wall_start = Instant::now();

    let mut synapse_count = 0usize;
    let mut checksum = 0usize;

    for _ in 0..t_stop {
        let network =
            network::create_network(&params, image_shape, Arc::clone(&weight_matrix)).unwrap();
        let snapshot = network.extract_state_snapshot().unwrap();

        for layer_state in snapshot.layer_states {
            synapse_count += layer_state.synapse_states.len();
            for synapse_state in layer_state.synapse_states {
                checksum = checksum
                    .wrapping_add(synapse_state.pre_syn_nid * synapse_state.post_syn_nid);
            }
        }
    }

    let wall_time = wall_start.elapsed();
    let synapse_throughput = synapse_count as f64 / wall_time.as_secs_f64();

    eprintln!("Synapses per build: {}", synapse_count / t_stop);
    eprintln!(
        "Synapse construction throughput: {:.3e} ({:.3} ns per synapse)",
        synapse_throughput,
        1e9 / synapse_throughput
    );
    eprintln!("Checksum: {}", checksum);
}
