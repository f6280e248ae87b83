use std::ops::Range;

pub fn get_partition_range(num_threads: usize, thread_id: usize, num_items: usize) -> Range<usize> {
    let min_partition_size = num_items / num_threads;
    let remainder = num_items % num_threads;

    if thread_id < remainder {
        let partition_size = min_partition_size + 1;
        let start = partition_size * thread_id;
        let end = start + partition_size;
        Range { start, end }
    } else {
        let start =
            (min_partition_size + 1) * remainder + min_partition_size * (thread_id - remainder);
        let end = start + min_partition_size;
        Range { start, end }
    }
}

#[cfg(test)]
pub mod test_util {
    use float_cmp::{assert_approx_eq, ApproxEq};
    use std::fmt::Debug;
    use std::sync::Arc;

    use crate::connectivity::WeightMatrix;
    use crate::geometry::Shape2D;
    use crate::params::{ExperimentParams, StrideParams, TechnicalParams};

    pub fn assert_approx_eq_slice<T>(left: &[T], right: &[T])
    where
        T: ApproxEq + Debug + Copy,
    {
        assert_eq!(left.len(), right.len());

        for item in left.iter().zip(right) {
            assert_approx_eq!(T, *item.0, *item.1);
        }
    }

    pub fn ramp_weight_matrix(rows: usize, cols: usize) -> Arc<WeightMatrix> {
        let shape = Shape2D::new(rows, cols).unwrap();
        let values = (0..shape.area())
            .map(|i| 0.4 * i as f32 / shape.area() as f32)
            .collect();
        Arc::new(WeightMatrix::new(shape, values).unwrap())
    }

    pub fn get_template_experiment_params() -> ExperimentParams {
        ExperimentParams {
            scales: vec![1.0, 0.5],
            stride_params: StrideParams {
                delta_row: 4,
                delta_col: 4,
            },
            sim_time: 50.0,
            technical_params: TechnicalParams {
                num_threads: Some(1),
            },
        }
    }
}
