use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};

use crate::data::WindowedDataset;

/// One mini-batch of windows on the target device
#[derive(Debug, Clone)]
pub struct WindowBatch<B: Backend> {
    /// `[batch, lookback, 1]`
    pub inputs: Tensor<B, 3>,
    /// `[batch, 1]`
    pub targets: Tensor<B, 2>,
}

impl<B: Backend> WindowBatch<B> {
    /// Gather the samples at `indices` into a batch
    pub fn from_indices(dataset: &WindowedDataset, indices: &[usize], device: &B::Device) -> Self {
        let lookback = dataset.lookback();
        let mut inputs = Vec::with_capacity(indices.len() * lookback);
        let mut targets = Vec::with_capacity(indices.len());

        for &i in indices {
            inputs.extend(dataset.inputs.row(i).iter().map(|v| *v as f32));
            targets.push(dataset.targets[i] as f32);
        }

        let inputs = Tensor::from_data(TensorData::new(inputs, [indices.len(), lookback, 1]), device);
        let targets = Tensor::from_data(TensorData::new(targets, [indices.len(), 1]), device);

        Self { inputs, targets }
    }
}

/// Contiguous batches over the whole dataset, in order
pub fn sequential_batches(len: usize, batch_size: usize) -> impl Iterator<Item = Vec<usize>> {
    let batch_size = batch_size.max(1);
    (0..len)
        .step_by(batch_size)
        .map(move |start| (start..(start + batch_size).min(len)).collect())
}
