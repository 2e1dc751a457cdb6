use burn::config::Config;
use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig, Lstm, LstmConfig};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Architecture of the stacked LSTM forecaster
#[derive(Config)]
pub struct LstmForecasterConfig {
    #[config(default = 1)]
    pub input_size: usize,
    #[config(default = 50)]
    pub hidden_size: usize,
    #[config(default = 3)]
    pub num_layers: usize,
    #[config(default = 0.2)]
    pub dropout: f64,
}

impl LstmForecasterConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LstmForecaster<B> {
        let layers = (0..self.num_layers)
            .map(|i| {
                let d_input = if i == 0 { self.input_size } else { self.hidden_size };
                LstmConfig::new(d_input, self.hidden_size, true).init(device)
            })
            .collect();

        LstmForecaster {
            layers,
            dropout: DropoutConfig::new(self.dropout).init(),
            head: LinearConfig::new(self.hidden_size, 1).init(device),
        }
    }
}

/// Stacked LSTM layers, each followed by dropout, and a single linear output
/// unit fed by the last time step of the top layer.
///
/// Dropout is only active on autodiff backends, so the `valid()` copy of a
/// trained model predicts deterministically.
#[derive(Module, Debug)]
pub struct LstmForecaster<B: Backend> {
    layers: Vec<Lstm<B>>,
    dropout: Dropout,
    head: Linear<B>,
}

impl<B: Backend> LstmForecaster<B> {
    /// `inputs` is `[batch, seq_len, input_size]`; returns `[batch, 1]`
    pub fn forward(&self, inputs: Tensor<B, 3>) -> Tensor<B, 2> {
        let mut hidden = inputs;
        for lstm in &self.layers {
            let (output, _state) = lstm.forward(hidden, None);
            hidden = self.dropout.forward(output);
        }

        let [batch, seq_len, units] = hidden.dims();
        let last_step = hidden
            .slice([0..batch, seq_len - 1..seq_len, 0..units])
            .reshape([batch, units]);

        self.head.forward(last_step)
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }
}
