//! Fixed-topology feed-forward network used as a bird controller.

use crate::ai::{Controller, Observation};
use crate::constants::WIN_HEIGHT;
use ndarray::{Array1, Array2, Zip};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of observation inputs.
pub const INPUTS: usize = 3;

/// Bound applied to every weight and bias after mutation.
pub const WEIGHT_LIMIT: f64 = 5.0;

/// One dense tanh layer. Weights are shaped `(inputs, outputs)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
}

impl Serialize for Layer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let (inputs, outputs) = self.weights.dim();
        let weights: Vec<f64> = self.weights.iter().copied().collect();
        let biases: Vec<f64> = self.biases.iter().copied().collect();

        let mut state = serializer.serialize_struct("Layer", 3)?;
        state.serialize_field("shape", &[inputs, outputs])?;
        state.serialize_field("weights", &weights)?;
        state.serialize_field("biases", &biases)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Layer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct LayerData {
            shape: [usize; 2],
            weights: Vec<f64>,
            biases: Vec<f64>,
        }

        let data = LayerData::deserialize(deserializer)?;
        let weights = Array2::from_shape_vec((data.shape[0], data.shape[1]), data.weights)
            .map_err(serde::de::Error::custom)?;
        if data.biases.len() != data.shape[1] {
            return Err(serde::de::Error::custom(format!(
                "expected {} biases, got {}",
                data.shape[1],
                data.biases.len()
            )));
        }
        Ok(Layer {
            weights,
            biases: Array1::from_vec(data.biases),
        })
    }
}

impl Layer {
    fn random<R: Rng>(inputs: usize, outputs: usize, rng: &mut R) -> Self {
        Self {
            weights: Array2::from_shape_fn((inputs, outputs), |_| rng.gen_range(-1.0..1.0)),
            biases: Array1::from_shape_fn(outputs, |_| rng.gen_range(-1.0..1.0)),
        }
    }

    /// Layer whose output is `tanh(0)` for any input.
    pub fn zeros(inputs: usize, outputs: usize) -> Self {
        Self {
            weights: Array2::zeros((inputs, outputs)),
            biases: Array1::zeros(outputs),
        }
    }

    pub fn inputs(&self) -> usize {
        self.weights.nrows()
    }

    pub fn outputs(&self) -> usize {
        self.weights.ncols()
    }

    fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}

/// Three inputs, an optional tanh hidden layer, one tanh output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Random network with `hidden` hidden units; zero connects inputs
    /// straight to the output.
    pub fn random<R: Rng>(hidden: usize, rng: &mut R) -> Self {
        let layers = if hidden == 0 {
            vec![Layer::random(INPUTS, 1, rng)]
        } else {
            vec![Layer::random(INPUTS, hidden, rng), Layer::random(hidden, 1, rng)]
        };
        Self { layers }
    }

    pub fn hidden_units(&self) -> usize {
        if self.layers.len() > 1 {
            self.layers[0].outputs()
        } else {
            0
        }
    }

    /// Forward pass. Inputs are pixel distances and get scaled to screen
    /// heights first.
    pub fn forward(&self, inputs: [f64; INPUTS]) -> f64 {
        let mut activation = Array1::from_vec(inputs.to_vec());
        activation.mapv_inplace(|x| x / WIN_HEIGHT as f64);
        for layer in &self.layers {
            activation = activation.dot(&layer.weights) + &layer.biases;
            activation.mapv_inplace(f64::tanh);
        }
        activation.get(0).copied().unwrap_or(0.0)
    }

    /// Perturb each parameter with probability `rate` by up to `strength`.
    pub fn mutate<R: Rng>(&mut self, rate: f64, strength: f64, rng: &mut R) {
        let mut perturb = |w: f64| {
            if rng.gen::<f64>() < rate {
                let delta = rng.gen_range(-strength..strength);
                (w + delta).clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT)
            } else {
                w
            }
        };
        for layer in &mut self.layers {
            layer.weights.mapv_inplace(&mut perturb);
            layer.biases.mapv_inplace(&mut perturb);
        }
    }

    /// Child taking each parameter from either parent with equal odds.
    /// Parents must share a topology.
    pub fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        let mut child = self.clone();
        for (layer, theirs) in child.layers.iter_mut().zip(&other.layers) {
            Zip::from(&mut layer.weights)
                .and(&theirs.weights)
                .for_each(|w, &t| {
                    if rng.gen_bool(0.5) {
                        *w = t;
                    }
                });
            Zip::from(&mut layer.biases)
                .and(&theirs.biases)
                .for_each(|b, &t| {
                    if rng.gen_bool(0.5) {
                        *b = t;
                    }
                });
        }
        child
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Layer::parameter_count).sum()
    }
}

impl Controller for Network {
    fn activate(&mut self, observation: &Observation) -> f64 {
        self.forward(observation.as_array())
    }
}
