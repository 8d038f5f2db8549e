//! Patch-embedding network
//!
//! The lookback window is cut into non-overlapping patches, each patch goes
//! through a shared embedding with ReLU, and the flattened embeddings feed a
//! linear head producing the whole horizon at once.

use super::layers::{mse, relu, relu_backward, Dense};
use super::training::Network;
use crate::error::ModelFitError;
use rand::rngs::StdRng;

const MAX_PATCH_LEN: usize = 8;
const EMBEDDING_DIM: usize = 16;

#[derive(Debug, Clone)]
pub(crate) struct PatchNet {
    patch_len: usize,
    num_patches: usize,
    embedding: Dense,
    head: Dense,
}

impl PatchNet {
    pub(crate) fn new(lookback: usize, horizon: usize, rng: &mut StdRng) -> Result<Self, ModelFitError> {
        let patch_len = (lookback / 4).clamp(1, MAX_PATCH_LEN);
        let num_patches = lookback / patch_len;
        if num_patches == 0 {
            return Err(ModelFitError::InvalidHyperparameter(format!(
                "lookback {} too short for patching",
                lookback
            )));
        }

        Ok(Self {
            patch_len,
            num_patches,
            embedding: Dense::new(patch_len, EMBEDDING_DIM, rng)?,
            head: Dense::new(num_patches * EMBEDDING_DIM, horizon, rng)?,
        })
    }

    /// Patches covering the most recent `num_patches * patch_len` values
    fn patches<'a>(&self, input: &'a [f64]) -> impl Iterator<Item = &'a [f64]> {
        let used = self.num_patches * self.patch_len;
        input[input.len() - used..].chunks_exact(self.patch_len)
    }
}

impl Network for PatchNet {
    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let flat: Vec<f64> = self
            .patches(input)
            .flat_map(|patch| relu(&self.embedding.forward(patch)))
            .collect();
        self.head.forward(&flat)
    }

    fn accumulate(&mut self, input: &[f64], target: &[f64]) -> f64 {
        let patches: Vec<&[f64]> = self.patches(input).collect();
        let pre: Vec<Vec<f64>> = patches.iter().map(|p| self.embedding.forward(p)).collect();
        let flat: Vec<f64> = pre.iter().flat_map(|z| relu(z)).collect();

        let prediction = self.head.forward(&flat);
        let (loss, grad) = mse(&prediction, target);

        let grad_flat = self.head.backward(&flat, &grad);
        for ((patch, z), grad_a) in patches
            .iter()
            .zip(&pre)
            .zip(grad_flat.chunks_exact(EMBEDDING_DIM))
        {
            let grad_z = relu_backward(z, grad_a);
            self.embedding.accumulate(patch, &grad_z);
        }

        loss
    }

    fn layers_mut(&mut self) -> Vec<&mut Dense> {
        vec![&mut self.embedding, &mut self.head]
    }
}
