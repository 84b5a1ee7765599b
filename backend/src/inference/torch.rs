use ndarray::Array3;
use std::path::Path;
use tch::{nn::ModuleT, CModule, Device, Kind, Tensor};

use super::engine::{Classifier, InputLayout};
use super::error::InferenceError;

/// TorchScript module executed through libtorch.
pub struct TorchClassifier {
    module: CModule,
    device: Device,
    layout: InputLayout,
    input_size: i64,
}

impl TorchClassifier {
    pub fn load(path: &Path, layout: InputLayout, input_size: u32) -> Result<Self, InferenceError> {
        let device = Device::cuda_if_available();
        let mut module = CModule::load_on_device(path, device)
            .map_err(|e| InferenceError::Model(format!("failed to load {}: {}", path.display(), e)))?;
        module.set_eval();
        log::info!("Loaded TorchScript model from {} on {:?}", path.display(), device);

        Ok(Self {
            module,
            device,
            layout,
            input_size: input_size as i64,
        })
    }
}

impl Classifier for TorchClassifier {
    fn predict(&self, input: &Array3<f32>) -> Result<Vec<f32>, InferenceError> {
        let data = self.layout.flatten(input);
        let shape: Vec<i64> = self
            .layout
            .shape(self.input_size as usize)
            .iter()
            .map(|d| *d as i64)
            .collect();
        let tensor = Tensor::from_slice(&data).view(shape.as_slice()).to_device(self.device);

        let output = tch::no_grad(|| self.module.forward_t(&tensor, false));
        let output_flat = output.to_kind(Kind::Float).to_device(Device::Cpu).view([-1]);
        let num_elements = output_flat.size()[0] as usize;
        let mut output_vec = vec![0.0f32; num_elements];
        output_flat.copy_data(&mut output_vec, num_elements);
        Ok(output_vec)
    }

    fn name(&self) -> &'static str {
        "torch"
    }
}
