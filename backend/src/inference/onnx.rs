use ndarray::Array3;
use std::path::Path;
use tract_onnx::prelude::*;

use super::engine::{Classifier, InputLayout};
use super::error::InferenceError;

/// ONNX model executed with tract.
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    layout: InputLayout,
    input_size: usize,
}

impl OnnxClassifier {
    pub fn load(path: &Path, layout: InputLayout, input_size: u32) -> Result<Self, InferenceError> {
        let input_size = input_size as usize;
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact(layout.shape(input_size)).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::Model(format!("failed to load {}: {}", path.display(), e)))?;

        log::info!(
            "Loaded ONNX model from {} (input {:?})",
            path.display(),
            layout.shape(input_size)
        );
        Ok(Self {
            plan,
            layout,
            input_size,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, input: &Array3<f32>) -> Result<Vec<f32>, InferenceError> {
        let data = self.layout.flatten(input);
        let tensor = Tensor::from_shape(&self.layout.shape(self.input_size), &data)
            .map_err(|e| InferenceError::Preprocessing(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| InferenceError::Model(e.to_string()))?;
        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::Model("model produced no outputs".into()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::Model(format!("output is not f32: {}", e)))?;

        Ok(view.iter().copied().collect())
    }

    fn name(&self) -> &'static str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::engine::load_classifier;
    use prost::Message;
    use tract_onnx::pb;
    use tract_onnx::pb::tensor_proto::DataType;

    const SIZE: usize = 4;
    const FEATURES: usize = SIZE * SIZE * 3;

    // image -> Flatten -> MatMul(weights) -> scores, where feature i feeds class i % 4.
    fn weights() -> Vec<f32> {
        (0..FEATURES * 4)
            .map(|k| if (k / 4) % 4 == k % 4 { 1.0 } else { 0.0 })
            .collect()
    }

    fn write_model(dir: &Path) -> std::path::PathBuf {
        let value_info = |name: &str| pb::ValueInfoProto {
            name: name.to_string(),
            r#type: Some(pb::TypeProto {
                value: Some(pb::type_proto::Value::TensorType(pb::type_proto::Tensor {
                    elem_type: DataType::Float as i32,
                    shape: None,
                })),
                ..Default::default()
            }),
            ..Default::default()
        };
        let node = |op: &str, inputs: &[&str], output: &str| pb::NodeProto {
            input: inputs.iter().map(|s| s.to_string()).collect(),
            output: vec![output.to_string()],
            name: output.to_string(),
            op_type: op.to_string(),
            ..Default::default()
        };
        let graph = pb::GraphProto {
            name: "tiny".into(),
            node: vec![
                node("Flatten", &["image"], "flat"),
                node("MatMul", &["flat", "weights"], "scores"),
            ],
            initializer: vec![pb::TensorProto {
                name: "weights".into(),
                dims: vec![FEATURES as i64, 4],
                data_type: DataType::Float as i32,
                float_data: weights(),
                ..Default::default()
            }],
            input: vec![value_info("image")],
            output: vec![value_info("scores")],
            ..Default::default()
        };
        let model = pb::ModelProto {
            ir_version: 7,
            opset_import: vec![pb::OperatorSetIdProto {
                domain: String::new(),
                version: 13,
            }],
            graph: Some(graph),
            ..Default::default()
        };

        let path = dir.join("tiny.onnx");
        std::fs::write(&path, model.encode_to_vec()).unwrap();
        path
    }

    fn expected_scores(layout: InputLayout, input: &Array3<f32>) -> Vec<f32> {
        let mut scores = vec![0.0; 4];
        for (i, v) in layout.flatten(input).iter().enumerate() {
            scores[i % 4] += v;
        }
        scores
    }

    #[test]
    fn onnx_file_runs_in_both_layouts() {
        let dir = std::env::temp_dir().join(format!("mri-onnx-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = write_model(&dir);
        let input = Array3::from_shape_fn((SIZE, SIZE, 3), |(y, x, c)| (c * 100 + y * 10 + x) as f32 / 255.0);

        for layout in [InputLayout::Nhwc, InputLayout::Nchw] {
            let classifier = load_classifier(&path, layout, SIZE as u32).unwrap();
            assert_eq!(classifier.name(), "onnx");

            let scores = classifier.predict(&input).unwrap();
            assert_eq!(scores.len(), 4);
            for (got, want) in scores.iter().zip(expected_scores(layout, &input)) {
                assert!((got - want).abs() < 1e-4, "{layout:?}: {got} vs {want}");
            }
        }
        // Channel order changes which features land on which class.
        assert_ne!(
            expected_scores(InputLayout::Nhwc, &input),
            expected_scores(InputLayout::Nchw, &input)
        );
        std::fs::remove_dir_all(dir).ok();
    }
}
