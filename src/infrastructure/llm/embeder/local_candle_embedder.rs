use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

pub const DEFAULT_LOCAL_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Sentence-transformers BERT model run in-process with candle.
/// Vectors are attention-masked mean pools, L2-normalised.
pub struct LocalCandleEmbedder {
    inner: Arc<LoadedModel>,
}

struct LoadedModel {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

fn inference(e: impl std::fmt::Display) -> EmbedderError {
    EmbedderError::InferenceFailed(e.to_string())
}

impl LocalCandleEmbedder {
    /// Downloads (or reuses the cached copy of) `model_id` from the
    /// Hugging Face hub and loads it.
    pub fn new(model_id: &str) -> Result<Self, EmbedderError> {
        let device = Device::new_metal(0).unwrap_or(Device::Cpu);

        tracing::info!(
            device = ?device,
            model = model_id,
            "Loading local embedding model"
        );

        let load = |stage: &str, e: &dyn std::fmt::Display| {
            EmbedderError::ModelLoadFailed(format!("{stage}: {e}"))
        };

        let api = Api::new().map_err(|e| load("hub", &e))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo.get("config.json").map_err(|e| load("config.json", &e))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| load("tokenizer.json", &e))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| load("model.safetensors", &e))?;

        let config_contents =
            std::fs::read_to_string(&config_path).map_err(|e| load("read config", &e))?;
        let config: BertConfig =
            serde_json::from_str(&config_contents).map_err(|e| load("parse config", &e))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| load("tokenizer", &e))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: config.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(|e| load("truncation", &e))?;

        let dtype = if device.is_cpu() { DType::F32 } else { DType::F16 };

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], dtype, &device)
                .map_err(|e| load("weights", &e))?
        };

        let model = BertModel::load(vb, &config).map_err(|e| load("model", &e))?;

        tracing::info!(model = model_id, "Local embedding model loaded");

        Ok(Self {
            inner: Arc::new(LoadedModel {
                model,
                tokenizer,
                device,
            }),
        })
    }

    async fn encode(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbedderError> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.encode(&texts))
            .await
            .map_err(inference)?
    }
}

impl LoadedModel {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbedderError::InferenceFailed(format!("tokenization: {e}")))?;

        let batch_size = encodings.len();
        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(batch_size * max_len);
        let mut type_ids = Vec::with_capacity(batch_size * max_len);
        let mut attention = Vec::with_capacity(batch_size * max_len);

        for encoding in &encodings {
            let pad_len = max_len - encoding.get_ids().len();
            input_ids.extend_from_slice(encoding.get_ids());
            input_ids.extend(std::iter::repeat_n(0u32, pad_len));
            type_ids.extend_from_slice(encoding.get_type_ids());
            type_ids.extend(std::iter::repeat_n(0u32, pad_len));
            attention.extend_from_slice(encoding.get_attention_mask());
            attention.extend(std::iter::repeat_n(0u32, pad_len));
        }

        let shape = (batch_size, max_len);
        let input_ids = Tensor::from_vec(input_ids, shape, &self.device).map_err(inference)?;
        let type_ids = Tensor::from_vec(type_ids, shape, &self.device).map_err(inference)?;
        let attention = Tensor::from_vec(attention, shape, &self.device).map_err(inference)?;

        let hidden = self
            .model
            .forward(&input_ids, &type_ids, Some(&attention))
            .and_then(|t| t.to_dtype(DType::F32))
            .map_err(inference)?;

        let pooled = mean_pool(&hidden, &attention).map_err(inference)?;

        (0..batch_size)
            .map(|i| {
                let mut values: Vec<f32> = pooled
                    .get(i)
                    .and_then(|row| row.to_vec1())
                    .map_err(inference)?;
                l2_normalize(&mut values);
                Ok(values)
            })
            .collect()
    }
}

/// Averages token vectors, ignoring padding positions.
fn mean_pool(hidden: &Tensor, attention: &Tensor) -> candle_core::Result<Tensor> {
    let mask = attention.to_dtype(DType::F32)?;
    let summed = hidden.broadcast_mul(&mask.unsqueeze(2)?)?.sum(1)?;
    let counts = mask.sum(1)?.unsqueeze(1)?;
    summed.broadcast_div(&counts)
}

fn l2_normalize(v: &mut [f32]) {
    let length: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if length > 0.0 {
        v.iter_mut().for_each(|x| *x /= length);
    }
}

#[async_trait]
impl Embedder for LocalCandleEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        self.encode(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .map(Embedding::new)
            .ok_or_else(|| EmbedderError::InferenceFailed("empty result".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let owned = texts.iter().map(|t| t.to_string()).collect();
        let results = self.encode(owned).await?;
        Ok(results.into_iter().map(Embedding::new).collect())
    }
}
