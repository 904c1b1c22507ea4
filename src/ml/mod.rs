// ============================================================
// Layer 5: ML / Model Layer (Burn)
// ============================================================
// All tensor code lives here. Other layers hand in symbol
// indices and get back predictions or pass statistics.
//
//   backend.rs    Backend aliases (NdArray, or Wgpu behind the
//                 `wgpu` feature) and the training backend
//
//   block.rs      One attention block:
//                 • Multi-head self-attention
//                 • Dense feed-forward (ReLU)
//                 • Residual connections
//                 • Layer normalisation
//
//   model.rs      The next-symbol predictor:
//                 embedding → blocks → window convolution
//                 → dense → softmax
//
//   loss.rs       Categorical cross-entropy and perplexity
//
//   trainer.rs    Epoch loop with Adam and per-epoch evaluation
//
//   generator.rs  Greedy or sampled text generation
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need

/// Backend selection
pub mod backend;

/// Attention block: self-attention + feed-forward with residuals
pub mod block;

/// Next-symbol predictor architecture
pub mod model;

/// Loss and perplexity
pub mod loss;

/// Training loop with per-epoch evaluation
pub mod trainer;

/// Text generation from a trained predictor
pub mod generator;
