// ============================================================
// Layer 5: Attention Block
// ============================================================
// The repeating unit of the predictor. Two residual stages:
//
//   x ─┬─ self-attention ─ dropout ─(+)─ norm ─ dropout ─┬─ dense ─ relu ─ dropout ─(+)─ norm ─ dropout ─▶
//      └─────────────────────────────┘                   └───────────────────────────┘
//
// Shape in == shape out: [batch, receptive_field, dims].
//
// With `shared_stage_layers` (the default) a single LayerNorm is
// used by both stages; otherwise the feed-forward stage gets its
// own. There is only ever one dense layer, dims → dims.

use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::relu,
};

#[derive(Config, Debug)]
pub struct AttentionBlockConfig {
    pub dims:      usize,
    pub num_heads: usize,
    #[config(default = 0.1)]
    pub dropout:   f64,
    #[config(default = true)]
    pub shared_stage_layers: bool,
}

impl AttentionBlockConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> AttentionBlock<B> {
        let attention    = MultiHeadAttentionConfig::new(self.dims, self.num_heads).init(device);
        let feed_forward = LinearConfig::new(self.dims, self.dims).init(device);
        let norm         = LayerNormConfig::new(self.dims).init(device);
        let ffn_norm     = (!self.shared_stage_layers)
            .then(|| LayerNormConfig::new(self.dims).init(device));
        let dropout      = DropoutConfig::new(self.dropout).init();
        AttentionBlock { attention, feed_forward, norm, ffn_norm, dropout }
    }
}

#[derive(Module, Debug)]
pub struct AttentionBlock<B: Backend> {
    pub attention:    MultiHeadAttention<B>,
    pub feed_forward: Linear<B>,
    pub norm:         LayerNorm<B>,
    pub ffn_norm:     Option<LayerNorm<B>>,
    pub dropout:      Dropout,
}

impl<B: Backend> AttentionBlock<B> {
    /// x: [batch, seq, dims] → [batch, seq, dims]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        // Stage 1: self-attention
        let attended = self.attention.forward(MhaInput::self_attn(x.clone())).context;
        let x = self.norm.forward(x + self.dropout.forward(attended));
        let x = self.dropout.forward(x);

        // Stage 2: position-wise feed-forward
        let hidden = relu(self.feed_forward.forward(x.clone()));
        let ffn_norm = self.ffn_norm.as_ref().unwrap_or(&self.norm);
        let x = ffn_norm.forward(x + self.dropout.forward(hidden));
        self.dropout.forward(x)
    }
}
