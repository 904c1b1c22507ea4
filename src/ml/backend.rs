// ============================================================
// Layer 5: Backend Selection
// ============================================================
// Training needs gradients, so it runs on Autodiff<Inner>.
// Evaluation and generation call model.valid(), which strips
// the autodiff wrapper and disables dropout.
//
// The CPU ndarray backend is the default. Building with
// `--features wgpu` switches the inner backend to the GPU.

#[cfg(not(feature = "wgpu"))]
pub type InnerBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type InnerBackend = burn::backend::Wgpu;

pub type TrainBackend = burn::backend::Autodiff<InnerBackend>;

pub type Device = <InnerBackend as burn::tensor::backend::Backend>::Device;

pub fn default_device() -> Device {
    <Device as Default>::default()
}

/// Seed the training backend's parameter initialisation and dropout.
pub fn seed(seed: u64) {
    <TrainBackend as burn::tensor::backend::Backend>::seed(seed);
}
