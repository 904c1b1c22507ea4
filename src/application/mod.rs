// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Orchestrates the other layers for one run of the tool:
// corpus loading, model creation or restore, training and
// evaluation, saving, generation.
//
// Rules for this layer:
//   - No tensor code here (that's Layer 5)
//   - No flag parsing here (that's Layer 1)
//   - No direct file formats here (Layers 4 and 6 own those)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The create/load → train/test → save → generate workflow
pub mod run_use_case;
