// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one goal at a time.
//
// Rules for this layer:
//   - No model math (Layer 5) and no file formats (Layer 6)
//   - No printing (Layer 1)
//   - Only workflow coordination

// Result contract per front-end
pub mod formatter;

// normalize → predict → format
pub mod pipeline;

// HTTP server lifecycle
pub mod serve_use_case;
