//! # Online Evaluation
//!
//! [`OnlineRnn`] evaluates a recurrent [`Topology`](crate::structure::Topology)
//! one time step at a time and keeps the gradient of every neuron with
//! respect to every parameter up to date as the sequence advances (real-time
//! recurrent learning).
//!
//! ## Typical Loop
//!
//! ```ignore
//! let net = OnlineRnn::new(&mut structure, true)?;
//! let mut state = net.create_state();
//! let mut gradient = Array1::zeros(net.number_of_parameters());
//!
//! for (x, target) in sequence {
//!     let y = net.step(x, &mut state)?;
//!     let coefficients: Vec<f64> = y.iter().zip(target).map(|(y, t)| y - t).collect();
//!     net.accumulate_gradient(&coefficients, &state, &mut gradient)?;
//! }
//! ```
//!
//! ## Cost
//!
//! | Quantity | Size |
//! |----------|------|
//! | activations | `2 × units` |
//! | sensitivities | `2 × parameters × neurons` |
//! | time per step | `O(parameters × neurons × units)` |

mod net;
mod state;

pub use net::OnlineRnn;
pub use state::EvaluationState;
