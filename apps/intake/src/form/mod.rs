// Form orchestration: consent, the Continue/Skip actions, and identity
// resolution against the injected host.

pub mod identity;
pub mod orchestrator;

pub use identity::{Identity, IdentityPolicy, IdentitySource};
pub use orchestrator::{ActionResult, ContinuePlan, FormOrchestrator, SkipPlan};
