pub mod aggregate;
pub mod canonical;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod ir;
pub mod label;
pub mod model_dump;
pub mod policy;
pub mod render;
pub mod source;

pub use aggregate::aggregate;
pub use config::{Categories, Config, RenderOptions, load_config};
pub use error::RetrievalError;
pub use ir::{Model, Target, Workload};
pub use policy::{NetworkPolicy, PolicyType};
pub use render::{render, render_policies};
pub use source::{Scope, fetch_policies};

#[cfg(feature = "cli")]
pub use cli::run;

/// Fetches the policies in `scope` and renders them.
pub fn visualize(scope: &Scope, options: &RenderOptions) -> Result<String, RetrievalError> {
    let policies = fetch_policies(scope)?;
    Ok(render_policies(&policies, options))
}
