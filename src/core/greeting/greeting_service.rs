use tracing::instrument;

/// Prepended to every name by [`greet`].
pub const GREETING_PREFIX: &str = "Hello ";

/// Greets someone by name.
#[instrument(level = "trace", ret)]
pub fn greet(name: &str) -> String {
    format!("{GREETING_PREFIX}{name}")
}
