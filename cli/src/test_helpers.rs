use std::env;

/// Keep the logger out of the user's data directory during tests.
///
/// Changes process environment, so callers are marked `#[serial]`.
pub fn logging_setup() {
    unsafe {
        env::set_var("HYMNAL_DIR", env::temp_dir().join("hymnal-cli-tests"));
        env::set_var("DISABLE_LOG", "true");
    }
}
