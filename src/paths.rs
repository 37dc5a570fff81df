/// Directory (relative to the project root) that rendered files land in
pub const DATA_DIR: &str = "data";

/// Directory (relative to the project root) holding the source templates
pub const TEMPLATES_DIR: &str = "templates";

/// Default environment file name
pub const ENV_FILE: &str = ".env";

/// Sample environment file written next to the env file
pub const SAMPLE_ENV_FILE: &str = ".env.sample";

/// Default settings file name looked up in the project root
pub const SETTINGS_FILE: &str = "homestack.yaml";

/// Default owner uid/gid for everything created under the data directory
pub const DEFAULT_OWNER_ID: u32 = 1000;
