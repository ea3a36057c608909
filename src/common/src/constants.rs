pub const WORKING_DIR: &str = "/tmp/conhook/";
pub const PID_FILE: &str = "/tmp/conhook/conhookd.pid";
pub const STDOUT_FILE: &str = "/tmp/conhook/conhookd.out";
pub const STDERR_FILE: &str = "/tmp/conhook/conhookd.err";
pub const LOG_FILE: &str = "/tmp/conhook/daemon.log";

pub const DEFAULT_SERVER: &str = "127.0.0.1:8484";
pub const DEFAULT_CONFIG_FILE_LOCATION_FROM_HOME: &str = ".config/conhook/conhook.toml";
