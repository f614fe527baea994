//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Crux Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[chat]
# endpoint = "http://localhost:54321/functions/v1/chat"
# api_key_env = "CRUX_API_KEY"    # bearer token is read from this variable
# greeting = "Hi! I'm CruxAI Assistant. ..."

[completion]
# endpoint = "https://ai.gateway.lovable.dev/v1/chat/completions"
# api_key_env = "CRUX_API_KEY"
# model = "google/gemini-2.5-flash"
# temperature = 0.7               # 0.0-2.0

[stream]
# idle_timeout_secs = 60          # 0 disables, otherwise 1-3600
# connect_timeout_secs = 10       # 1-120
# max_buffer_bytes = 1048576      # 1024-67108864

[logging]
level = "INFO"                    # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
