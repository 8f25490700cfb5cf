/// Default TOML config content with comments.
pub(super) fn default_config_toml() -> &'static str {
    r##"# Sidechat Configuration
# Only override what you want to change -- missing fields use defaults.
# API keys may be left empty or as YOUR_* placeholders and supplied
# through GEMINI_API_KEY, GOOGLE_SEARCH_API_KEY and CUSTOM_SEARCH_ENGINE_ID.

[gemini]
# api_key = "YOUR_GEMINI_API_KEY"
# model = "gemini-2.5-flash"
# base_url = "https://generativelanguage.googleapis.com/v1beta/models"

[search]
# api_key = "YOUR_SEARCH_API_KEY"
# engine_id = "YOUR_SEARCH_ENGINE_ID"
# base_url = "https://www.googleapis.com/customsearch/v1"
# max_results = 10       # 1-10

[chat]
# language = "en"        # en, vi
# persist_history = true
# session_key = "default"
# history_dir = "/path/to/history"

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
}
