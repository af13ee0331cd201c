//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# cmdr-presence configuration
# Only override what you want to change -- missing fields use defaults.

[presence]
# Settings toggle: when true the presence is cleared instead of updated.
disabled = false
# client_id = 1169952579745230888
# steam_app_id = 359320      # 0 skips launcher registration
# large_image = "elite"
# menu_label = "in_menus"    # in_menus, connecting

# Translated presence strings, keyed by the English text.
# [presence.phrases]
# "In system {system}" = "Im System {system}"
# "Supercruising" = "Im Supercruise"

[connection]
# retry_interval_ms = 100        # 10-60000
# max_retry_interval_ms = 100    # >= retry_interval_ms, enables backoff when larger
# poll_interval_ms = 100         # 10-10000
# handshake_timeout_secs = 10    # 1-120

[journal]
# directory = "C:\\Users\\you\\Saved Games\\Frontier Developments\\Elite Dangerous"
# poll_interval_ms = 250         # 50-10000
# from_start = false

[logging]
# level = "info"         # trace, debug, info, warn, error
# filter = "discord_sdk=debug"   # extra tracing directives
"##
    .to_string()
}
