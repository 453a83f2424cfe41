use bookshelf_core::DatabaseUrl;
use bookshelf_server::{ServerArgs, ServerConfig};
use clap::Parser;
use std::env;
use std::sync::Mutex;

/// Process environment is shared by every test in this binary.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const ENV_VARS: &[&str] = &[
    "BOOKSHELF_BIND_ADDRESS",
    "BOOKSHELF_PORT",
    "BOOKSHELF_DATABASE_URL",
    "BOOKSHELF_LOG_LEVEL",
    "BOOKSHELF_LOG_DIR",
    "BOOKSHELF_NO_SEED",
    "BOOKSHELF_MAX_LINE_BYTES",
];

fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    for name in ENV_VARS {
        env::remove_var(name);
    }
    for (name, value) in vars {
        env::set_var(name, value);
    }
    let result = f();
    for name in ENV_VARS {
        env::remove_var(name);
    }
    result
}

fn config_from(argv: &[&str]) -> ServerConfig {
    ServerConfig::from_args(ServerArgs::try_parse_from(argv).unwrap()).unwrap()
}

#[test]
fn every_setting_reads_its_environment_variable() {
    let config = with_env(
        &[
            ("BOOKSHELF_BIND_ADDRESS", "0.0.0.0"),
            ("BOOKSHELF_PORT", "4100"),
            ("BOOKSHELF_DATABASE_URL", "sqlite::memory:"),
            ("BOOKSHELF_LOG_LEVEL", "warn"),
            ("BOOKSHELF_LOG_DIR", "/var/log/bookshelf"),
            ("BOOKSHELF_NO_SEED", "1"),
            ("BOOKSHELF_MAX_LINE_BYTES", "2048"),
        ],
        || config_from(&["bookshelf-server"]),
    );

    assert_eq!(config.bind_addr.to_string(), "0.0.0.0:4100");
    assert_eq!(config.database_url, DatabaseUrl::SqliteMemory);
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.log_dir.as_deref(), Some("/var/log/bookshelf"));
    assert!(!config.seed);
    assert_eq!(config.max_line_bytes, 2048);
}

#[test]
fn no_seed_env_accepts_common_boolean_spellings() {
    for value in ["1", "true", "yes", "on"] {
        let config = with_env(&[("BOOKSHELF_NO_SEED", value)], || {
            config_from(&["bookshelf-server"])
        });
        assert!(!config.seed, "BOOKSHELF_NO_SEED={value} should disable seeding");
    }
    for value in ["0", "false", "no", "off"] {
        let config = with_env(&[("BOOKSHELF_NO_SEED", value)], || {
            config_from(&["bookshelf-server"])
        });
        assert!(config.seed, "BOOKSHELF_NO_SEED={value} should keep seeding");
    }
}

#[test]
fn flags_take_priority_over_environment() {
    let config = with_env(
        &[("BOOKSHELF_PORT", "4100"), ("BOOKSHELF_NO_SEED", "0")],
        || config_from(&["bookshelf-server", "--port", "4200", "--no-seed"]),
    );

    assert_eq!(config.bind_addr.port(), 4200);
    assert!(!config.seed);
}
