use clap::Parser;
use fileman::cli::{Cli, Commands};
use fileman::config::Config;
use fileman::scanner::HashAlgorithm;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("FILEMAN_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_hierarchy_defaults_file_env_cli() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    // 1. Defaults
    let config = Config::load_from_path(&config_path);
    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    assert_eq!(config.hash_threads, 1);

    // 2. File overrides defaults
    fs::write(&config_path, "algorithm = \"sha256\"\nhash_threads = 8\n").unwrap();
    let config = Config::load_from_path(&config_path);
    assert_eq!(config.algorithm, HashAlgorithm::Sha256);
    assert_eq!(config.hash_threads, 8);

    // 3. Environment overrides file
    std::env::set_var("FILEMAN_ALGORITHM", "blake3");
    let mut config = Config::load_from_path(&config_path);
    clear_env();
    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    assert_eq!(config.hash_threads, 8);

    // 4. Flags override everything
    let cli = Cli::try_parse_from(["fileman", "dedupe", "--hash-threads", "2"]).unwrap();
    let Commands::Dedupe(args) = cli.command else {
        panic!("Expected Dedupe command");
    };
    config.merge_dedupe_args(&args);
    assert_eq!(config.hash_threads, 2);
    assert_eq!(config.dedupe_options(&args).hash_threads, 2);
}

#[test]
fn test_env_disables_progress() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();

    std::env::set_var("FILEMAN_PROGRESS", "false");
    let config = Config::load_from_path(temp_dir.path().join("none.toml"));
    clear_env();

    assert!(!config.progress);
}

#[test]
fn test_malformed_toml_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "hash_threads = [oops\n").unwrap();

    assert_eq!(Config::load_from_path(&config_path), Config::default());
}

#[test]
fn test_organize_dir_from_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "organize_dir = \"sorted\"\n").unwrap();

    let config = Config::load_from_path(&config_path);
    let cli = Cli::try_parse_from(["fileman", "organize", "--by", "date"]).unwrap();
    let Commands::Organize(args) = cli.command else {
        panic!("Expected Organize command");
    };
    let options = config.organize_options(&args);
    assert_eq!(options.organize_dir, "sorted");
    assert!(!options.recursive);
}
