use std::path::PathBuf;

use revalidate::conditional::{Comparison, ObservationMode};
use revalidate::config::{Config, CONFIG_ENV, LISTEN_ENV};

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.listen_addr, "127.0.0.1:8080");
    assert_eq!(cfg.root_dir, PathBuf::from("public"));
    assert_eq!(cfg.etag_comparison, Comparison::Weak);
    assert_eq!(cfg.etag_mode, ObservationMode::AfterResponse);
}

#[test]
fn test_config_partial_yaml_keeps_defaults() {
    let cfg = Config::from_yaml_str("listen_addr: \"0.0.0.0:3000\"\n").unwrap();

    assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.root_dir, PathBuf::from("public"));
    assert_eq!(cfg.etag_comparison, Comparison::Weak);
}

#[test]
fn test_config_full_yaml() {
    let yaml = r#"
listen_addr: "127.0.0.1:9000"
root_dir: "/srv/www"
etag_comparison: strong
etag_mode: after_headers
"#;
    let cfg = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(cfg.listen_addr, "127.0.0.1:9000");
    assert_eq!(cfg.root_dir, PathBuf::from("/srv/www"));
    assert_eq!(cfg.etag_comparison, Comparison::Strong);
    assert_eq!(cfg.etag_mode, ObservationMode::AfterHeaders);
}

#[test]
fn test_config_rejects_unknown_mode() {
    let err = Config::from_yaml_str("etag_mode: eventually\n").unwrap_err();
    assert!(err.to_string().contains("etag_mode") || err.to_string().contains("variant"));
}

#[test]
fn test_config_from_missing_file() {
    let path = std::env::temp_dir().join("revalidate-no-such-config.yaml");
    let err = Config::from_file(&path).unwrap_err();

    assert!(format!("{err:#}").contains("reading config file"));
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.listen_addr, cfg2.listen_addr);
    assert_eq!(cfg1.etag_mode, cfg2.etag_mode);
}

// Environment variables are process-wide, so everything touching them
// lives in one test.
#[test]
fn test_config_load_from_env() {
    let path = std::env::temp_dir().join(format!("revalidate-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "listen_addr: \"127.0.0.1:7000\"\netag_comparison: strong\n").unwrap();

    unsafe {
        std::env::remove_var(LISTEN_ENV);
        std::env::remove_var(CONFIG_ENV);
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "127.0.0.1:8080");

    unsafe {
        std::env::set_var(CONFIG_ENV, &path);
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "127.0.0.1:7000");
    assert_eq!(cfg.etag_comparison, Comparison::Strong);

    unsafe {
        std::env::set_var(LISTEN_ENV, "0.0.0.0:3000");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.etag_comparison, Comparison::Strong);

    unsafe {
        std::env::remove_var(LISTEN_ENV);
        std::env::remove_var(CONFIG_ENV);
    }
    std::fs::remove_file(&path).unwrap();
}
