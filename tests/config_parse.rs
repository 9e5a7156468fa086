use port_flow::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../port-flow.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.flow.platforms.len(), 4);
    assert_eq!(cfg.donation.sink, "jsonl");
    assert!(!cfg.donation.out_dir.is_empty());
}

#[test]
fn defaults_cover_missing_sections() {
    let cfg: Config = toml::from_str("").expect("parse empty TOML");
    assert_eq!(
        cfg.flow.platforms,
        vec!["Twitter", "Instagram", "Facebook", "YouTube"]
    );
    assert_eq!(cfg.logging.level, "info");
}
