//! Benchmark for config parsing

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::Path;

fn bench_config_load_from_file(c: &mut Criterion) {
    let config_path = Path::new("homelab.example.toml");

    c.bench_function("config_parse_from_file", |b| {
        b.iter(|| {
            let config = homelab::config::HubConfig::load(Some(black_box(config_path)));
            black_box(config)
        });
    });
}

fn bench_config_load_defaults(c: &mut Criterion) {
    c.bench_function("config_parse_defaults_only", |b| {
        b.iter(|| {
            let config = homelab::config::HubConfig::load(None);
            black_box(config)
        });
    });
}

fn bench_config_toml_parsing(c: &mut Criterion) {
    let toml_content = r#"
[server]
host = "0.0.0.0"
port = 3000

[logging]
level = "info"
format = "json"

[logging.component_levels]
upstream = "debug"
aggregate = "trace"

[timeouts]
health_check_ms = 1500
bulk_seconds = 20
rcon_ms = 3000

[services.sonarr]
url = "http://nas:8989"
api_key = "0123456789abcdef"

[services.radarr]
url = "http://nas:7878"
api_key = "fedcba9876543210"

[services.jellyfin]
url = "http://media:8096"
api_key = "jellyfin-key"

[services.minecraft]
host = "10.0.0.20"
port = 25575
password = "hunter2"

[settings]
path = "/var/lib/homelab/settings.json"
"#;

    c.bench_function("config_toml_parse_full", |b| {
        b.iter(|| {
            let config: homelab::config::HubConfig = toml::from_str(black_box(toml_content))
                .expect("benchmark config must parse");
            black_box(config)
        });
    });
}

fn bench_env_overrides(c: &mut Criterion) {
    let vars = [
        ("HOMELAB_PORT", "8080"),
        ("HOMELAB_SONARR_URL", "http://nas:8989"),
        ("HOMELAB_SONARR_KEY", "key"),
        ("HOMELAB_MC_RCON_PASSWORD", "pw"),
    ];

    c.bench_function("config_overrides", |b| {
        b.iter(|| {
            let config = homelab::config::HubConfig::default().with_overrides_from(|key| {
                vars.iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| v.to_string())
            });
            black_box(config)
        });
    });
}

criterion_group!(
    benches,
    bench_config_load_from_file,
    bench_config_load_defaults,
    bench_config_toml_parsing,
    bench_env_overrides
);
criterion_main!(benches);
