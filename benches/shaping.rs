//! Benchmark for snapshot shaping

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use homelab::aggregate::Snapshot;
use homelab::catalog::names;
use homelab::pages::Page;
use homelab::upstream::UpstreamResult;
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn queue(n: usize, tv: bool) -> Value {
    let records: Vec<Value> = (0..n)
        .map(|i| {
            let mut record = json!({
                "id": i,
                "title": format!("Item {}", i),
                "size": 4_000_000_000u64,
                "sizeleft": (i as u64 % 10) * 400_000_000,
                "status": "downloading"
            });
            if tv {
                record["series"] = json!({"title": "Show"});
                record["episodeId"] = json!(i + 1);
            }
            record
        })
        .collect();
    json!({"totalRecords": n, "records": records})
}

fn calendar(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                json!({
                    "title": format!("Episode {}", i),
                    "airDateUtc": format!("2026-01-{:02}T20:00:00Z", (n - i) % 28 + 1)
                })
            })
            .collect(),
    )
}

fn sessions(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                let mut session = json!({"UserId": format!("user-{}", i % 5), "Client": "Web"});
                if i % 2 == 0 {
                    session["NowPlayingItem"] = json!({"Name": "Film", "RunTimeTicks": 72_000_000_000u64});
                    session["PlayState"] = json!({"PositionTicks": 36_000_000_000u64, "PlayMethod": "Transcode"});
                }
                session
            })
            .collect(),
    )
}

fn snapshot(entries: Vec<(&str, Value)>) -> Snapshot {
    Snapshot::new(
        entries
            .into_iter()
            .map(|(name, value)| (name.to_string(), UpstreamResult::Success(value)))
            .collect::<BTreeMap<_, _>>(),
    )
}

fn bench_arr_full(c: &mut Criterion) {
    let snap = snapshot(vec![
        (names::SONARR_QUEUE, queue(100, true)),
        (names::RADARR_QUEUE, queue(100, false)),
        (names::SONARR_CALENDAR, calendar(50)),
        (names::RADARR_HISTORY, queue(15, false)),
    ]);

    c.bench_function("shape_arr_full", |b| {
        b.iter(|| black_box(Page::ArrFull.render(black_box(&snap))))
    });
}

fn bench_jellyfin_power(c: &mut Criterion) {
    let users: Vec<Value> = (0..10).map(|i| json!({"Id": format!("user-{}", i)})).collect();
    let snap = snapshot(vec![
        (names::JELLYFIN_SESSIONS, sessions(40)),
        (names::JELLYFIN_USERS, Value::Array(users)),
        (names::JELLYFIN_ACTIVITY, json!({"Items": [{"Name": "login"}]})),
    ]);

    c.bench_function("shape_jellyfin_power", |b| {
        b.iter(|| black_box(Page::JellyfinPower.render(black_box(&snap))))
    });
}

fn bench_empty_snapshot(c: &mut Criterion) {
    let snap = Snapshot::default();

    c.bench_function("shape_all_pages_empty", |b| {
        b.iter(|| {
            for page in Page::ALL {
                black_box(page.render(black_box(&snap)));
            }
        })
    });
}

criterion_group!(benches, bench_arr_full, bench_jellyfin_power, bench_empty_snapshot);
criterion_main!(benches);
