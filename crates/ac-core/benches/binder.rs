use std::hint::black_box;

use ac_core::binder::ConfigBinder;
use ac_core::catalog::StaticCatalog;
use ac_core::settings::SettingsRecord;
use criterion::{Criterion, criterion_group, criterion_main};

fn large_catalog() -> StaticCatalog {
    (0..32).fold(StaticCatalog::default(), |catalog, s| {
        catalog.with_sink(
            &format!("sink{s}"),
            (0..256).map(|d| format!("sink{s} device {d}")),
        )
    })
}

fn bench_load(c: &mut Criterion) {
    let catalog = large_catalog();
    let binder = ConfigBinder::new(&catalog);
    let settings = SettingsRecord {
        sink_id: "sink31".into(),
        audio_device_id: "sink31 device 255".into(),
        ..SettingsRecord::default()
    };

    c.bench_function("load_last_sink_last_device", |b| {
        b.iter(|| binder.load(black_box(&settings)));
    });

    let state = binder.load(&settings);
    c.bench_function("sink_change", |b| {
        b.iter(|| binder.on_sink_changed(black_box(state.clone()), 1));
    });
}

criterion_group!(benches, bench_load);
criterion_main!(benches);
