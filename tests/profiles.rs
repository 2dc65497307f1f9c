//! Integration tests: configuration profiles feeding a generator

use num_complex::Complex32;
use signal_exciter_lib::adapters::{load_config, save_config, IqWriter, ProfileStore};
use signal_exciter_lib::{
    ExciterError, GeneratorConfig, SampleSink, Sideband, SignalGenerator,
};

#[test]
fn test_partial_profile_builds_a_generator() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("usb.json");
    std::fs::write(
        &path,
        r#"{ "sideband": "upper", "tap_count": 45, "seed": 5, "threaded": false }"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.sideband, Sideband::Upper);
    assert_eq!(config.buffer_size, 8192);

    let generator = SignalGenerator::new(config).unwrap();
    assert_eq!(generator.shaping_history_len(), 44);
    assert_eq!(generator.active_taps().len(), 45);
}

#[test]
fn test_invalid_profile_fails_at_construction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    let config = GeneratorConfig {
        max_freq: 0.75,
        ..Default::default()
    };
    save_config(&path, &config).unwrap();

    let loaded = load_config(&path).unwrap();
    assert!(matches!(
        SignalGenerator::new(loaded),
        Err(ExciterError::Config(_))
    ));
}

#[test]
fn test_stored_profile_streams_to_cf32_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::open(dir.path()).unwrap();
    store
        .save(
            "bench",
            &GeneratorConfig {
                sideband: Sideband::Lower,
                seed: 8,
                threaded: false,
                ..Default::default()
            },
        )
        .unwrap();

    let mut generator = SignalGenerator::new(store.load("bench").unwrap()).unwrap();
    let out_path = dir.path().join("bench.cf32");
    let mut writer = IqWriter::create(&out_path).unwrap();
    let mut chunk = vec![Complex32::new(0.0, 0.0); 1000];
    for _ in 0..5 {
        generator.generate_signal(&mut chunk);
        writer.write_samples(&chunk).unwrap();
    }
    writer.flush().unwrap();
    assert_eq!(writer.samples_written(), 5000);
    drop(writer);

    assert_eq!(std::fs::metadata(&out_path).unwrap().len(), 5000 * 8);
}
