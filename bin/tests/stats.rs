use quire_bin::commands::stats;
use tempfile::tempdir;

#[test]
fn stats_for_file_on_disk() {
    let tmp_dir = tempdir().unwrap();
    let file = tmp_dir.path().join("notes.txt");
    std::fs::write(&file, "one\ntwo\n\tthree\n").unwrap();
    let config = tmp_dir.path().join("config.toml");
    std::fs::write(&config, "tab_width = 4").unwrap();

    let stats = stats::load(&file, Some(&config)).unwrap();
    assert_eq!(stats.len, 15);
    assert_eq!(stats.lines, 4);
    assert_eq!(stats.widest_line, 9);
    assert!(stats.depth >= 1);
}

#[test]
fn missing_file_reports_path() {
    let tmp_dir = tempdir().unwrap();
    let file = tmp_dir.path().join("missing.txt");
    let config = tmp_dir.path().join("config.toml");
    std::fs::write(&config, "").unwrap();

    let err = stats::load(&file, Some(&config)).unwrap_err();
    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn bad_config_is_an_error() {
    let tmp_dir = tempdir().unwrap();
    let file = tmp_dir.path().join("notes.txt");
    std::fs::write(&file, "x").unwrap();
    let config = tmp_dir.path().join("config.toml");
    std::fs::write(&config, "tab_width = 0").unwrap();

    assert!(stats::load(&file, Some(&config)).is_err());
}
