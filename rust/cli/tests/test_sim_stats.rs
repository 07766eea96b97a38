use bura_cli::run;

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let mut argv = vec!["bura"];
    argv.extend_from_slice(args);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

fn number_after(text: &str, prefix: &str) -> u64 {
    text.lines()
        .find_map(|l| l.strip_prefix(prefix))
        .and_then(|rest| rest.split(|c: char| !c.is_ascii_digit()).next())
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| panic!("no `{}` in {}", prefix, text))
}

#[test]
fn recorded_rounds_feed_stats() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs/rounds.jsonl");
    let path_str = path.to_str().unwrap();

    let (code, sim_out, err) = run_cli(&[
        "sim", "--matches", "3", "--seed", "21", "--target", "3", "--output", path_str,
    ]);
    assert_eq!(code, 0, "stderr: {}", err);
    let rounds = number_after(&sim_out, "Simulated: 3 matches, ");
    assert!(rounds >= 3);

    let lines = std::fs::read_to_string(&path).unwrap();
    assert_eq!(lines.lines().count() as u64, rounds);
    for line in lines.lines() {
        let record: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(record["round_id"].is_string());
        assert!(record["actions"].is_array());
    }

    let (code, stats_out, err) = run_cli(&["stats", "--input", path_str]);
    assert_eq!(code, 0, "stderr: {}", err);
    assert_eq!(number_after(&stats_out, "Rounds: "), rounds);
    assert!(stats_out.contains("seat 1: "));
    assert!(stats_out.contains("Moves per round: "));
}

#[test]
fn simulation_is_reproducible_from_its_seed() {
    let args = ["sim", "--matches", "2", "--seed", "5", "--target", "3"];
    let (_, first, _) = run_cli(&args);
    let (_, second, _) = run_cli(&args);
    assert_eq!(first, second);
}

#[test]
fn stats_on_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.jsonl");
    let (code, _, err) = run_cli(&["stats", "--input", missing.to_str().unwrap()]);
    assert_eq!(code, 2);
    assert!(err.contains("Failed to read"));
}

#[test]
fn compressed_logs_are_read() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("rounds.jsonl");
    let (code, _, _) = run_cli(&[
        "sim", "--matches", "1", "--seed", "8", "--target", "2", "--output",
        plain.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);

    let packed = dir.path().join("rounds.jsonl.zst");
    let bytes = std::fs::read(&plain).unwrap();
    std::fs::write(&packed, zstd::encode_all(&bytes[..], 0).unwrap()).unwrap();

    let (code, out, err) = run_cli(&["stats", "--input", packed.to_str().unwrap()]);
    assert_eq!(code, 0, "stderr: {}", err);
    assert!(out.contains("Rounds: "));
}
